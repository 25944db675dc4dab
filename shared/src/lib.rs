//! Shared utilities for the storage backend services

pub mod observability;
