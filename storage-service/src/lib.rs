//! Object storage accessor for S3-compatible buckets, plus the small HTTP
//! service that exposes it.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod storage;

use storage::ObjectAccessor;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accessor: Arc<ObjectAccessor>,
}
