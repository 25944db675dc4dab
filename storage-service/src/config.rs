//! Configuration for the Storage Service
//!
//! Values come from environment variables (a `.env` file is loaded first when
//! present), with defaults suited to a local MinIO setup.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::observability::{LogFormat, LogLevel};
use std::env;

/// Main configuration structure for the Storage Service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            server: ServerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8085".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Server port must be greater than 0");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
        }
    }
}

/// Object store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub region: String,
    /// Custom endpoint for S3-compatible stores; `None` means AWS.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub force_path_style: bool,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: non_empty_var("S3_ENDPOINT"),
            access_key_id: non_empty_var("S3_ACCESS_KEY"),
            secret_access_key: non_empty_var("S3_SECRET_KEY"),
            force_path_style: env::var("S3_PATH_STYLE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("Invalid S3_PATH_STYLE")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            bail!("S3 region cannot be empty");
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            bail!("S3_ACCESS_KEY and S3_SECRET_KEY must be set together");
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                bail!("S3 endpoint must be an http(s) URL: {}", endpoint);
            }
        }

        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .context("Invalid LOG_LEVEL")?,
            format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()
                .context("Invalid LOG_FORMAT")?,
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
