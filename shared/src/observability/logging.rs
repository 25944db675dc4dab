//! Structured logging setup for all services

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ObservabilityError::InvalidSetting(format!(
                "unknown log level '{}'",
                other
            ))),
        }
    }
}

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    Pretty,
    /// JSON format for log aggregation
    Json,
    /// Compact format
    Compact,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ObservabilityError::InvalidSetting(format!(
                "unknown log format '{}'",
                other
            ))),
        }
    }
}

/// Logging configuration
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub service_name: String,
    pub include_line_numbers: bool,
    pub include_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            service_name: "storage-service".to_string(),
            include_line_numbers: true,
            include_thread_ids: false,
        }
    }
}

/// Initialize logging for the service.
///
/// `RUST_LOG` takes precedence over the configured level when it is set.
pub fn init_logging(config: LogConfig) -> ObservabilityResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(config.include_thread_ids)
                        .with_line_number(config.include_line_numbers)
                        .pretty(),
                )
                .try_init()
                .map_err(|e| ObservabilityError::Logging(e.to_string()))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true)
                        .with_thread_ids(config.include_thread_ids)
                        .with_line_number(config.include_line_numbers),
                )
                .try_init()
                .map_err(|e| ObservabilityError::Logging(e.to_string()))?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_thread_ids(config.include_thread_ids),
                )
                .try_init()
                .map_err(|e| ObservabilityError::Logging(e.to_string()))?;
        }
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.level.as_str(),
        "Logging initialized"
    );

    Ok(())
}
