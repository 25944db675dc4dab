pub mod objects;

/// Liveness probe
pub async fn health_check() -> &'static str {
    "Storage Service is healthy"
}
