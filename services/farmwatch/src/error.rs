//! Error types for the farmwatch service

/// Errors that can occur in the farmwatch service
#[derive(Debug, thiserror::Error)]
pub enum FarmwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for farmwatch operations
pub type Result<T> = std::result::Result<T, FarmwatchError>;
