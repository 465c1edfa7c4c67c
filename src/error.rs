//! Membit error types

/// Membit error types
#[derive(Debug, thiserror::Error)]
pub enum MembitError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // AI errors. The first two display the exact strings shown to users.
    #[error("AI Not Initialized")]
    AiNotInitialized,

    #[error("Blocked/Empty")]
    BlockedOrEmpty,

    #[error("{0}")]
    Ai(String),

    // Rendering errors
    #[error("{0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reply could not be delivered to the chat transport.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for MembitError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => MembitError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => MembitError::Http(err.to_string()),
        }
    }
}

/// Result type alias for Membit operations
pub type Result<T> = std::result::Result<T, MembitError>;
