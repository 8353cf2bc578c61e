//! Internal error types for hub operations.
//!
//! Mapped to `CatalogError` from `sds-core` at the port boundary.

use thiserror::Error;

/// Result type alias for hub operations.
pub type CopernicusResult<T> = Result<T, CopernicusError>;

#[derive(Debug, Error)]
pub enum CopernicusError {
    /// The hub answered with an unexpected HTTP status.
    #[error("Copernicus request failed with status {status}: {url}")]
    ApiRequestFailed { status: u16, url: String },

    #[error("Product '{id}' not found")]
    ProductNotFound { id: String },

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Product '{id}' is offline, retrieval from the long-term archive was triggered")]
    LtaTriggered { id: String },

    #[error("Long-term archive request for '{id}' failed: {message}")]
    LtaError { id: String, message: String },

    /// A 5xx answer. `message` is the hub's error text.
    #[error("Copernicus server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    InvalidChecksum { expected: String, actual: String },

    #[error("Invalid response from Copernicus: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CopernicusError {
    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_carries_hub_text() {
        let error = CopernicusError::Server {
            status: 500,
            message: "java.lang.NullPointerException".to_string(),
        };
        assert!(error.to_string().contains("NullPointerException"));
    }

    #[test]
    fn checksum_error_names_both_sums() {
        let error = CopernicusError::InvalidChecksum {
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("aa") && msg.contains("bb"));
    }
}
