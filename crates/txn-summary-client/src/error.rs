//! Client error types.

use crate::types::ValidationDetail;

/// Errors that can occur when using the txn-summary client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request with a message.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the `detail` field.
        detail: String,
    },

    /// Server rejected one or more request fields.
    #[error("validation error ({status}): {} field(s) rejected", errors.len())]
    Validation {
        /// HTTP status code.
        status: u16,
        /// One entry per rejected field.
        errors: Vec<ValidationDetail>,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status returned by the server, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Validation { status, .. } => Some(*status),
            Self::Http(e) => e.status().as_ref().map(reqwest::StatusCode::as_u16),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }
}
