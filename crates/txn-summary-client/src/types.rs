//! Request and response types for the txn-summary client.

use serde::{Deserialize, Serialize};

pub use txn_summary_core::TransactionSummary as SummaryResponse;

/// Response to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Confirmation message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the service cannot reach its database.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

impl HealthResponse {
    /// Whether the service reported itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One rejected request field from a 422 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Error kind, e.g. `missing` or `int_parsing`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source and name of the field, e.g. `["query", "start_date"]`.
    pub loc: Vec<String>,
    /// Human-readable description.
    pub msg: String,
    /// The rejected value, if one was supplied.
    #[serde(default)]
    pub input: Option<serde_json::Value>,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: ErrorDetail,
}

/// `detail` is a message for rejected input and a list for schema errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Message(String),
    Fields(Vec<ValidationDetail>),
}
