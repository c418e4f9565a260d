//! API error types and responses.
//!
//! Every error body has a single `detail` field. Client mistakes carry a
//! human-readable string; schema-level problems (422) carry one entry per
//! offending field.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use txn_summary_core::IngestError;
use txn_summary_store::StoreError;

/// Message returned for every internal failure. The cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - the input was understood but rejected.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// One or more request fields are missing or have the wrong type.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Request body exceeds the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Where a request field was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// Request body.
    Body,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Machine-readable error kind, e.g. `missing` or `int_parsing`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Source and name of the field.
    pub loc: (FieldSource, String),
    /// Human-readable description.
    pub msg: &'static str,
    /// The rejected value, if one was supplied.
    pub input: Option<String>,
}

impl FieldError {
    /// A required field was not supplied.
    #[must_use]
    pub fn missing(source: FieldSource, field: &str) -> Self {
        Self {
            kind: "missing",
            loc: (source, field.to_string()),
            msg: "Field required",
            input: None,
        }
    }

    /// A field that must be an integer could not be parsed as one.
    #[must_use]
    pub fn int_parsing(source: FieldSource, field: &str, input: &str) -> Self {
        Self {
            kind: "int_parsing",
            loc: (source, field.to_string()),
            msg: "Input should be a valid integer, unable to parse string as an integer",
            input: Some(input.to_string()),
        }
    }

    /// A field that must be a date-time could not be parsed as one.
    #[must_use]
    pub fn datetime_parsing(source: FieldSource, field: &str, input: &str) -> Self {
        Self {
            kind: "datetime_parsing",
            loc: (source, field.to_string()),
            msg: "Input should be a valid datetime",
            input: Some(input.to_string()),
        }
    }

    /// A field that must be a file upload was sent as plain text.
    #[must_use]
    pub fn not_a_file(source: FieldSource, field: &str) -> Self {
        Self {
            kind: "value_error",
            loc: (source, field.to_string()),
            msg: "Expected UploadFile, received: str",
            input: None,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse<T> {
    detail: T,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { detail: msg })).into_response()
            }
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse { detail: errors }),
            )
                .into_response(),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse {
                    detail: "Uploaded file is too large.",
                }),
            )
                .into_response(),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        detail: INTERNAL_ERROR_MESSAGE,
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_has_string_detail() {
        let response = ApiError::from(IngestError::InvalidFileType).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detail": "Please upload a CSV file." })
        );
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let response = ApiError::Validation(vec![
            FieldError::int_parsing(FieldSource::Path, "user_id", "abc"),
            FieldError::missing(FieldSource::Query, "start_date"),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["loc"], serde_json::json!(["path", "user_id"]));
        assert_eq!(body["detail"][0]["type"], "int_parsing");
        assert_eq!(body["detail"][0]["input"], "abc");
        assert_eq!(body["detail"][1]["loc"], serde_json::json!(["query", "start_date"]));
        assert_eq!(body["detail"][1]["msg"], "Field required");
        assert!(body["detail"][1]["input"].is_null());
    }

    #[tokio::test]
    async fn internal_errors_hide_the_cause() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detail": "Internal Server Error" })
        );
    }
}
