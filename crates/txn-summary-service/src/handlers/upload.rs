//! CSV upload handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError, FieldSource};
use crate::ingest;
use crate::state::AppState;

/// Multipart field that carries the CSV file.
pub const FILE_FIELD: &str = "file";

/// Success message. The spelling is part of the public API.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Data saved succesfully.";

/// Upload response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Confirmation message.
    pub message: String,
}

/// A file received in the multipart body.
struct FilePart {
    file_name: String,
    bytes: Bytes,
}

/// Upload a CSV file of transactions and upsert its rows.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = read_file_field(multipart).await?;

    tracing::debug!(
        file_name = %file.file_name,
        bytes = file.bytes.len(),
        "Received CSV upload"
    );

    ingest::ingest(state.store.as_ref(), &file.file_name, &file.bytes).await?;

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
    }))
}

/// Pull the `file` field out of the multipart body, skipping any other fields.
async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<FilePart, ApiError> {
    let missing = || ApiError::Validation(vec![FieldError::missing(FieldSource::Body, FILE_FIELD)]);

    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload is not a multipart body");
        missing()
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(ToString::to_string) else {
            return Err(ApiError::Validation(vec![FieldError::not_a_file(
                FieldSource::Body,
                FILE_FIELD,
            )]));
        };

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(FilePart { file_name, bytes });
    }

    Err(missing())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
