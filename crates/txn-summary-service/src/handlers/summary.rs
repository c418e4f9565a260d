//! Summary handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;

use txn_summary_core::{parse_timestamp, TransactionSummary};

use crate::error::{ApiError, FieldError, FieldSource};
use crate::state::AppState;
use crate::summary;

/// Validated summary request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryQuery {
    /// User to summarize.
    pub user_id: i64,
    /// Inclusive lower bound.
    pub start_date: NaiveDateTime,
    /// Inclusive upper bound.
    pub end_date: NaiveDateTime,
}

impl SummaryQuery {
    /// Validate the raw path segment and query parameters.
    ///
    /// Every problem is reported at once, path before query.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` listing each missing or malformed field.
    pub fn parse(raw_user_id: &str, params: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut errors = Vec::new();

        let user_id = raw_user_id.parse::<i64>().map_err(|_| {
            errors.push(FieldError::int_parsing(FieldSource::Path, "user_id", raw_user_id));
        });
        let start_date = date_param(params, "start_date", &mut errors);
        let end_date = date_param(params, "end_date", &mut errors);

        match (user_id, start_date, end_date) {
            (Ok(user_id), Some(start_date), Some(end_date)) => Ok(Self {
                user_id,
                start_date,
                end_date,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

fn date_param(
    params: &HashMap<String, String>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDateTime> {
    let Some(raw) = params.get(name) else {
        errors.push(FieldError::missing(FieldSource::Query, name));
        return None;
    };

    parse_timestamp(raw)
        .map_err(|_| errors.push(FieldError::datetime_parsing(FieldSource::Query, name, raw)))
        .ok()
}

/// Get min/max/average transaction amounts for a user over a date range.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(raw_user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TransactionSummary>, ApiError> {
    let query = SummaryQuery::parse(&raw_user_id, &params)?;

    let summary = summary::summarize(
        state.store.as_ref(),
        query.user_id,
        query.start_date,
        query.end_date,
    )
    .await?;

    Ok(Json(summary))
}
