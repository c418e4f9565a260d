//! Transaction summaries.

use chrono::NaiveDateTime;

use txn_summary_core::TransactionSummary;
use txn_summary_store::Store;

use crate::error::ApiError;

/// Message returned when the requested range is inverted.
pub const INVALID_RANGE_MESSAGE: &str = "Start date must be before end date.";

/// Summarize a user's transaction amounts with `start <= timestamp <= end`.
///
/// A range with no transactions is not an error; every statistic is `0`.
///
/// # Errors
///
/// - `ApiError::BadRequest` if `start` is after `end`.
/// - `ApiError::Internal` if the store query fails.
pub async fn summarize<S>(
    store: &S,
    user_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<TransactionSummary, ApiError>
where
    S: Store + ?Sized,
{
    if start > end {
        return Err(ApiError::BadRequest(INVALID_RANGE_MESSAGE.into()));
    }

    let stats = store.amount_stats(user_id, start, end).await?;

    match &stats {
        Some(stats) => tracing::debug!(user_id, matched = stats.count, "Summarized transactions"),
        None => tracing::debug!(user_id, %start, %end, "No transactions in range"),
    }

    Ok(TransactionSummary::from_stats(user_id, stats))
}
