//! Aggregate types for the summary endpoint.

use serde::{Deserialize, Serialize};

/// Aggregate of `transaction_amount` over a non-empty set of records.
///
/// Storage returns `Option<AmountStats>`; `None` means no record matched, which
/// is not the same thing as records whose amounts happen to be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountStats {
    /// Number of matching records. Always at least one.
    pub count: u64,
    /// Smallest amount.
    pub min: f64,
    /// Largest amount.
    pub max: f64,
    /// Arithmetic mean.
    pub avg: f64,
}

/// Summary of a user's transactions within a date range, as sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// The user the summary is for.
    pub user_id: i64,
    /// Smallest amount, or `0` when nothing matched.
    pub min_transaction_amount: f64,
    /// Largest amount, or `0` when nothing matched.
    pub max_transaction_amount: f64,
    /// Mean amount, or `0` when nothing matched.
    pub average_transaction_amount: f64,
}

impl TransactionSummary {
    /// Shape aggregate statistics into a summary.
    ///
    /// No matching records yields zeros for every statistic.
    #[must_use]
    pub fn from_stats(user_id: i64, stats: Option<AmountStats>) -> Self {
        match stats {
            Some(stats) => Self {
                user_id,
                min_transaction_amount: stats.min,
                max_transaction_amount: stats.max,
                average_transaction_amount: stats.avg,
            },
            None => Self::empty(user_id),
        }
    }

    /// Summary for a user with no matching records.
    #[must_use]
    pub const fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            min_transaction_amount: 0.0,
            max_transaction_amount: 0.0,
            average_transaction_amount: 0.0,
        }
    }
}
