//! Transaction record types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single transaction row, keyed by `transaction_id`.
///
/// Records are produced by the CSV decoder and written to storage with
/// last-write-wins semantics: a later upload with the same `transaction_id`
/// replaces every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Natural key, kept exactly as it appeared in the file.
    pub transaction_id: String,

    /// Owner of the transaction.
    pub user_id: i64,

    /// Product that was purchased.
    pub product_id: i64,

    /// When the transaction happened (zone-less).
    pub timestamp: NaiveDateTime,

    /// Amount that is aggregated by the summary endpoint.
    pub transaction_amount: f64,
}

impl TransactionRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        user_id: i64,
        product_id: i64,
        timestamp: NaiveDateTime,
        transaction_amount: f64,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            user_id,
            product_id,
            timestamp,
            transaction_amount,
        }
    }
}

/// A record as held by storage, with its surrogate row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    /// Storage-assigned identity. Not meaningful outside the store.
    pub id: i64,

    /// The persisted values.
    #[serde(flatten)]
    pub record: TransactionRecord,
}
