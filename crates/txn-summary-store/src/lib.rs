//! Storage layer for txn-summary.
//!
//! This crate owns the persisted `transactions` table. It provides an atomic,
//! batch-wide upsert keyed by `transaction_id` and the filtered aggregate query
//! used by the summary endpoint.
//!
//! # Sessions
//!
//! `SqliteStore` wraps a connection pool that is created once at startup. Every
//! call checks a connection out for its own duration and returns it on every exit
//! path, so concurrent requests never share a live session.
//!
//! # Example
//!
//! ```no_run
//! use txn_summary_store::{SqliteStore, Store};
//!
//! # async fn example() -> txn_summary_store::Result<()> {
//! let store = SqliteStore::connect("sqlite://transactions.db", 5).await?;
//! let stored = store.count_transactions().await?;
//! println!("{stored} transactions stored");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use txn_summary_core::{AmountStats, StoredTransaction, TransactionRecord};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so the ingestion and summary services
/// can be exercised against any backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or overwrite every record in one transaction.
    ///
    /// Records are applied in order, so a `transaction_id` repeated within the
    /// batch ends up with the values of its last occurrence. Either the whole
    /// batch is committed or nothing is.
    ///
    /// Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement or the commit fails.
    async fn upsert_batch(&self, records: &[TransactionRecord]) -> Result<u64>;

    /// Aggregate `transaction_amount` for a user with `start <= timestamp <= end`.
    ///
    /// Returns `None` when no record matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn amount_stats(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<AmountStats>>;

    /// Get a record by its natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<StoredTransaction>>;

    /// Count all stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_transactions(&self) -> Result<u64>;

    /// Check that the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be used.
    async fn ping(&self) -> Result<()>;
}
