//! `SQLite` storage implementation.
//!
//! This module provides the `SqliteStore` implementation of the `Store` trait.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;

use txn_summary_core::{AmountStats, StoredTransaction, TransactionRecord};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::Store;

/// Embedded schema migrations.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool size used by [`SqliteStore::open`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// SQLite-backed storage implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the database at `url` and bring its schema up to date.
    ///
    /// The database file is created if it does not exist. `sqlite::memory:` is
    /// accepted and shared by every connection in the pool; the pool then keeps
    /// one connection open for its whole life so the database is never dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened, or a
    /// migration fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?;
        let mut pool = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if is_in_memory(url) {
            pool = pool
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        Self::with_options(options, pool).await
    }

    /// Open or create a database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or a migration fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path);
        let pool = SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS);
        Self::with_options(options, pool).await
    }

    async fn with_options(options: SqliteConnectOptions, pool: SqlitePoolOptions) -> Result<Self> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = pool.connect_with(options).await?;

        MIGRATOR.run(&pool).await?;
        tracing::debug!("Database schema is up to date");

        Ok(Self { pool })
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Mean of the matching amounts without ever forming their sum.
    async fn running_mean(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<f64> {
        let amounts: Vec<f64> = sqlx::query_scalar(schema::SELECT_AMOUNTS)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(user_id, rows = amounts.len(), "Recomputing overflowed average");

        let (mut mean, mut n) = (0.0, 0.0);
        for amount in amounts {
            n += 1.0;
            mean += (amount - mean) / n;
        }
        Ok(mean)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_batch(&self, records: &[TransactionRecord]) -> Result<u64> {
        // Dropping `tx` without commit rolls the whole batch back.
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(schema::UPSERT_TRANSACTION)
                .bind(&record.transaction_id)
                .bind(record.user_id)
                .bind(record.product_id)
                .bind(record.timestamp)
                .bind(record.transaction_amount)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(u64::try_from(records.len()).unwrap_or(u64::MAX))
    }

    async fn amount_stats(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<AmountStats>> {
        let (count, min, max, avg): (i64, Option<f64>, Option<f64>, Option<f64>) =
            sqlx::query_as(schema::AMOUNT_STATS)
                .bind(user_id)
                .bind(start)
                .bind(end)
                .fetch_one(&self.pool)
                .await?;

        match (count, min, max, avg) {
            (0, ..) => Ok(None),
            (count, Some(min), Some(max), Some(avg)) => {
                let avg = if avg.is_finite() {
                    avg
                } else {
                    // SQLite sums before dividing, which overflows near f64::MAX.
                    self.running_mean(user_id, start, end).await?
                };

                Ok(Some(AmountStats {
                    count: u64::try_from(count)
                        .map_err(|_| StoreError::Corrupt(format!("negative count: {count}")))?,
                    min,
                    max,
                    avg,
                }))
            }
            _ => Err(StoreError::Corrupt(
                "aggregate is NULL for a non-empty set".to_string(),
            )),
        }
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<StoredTransaction>> {
        sqlx::query(schema::SELECT_TRANSACTION)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| decode_transaction(&row))
            .transpose()
    }

    async fn count_transactions(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(schema::COUNT_TRANSACTIONS)
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|_| StoreError::Corrupt(format!("negative count: {count}")))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether `url` names an in-memory database rather than a file.
fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn decode_transaction(row: &SqliteRow) -> Result<StoredTransaction> {
    Ok(StoredTransaction {
        id: row.try_get("id")?,
        record: TransactionRecord {
            transaction_id: row.try_get("transaction_id")?,
            user_id: row.try_get("user_id")?,
            product_id: row.try_get("product_id")?,
            timestamp: row.try_get("timestamp")?,
            transaction_amount: row.try_get("transaction_amount")?,
        },
    })
}
