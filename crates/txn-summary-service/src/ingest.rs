//! CSV ingestion.
//!
//! Decodes an upload into a fully validated batch, then applies the whole batch
//! through the store in one transaction. Validation always completes before the
//! store is touched, so a rejected file never leaves partial state behind.

use txn_summary_core::decode_upload;
use txn_summary_store::Store;

use crate::error::ApiError;

/// Outcome of a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of rows processed. Rows that overwrote existing records count too.
    pub records_saved: u64,
}

/// Validate `bytes` as a CSV upload named `file_name` and upsert its rows.
///
/// # Errors
///
/// - `ApiError::BadRequest` with the client-facing message if the file is rejected.
/// - `ApiError::Internal` if the batch could not be committed; nothing is persisted.
pub async fn ingest<S>(store: &S, file_name: &str, bytes: &[u8]) -> Result<IngestReport, ApiError>
where
    S: Store + ?Sized,
{
    let records = decode_upload(file_name, bytes).map_err(|err| {
        tracing::warn!(file_name, error = %err, "Rejected CSV upload");
        ApiError::from(err)
    })?;

    let records_saved = store.upsert_batch(&records).await?;

    tracing::info!(file_name, records = records_saved, "Data saved successfully");

    Ok(IngestReport { records_saved })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use txn_summary_core::{AmountStats, StoredTransaction, TransactionRecord};
    use txn_summary_store::{Result as StoreResult, StoreError};

    use super::*;

    /// Store whose writes always fail, recording what it was asked to write.
    #[derive(Default)]
    struct BrokenStore {
        attempted: std::sync::Mutex<usize>,
    }

    #[async_trait]
    impl Store for BrokenStore {
        async fn upsert_batch(&self, records: &[TransactionRecord]) -> StoreResult<u64> {
            *self.attempted.lock().unwrap() += records.len();
            Err(StoreError::Corrupt("disk unavailable".into()))
        }

        async fn amount_stats(
            &self,
            _user_id: i64,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> StoreResult<Option<AmountStats>> {
            Ok(None)
        }

        async fn get_transaction(&self, _id: &str) -> StoreResult<Option<StoredTransaction>> {
            Ok(None)
        }

        async fn count_transactions(&self) -> StoreResult<u64> {
            Ok(0)
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    const VALID: &[u8] = b"transaction_id,user_id,product_id,timestamp,transaction_amount\n\
                           1,100,200,2023-01-01,50.0\n";

    #[tokio::test]
    async fn store_failures_are_internal_errors() {
        let store = BrokenStore::default();
        let err = ingest(&store, "data.csv", VALID).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(*store.attempted.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn rejected_files_never_reach_the_store() {
        let store = BrokenStore::default();
        let err = ingest(&store, "data.txt", VALID).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Please upload a CSV file."));
        assert_eq!(*store.attempted.lock().unwrap(), 0);
    }
}
