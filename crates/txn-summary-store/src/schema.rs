//! Database schema definitions.
//!
//! The table itself is created by the embedded migrations under `migrations/`.
//! This module holds the SQL the store issues against it.

/// Insert a record, or overwrite every non-key field when the `transaction_id`
/// already exists.
pub const UPSERT_TRANSACTION: &str = "\
INSERT INTO transactions (transaction_id, user_id, product_id, timestamp, transaction_amount)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (transaction_id) DO UPDATE SET
    user_id = excluded.user_id,
    product_id = excluded.product_id,
    timestamp = excluded.timestamp,
    transaction_amount = excluded.transaction_amount";

/// Aggregate amounts for one user over a closed timestamp range.
///
/// `MIN`/`MAX`/`AVG` are `NULL` when no row matches; `COUNT` is `0`.
pub const AMOUNT_STATS: &str = "\
SELECT COUNT(transaction_amount),
       MIN(transaction_amount),
       MAX(transaction_amount),
       AVG(transaction_amount)
FROM transactions
WHERE user_id = ?1
  AND timestamp >= ?2
  AND timestamp <= ?3";

/// Amounts matching the same filter as [`AMOUNT_STATS`].
pub const SELECT_AMOUNTS: &str = "\
SELECT transaction_amount
FROM transactions
WHERE user_id = ?1
  AND timestamp >= ?2
  AND timestamp <= ?3";

/// Look up one record by its natural key.
pub const SELECT_TRANSACTION: &str = "\
SELECT id, transaction_id, user_id, product_id, timestamp, transaction_amount
FROM transactions
WHERE transaction_id = ?1";

/// Count all stored records.
pub const COUNT_TRANSACTIONS: &str = "SELECT COUNT(*) FROM transactions";
