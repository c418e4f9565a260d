//! Core types and ingestion rules for txn-summary.
//!
//! This crate provides the pieces of the service that do not touch storage or HTTP:
//!
//! - **Records**: `TransactionRecord`, `StoredTransaction`
//! - **Timestamps**: `parse_timestamp` for CSV cells and query parameters
//! - **CSV import**: `decode_upload`, the typed-row decoder that validates an uploaded
//!   file and produces candidate records before anything is persisted
//! - **Summaries**: `AmountStats`, `TransactionSummary`
//!
//! # Validation order
//!
//! Uploads are validated in a fixed order and the first failure wins. The
//! `Display` text of each `IngestError` variant is the message returned to clients,
//! so changing the order or the wording changes the public API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod csv_import;
pub mod error;
pub mod record;
pub mod summary;
pub mod timestamp;

pub use csv_import::{decode_upload, REQUIRED_COLUMNS};
pub use error::{IngestError, Result, TimestampError};
pub use record::{StoredTransaction, TransactionRecord};
pub use summary::{AmountStats, TransactionSummary};
pub use timestamp::parse_timestamp;
