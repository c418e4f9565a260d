//! txn-summary Client SDK.
//!
//! This crate provides a client library for uploading transaction CSV files to
//! the txn-summary API and reading back per-user summaries.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use txn_summary_client::TxnSummaryClient;
//!
//! # async fn example() -> Result<(), txn_summary_client::ClientError> {
//! let client = TxnSummaryClient::new("http://localhost:8000")?;
//!
//! let csv = "transaction_id,user_id,product_id,timestamp,transaction_amount\n\
//!            1,100,200,2023-01-01 12:00:00,50.0\n";
//! client.upload_csv("january.csv", csv.as_bytes().to_vec()).await?;
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let summary = client.summary(100, start, end).await?;
//!
//! println!("Average: {}", summary.average_transaction_amount);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, TxnSummaryClient};
pub use error::ClientError;
pub use types::*;
