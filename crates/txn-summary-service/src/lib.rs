//! txn-summary HTTP API Service.
//!
//! This crate provides the HTTP API for txn-summary:
//!
//! - CSV upload: validate a file of transactions and upsert it by `transaction_id`
//! - Summaries: min/max/average transaction amount for a user over a date range
//! - Health checks
//!
//! Error bodies always have the form `{"detail": ...}`: a message string for
//! rejected input, or a list of field errors for schema-level problems (422).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod routes;
pub mod state;
pub mod summary;

pub use config::ServiceConfig;
pub use error::{ApiError, FieldError, FieldSource};
pub use ingest::{ingest, IngestReport};
pub use routes::create_router;
pub use state::AppState;
pub use summary::summarize;
