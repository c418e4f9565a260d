//! CSV upload decoding and validation.
//!
//! `decode_upload` turns an uploaded file into strongly-typed records in one
//! pass over the parsed table. Nothing is persisted here; the caller only ever
//! sees a complete, fully validated batch or the first error.
//!
//! Checks run in this order, and the first failure is returned:
//!
//! 1. file name ends with `.csv`
//! 2. payload is UTF-8 and not blank
//! 3. payload parses as CSV with a header row
//! 4. at least one data row
//! 5. all required columns are present
//! 6. every `timestamp` parses
//! 7. per row: `transaction_id` non-empty, then `product_id`, then `user_id`
//!    integral, then `transaction_amount` numeric

use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::error::{IngestError, Result};
use crate::record::TransactionRecord;
use crate::timestamp::parse_timestamp;

/// Columns every upload must contain.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "user_id",
    "product_id",
    "timestamp",
    "transaction_amount",
];

const CSV_EXTENSION: &str = ".csv";

const UTF8_BOM: char = '\u{feff}';

/// Decode and validate an uploaded CSV file.
///
/// Returns one record per data row, in file order. Rows sharing a
/// `transaction_id` are all returned; applying them in order makes the last one win.
///
/// # Errors
///
/// Returns the first `IngestError` hit by the checks listed in the module docs.
pub fn decode_upload(file_name: &str, bytes: &[u8]) -> Result<Vec<TransactionRecord>> {
    if !file_name.ends_with(CSV_EXTENSION) {
        return Err(IngestError::InvalidFileType);
    }

    let text = std::str::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding)?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    if text.trim().is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let table = RawTable::parse(text)?;

    if table.headers.is_empty() || table.rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let columns = ColumnIndex::resolve(&table.headers)?;
    let timestamps = coerce_timestamps(&table.rows, columns.timestamp)?;

    table
        .rows
        .iter()
        .zip(timestamps)
        .map(|(row, timestamp)| columns.materialize(row, timestamp))
        .collect()
}

/// The parsed but untyped contents of an upload.
struct RawTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(malformed)?.clone();
        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(malformed)?;

        Ok(Self { headers, rows })
    }
}

fn malformed(err: csv::Error) -> IngestError {
    tracing::debug!(error = %err, "CSV parser rejected upload");
    IngestError::MalformedCsv(err.to_string())
}

/// Positions of the required columns within a row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    transaction_id: usize,
    user_id: usize,
    product_id: usize,
    timestamp: usize,
    transaction_amount: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| (*name).to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            return Err(IngestError::MissingColumns(missing));
        }

        // All present, checked above.
        let index = |name: &str| position(name).unwrap_or_default();

        Ok(Self {
            transaction_id: index("transaction_id"),
            user_id: index("user_id"),
            product_id: index("product_id"),
            timestamp: index("timestamp"),
            transaction_amount: index("transaction_amount"),
        })
    }

    fn materialize(
        &self,
        row: &StringRecord,
        timestamp: NaiveDateTime,
    ) -> Result<TransactionRecord> {
        let transaction_id = cell(row, self.transaction_id);
        if transaction_id.is_empty() {
            tracing::debug!(line = line_of(row), "Empty transaction_id");
            return Err(IngestError::MissingTransactionId);
        }

        let product_id = parse_integer(cell(row, self.product_id)).ok_or_else(|| {
            reject(row, "product_id", cell(row, self.product_id));
            IngestError::NonIntegerProductId
        })?;

        let user_id = parse_integer(cell(row, self.user_id)).ok_or_else(|| {
            reject(row, "user_id", cell(row, self.user_id));
            IngestError::NonIntegerUserId
        })?;

        let transaction_amount =
            parse_amount(cell(row, self.transaction_amount)).ok_or_else(|| {
                reject(row, "transaction_amount", cell(row, self.transaction_amount));
                IngestError::InvalidAmount
            })?;

        Ok(TransactionRecord {
            transaction_id: transaction_id.to_string(),
            user_id,
            product_id,
            timestamp,
            transaction_amount,
        })
    }
}

fn reject(row: &StringRecord, column: &str, value: &str) {
    tracing::debug!(line = line_of(row), column, value, "Rejected CSV value");
}

/// Parse the whole `timestamp` column up front so one bad value rejects the batch
/// before any other per-row checks run.
fn coerce_timestamps(rows: &[StringRecord], column: usize) -> Result<Vec<NaiveDateTime>> {
    rows.iter()
        .map(|row| {
            parse_timestamp(cell(row, column)).map_err(|err| {
                tracing::debug!(line = line_of(row), error = %err, "Invalid timestamp");
                IngestError::InvalidTimestamp
            })
        })
        .collect()
}

fn cell(row: &StringRecord, column: usize) -> &str {
    row.get(column).unwrap_or_default()
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, csv::Position::line)
}

/// Integral values only: `12` and `-3` pass, `12.0`, `1e3` and `abc` do not.
fn parse_integer(value: &str) -> Option<i64> {
    value.parse().ok()
}

fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
