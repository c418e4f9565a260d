//! Error types for txn-summary ingestion.

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Reasons an uploaded CSV file is rejected.
///
/// The `Display` output of every variant is the exact `detail` message sent back
/// to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// The file name does not end with `.csv`.
    #[error("Please upload a CSV file.")]
    InvalidFileType,

    /// The payload is not valid UTF-8.
    #[error("Uploaded CSV file must be UTF-8 encoded.")]
    InvalidEncoding,

    /// The payload is blank, has no header, or has no data rows.
    #[error("Uploaded CSV file is empty.")]
    EmptyFile,

    /// The CSV parser rejected the payload.
    #[error("Could not parse CSV file: {0}")]
    MalformedCsv(String),

    /// One or more required columns are absent. Names are sorted.
    #[error("CSV file is missing required columns: {}", format_column_list(.0))]
    MissingColumns(Vec<String>),

    /// At least one `timestamp` value is not a date-time.
    #[error("Invalid Timestamp. Use YYYY-MM-DD")]
    InvalidTimestamp,

    /// A row has an empty `transaction_id`.
    #[error("transaction_id must not be empty.")]
    MissingTransactionId,

    /// A row has a `product_id` that is not an integer.
    #[error("product_id must be integers.")]
    NonIntegerProductId,

    /// A row has a `user_id` that is not an integer.
    #[error("user_id must be integers.")]
    NonIntegerUserId,

    /// A row has a `transaction_amount` that is not a finite number.
    #[error("transaction_amount must be numbers.")]
    InvalidAmount,
}

/// Error returned when a string is not a recognized date-time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date-time: {input:?}")]
pub struct TimestampError {
    /// The rejected input.
    pub input: String,
}

/// Render column names the way clients already expect them: `['a', 'b']`.
fn format_column_list(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_single() {
        let err = IngestError::MissingColumns(vec!["product_id".into()]);
        assert_eq!(
            err.to_string(),
            "CSV file is missing required columns: ['product_id']"
        );
    }

    #[test]
    fn missing_columns_message_multiple() {
        let err = IngestError::MissingColumns(vec!["product_id".into(), "user_id".into()]);
        assert_eq!(
            err.to_string(),
            "CSV file is missing required columns: ['product_id', 'user_id']"
        );
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(
            IngestError::InvalidFileType.to_string(),
            "Please upload a CSV file."
        );
        assert_eq!(
            IngestError::EmptyFile.to_string(),
            "Uploaded CSV file is empty."
        );
        assert_eq!(
            IngestError::InvalidTimestamp.to_string(),
            "Invalid Timestamp. Use YYYY-MM-DD"
        );
        assert_eq!(
            IngestError::NonIntegerProductId.to_string(),
            "product_id must be integers."
        );
        assert_eq!(
            IngestError::NonIntegerUserId.to_string(),
            "user_id must be integers."
        );
    }
}
