//! txn-summary HTTP client implementation.

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::error::ClientError;
use crate::types::{ErrorBody, ErrorDetail, HealthResponse, SummaryResponse, UploadResponse};

/// Format used for the `start_date` / `end_date` query parameters.
const QUERY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// txn-summary API client.
///
/// Provides methods for uploading transaction files and fetching summaries.
#[derive(Debug, Clone)]
pub struct TxnSummaryClient {
    client: Client,
    base_url: String,
}

impl TxnSummaryClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://localhost:8000"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the base URL is empty or the HTTP
    /// client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the base URL is empty or the HTTP
    /// client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Upload a CSV file of transactions.
    ///
    /// `file_name` is sent as the multipart file name; the service rejects names
    /// that do not end in `.csv`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the service's message if the file is
    /// rejected, or an HTTP error if the request fails.
    pub async fn upload_csv(
        &self,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<UploadResponse, ClientError> {
        let url = format!("{}/upload/", self.base_url);
        let file_name = file_name.into();

        let part = Part::bytes(bytes.into())
            .file_name(file_name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        tracing::debug!(%file_name, "Uploading transactions");

        let response = self.client.post(&url).multipart(form).send().await?;

        Self::handle_response(response).await
    }

    /// Get min/max/average transaction amounts for a user, inclusive of both bounds.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if `start` is after `end`, or an HTTP error if
    /// the request fails.
    pub async fn summary(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<SummaryResponse, ClientError> {
        let url = format!("{}/summary/{user_id}", self.base_url);
        let start_date = start.format(QUERY_TIMESTAMP_FORMAT).to_string();
        let end_date = end.format(QUERY_TIMESTAMP_FORMAT).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("start_date", start_date), ("end_date", end_date)])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Check service health.
    ///
    /// A degraded service answers `503` with a health body; that is returned as a
    /// response rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a health report.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let status = status.as_u16();
        match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(ErrorBody {
                detail: ErrorDetail::Message(detail),
            }) => Err(ClientError::Api { status, detail }),
            Ok(ErrorBody {
                detail: ErrorDetail::Fields(errors),
            }) => Err(ClientError::Validation { status, errors }),
            Err(_) => Err(ClientError::Api {
                status,
                detail: format!("HTTP {status}"),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = TxnSummaryClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = TxnSummaryClient::new("/").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[tokio::test]
    async fn upload_sends_multipart_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .and(body_string_contains("name=\"file\"; filename=\"january.csv\""))
            .and(body_string_contains("1,100,200,2023-01-01 12:00:00,50.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "Data saved succesfully." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let response = client
            .upload_csv(
                "january.csv",
                "transaction_id,user_id,product_id,timestamp,transaction_amount\n\
                 1,100,200,2023-01-01 12:00:00,50.0\n",
            )
            .await
            .unwrap();

        assert_eq!(response.message, "Data saved succesfully.");
    }

    #[tokio::test]
    async fn rejected_upload_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "detail": "Please upload a CSV file." })),
            )
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let err = client.upload_csv("notes.txt", "hello").await.unwrap_err();

        match err {
            ClientError::Api { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Please upload a CSV file.");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn summary_sends_formatted_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/100"))
            .and(query_param("start_date", "2023-01-01 00:00:00"))
            .and(query_param("end_date", "2023-12-31 23:59:59"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": 100,
                "min_transaction_amount": 50.0,
                "max_transaction_amount": 150.0,
                "average_transaction_amount": 100.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let summary = client
            .summary(100, at(2023, 1, 1, 0, 0, 0), at(2023, 12, 31, 23, 59, 59))
            .await
            .unwrap();

        assert_eq!(summary.user_id, 100);
        assert!((summary.max_transaction_amount - 150.0).abs() < f64::EPSILON);
        assert!((summary.average_transaction_amount - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn summary_keeps_fractional_seconds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/7"))
            .and(query_param("start_date", "2023-01-01 00:00:00.250"))
            .and(query_param("end_date", "2023-01-01 00:00:01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": 7,
                "min_transaction_amount": 0.0,
                "max_transaction_amount": 0.0,
                "average_transaction_amount": 0.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, 0, 250)
            .unwrap();
        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let summary = client
            .summary(7, start, at(2023, 1, 1, 0, 0, 1))
            .await
            .unwrap();

        assert_eq!(summary.user_id, 7);
    }

    #[tokio::test]
    async fn schema_errors_map_to_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [{
                    "type": "datetime_parsing",
                    "loc": ["query", "start_date"],
                    "msg": "Input should be a valid datetime",
                    "input": "soon"
                }]
            })))
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let err = client
            .summary(1, at(2023, 1, 1, 0, 0, 0), at(2023, 1, 2, 0, 0, 0))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        match err {
            ClientError::Validation { errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, "datetime_parsing");
                assert_eq!(errors[0].loc, vec!["query", "start_date"]);
                assert_eq!(errors[0].input, Some(json!("soon")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let err = client
            .summary(1, at(2023, 1, 1, 0, 0, 0), at(2023, 1, 2, 0, 0, 0))
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "HTTP 502");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn degraded_health_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "status": "degraded",
                "service": "txn-summary",
                "version": "0.1.0"
            })))
            .mount(&server)
            .await;

        let client = TxnSummaryClient::new(server.uri()).unwrap();
        let health = client.health().await.unwrap();

        assert!(!health.is_ok());
        assert_eq!(health.service, "txn-summary");
    }
}
