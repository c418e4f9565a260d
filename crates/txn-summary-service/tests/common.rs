//! Common test utilities for txn-summary integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;

use txn_summary_service::{create_router, AppState, ServiceConfig};
use txn_summary_store::SqliteStore;

/// Header row with every required column.
pub const HEADER: &str = "transaction_id,user_id,product_id,timestamp,transaction_amount\n";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle on the store behind the server.
    pub store: Arc<SqliteStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a harness after adjusting the default test configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("transactions.db");
        let store = Arc::new(
            SqliteStore::open(&db_path)
                .await
                .expect("Failed to open store"),
        );

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_url: format!("sqlite://{}", db_path.display()),
            database_max_connections: 5,
            cors_origins: vec!["*".into()],
            max_body_bytes: 16 * 1024 * 1024,
            request_timeout_seconds: 30,
        };
        adjust(&mut config);

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Upload `body` as a file named `file_name`.
    pub async fn upload(&self, file_name: &str, body: impl Into<Vec<u8>>) -> TestResponse {
        let part = Part::bytes(body.into())
            .file_name(file_name)
            .mime_type("text/csv");
        let form = MultipartForm::new().add_part("file", part);

        self.server.post("/upload/").multipart(form).await
    }

    /// Upload rows under the standard header as `data.csv`.
    pub async fn upload_rows(&self, rows: &str) -> TestResponse {
        self.upload("data.csv", format!("{HEADER}{rows}")).await
    }

    /// Request a summary.
    pub async fn summary(&self, user_id: &str, start_date: &str, end_date: &str) -> TestResponse {
        self.server
            .get(&format!("/summary/{user_id}"))
            .add_query_param("start_date", start_date)
            .add_query_param("end_date", end_date)
            .await
    }
}
