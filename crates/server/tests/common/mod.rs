//! Common test utilities for driving the router in process.
//!
//! The fixture wires the same in-memory collaborators the binary uses, so
//! tests issue real tickets and validate them over HTTP without a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use samlvalidate_core::{load_config_from_str, MemoryTicketRegistry, MemoryUsageStore};
use samlvalidate_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use samlvalidate_core::testing::fixtures;

/// Service registered in every fixture.
pub const SERVICE_URL: &str = "https://app.example.edu/";

/// Test fixture for in-process HTTP testing.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Ticket registry behind the router - issue tickets here
    pub tickets: Arc<MemoryTicketRegistry>,
    /// Usage records written by the tracking writer
    pub usage: Arc<MemoryUsageStore>,
    _writer: JoinHandle<()>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn is_saml_success(&self) -> bool {
        self.body
            .contains(r#"<samlp:StatusCode Value="samlp:Success"/>"#)
    }

    /// Text of `StatusMessage`, present on failure documents only.
    pub fn status_message(&self) -> Option<&str> {
        let start = self.body.find("<samlp:StatusMessage>")? + "<samlp:StatusMessage>".len();
        let end = self.body[start..].find("</samlp:StatusMessage>")?;
        Some(&self.body[start..start + end])
    }
}

/// Knobs for the fixture's configuration
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    pub udc_identifier: bool,
    pub session_max_age_ms: Option<u64>,
}

impl TestConfig {
    pub fn with_udc_identifier() -> Self {
        Self {
            udc_identifier: true,
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let session_max_age = test_config
            .session_max_age_ms
            .map(|ms| format!("session_max_age_ms = {}", ms))
            .unwrap_or_default();

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"
port = 9000

[saml]
udc_identifier = {udc}
issuer = "cas.example.edu"
{session_max_age}

[[services]]
name = "app"
url = "{service}"

[attributes.jdoe]
email = ["jdoe@example.edu"]
memberOf = ["staff", "faculty"]
"#,
            udc = test_config.udc_identifier,
            service = SERVICE_URL,
        ))
        .expect("Failed to parse test config");

        let usage = Arc::new(MemoryUsageStore::new());
        let (state, writer) = AppState::from_config(&config, usage.clone());
        let tickets = Arc::clone(state.tickets());
        let writer = tokio::spawn(writer.run());

        Self {
            router: create_router(Arc::new(state)),
            tickets,
            usage,
            _writer: writer,
        }
    }

    /// Start a session for `user` and issue a service ticket for `service`.
    pub fn issue_ticket(&self, user: &str, service: &str) -> String {
        let tgt = self
            .tickets
            .issue_ticket_granting_ticket(user)
            .expect("Failed to issue TGT");
        self.tickets
            .issue_service_ticket(&tgt.id, service)
            .expect("Failed to issue service ticket")
            .id
    }

    /// POST a SAML request for `ticket` with `TARGET` set to `target`.
    pub async fn validate(&self, target: Option<&str>, ticket: &str) -> TestResponse {
        let body = fixtures::saml_request("_req-1", ticket);
        self.post_with_content_type(&validate_path(target), &body, "text/xml")
            .await
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with custom content type (for testing wrong content types).
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }
}

/// `/samlValidate` with `target` percent-encoded into the query.
pub fn validate_path(target: Option<&str>) -> String {
    match target {
        Some(target) => format!("/samlValidate?TARGET={}", urlencoding::encode(target)),
        None => "/samlValidate".to_string(),
    }
}
