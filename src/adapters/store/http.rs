//! HTTP Planner Store - Implementation of `PlannerStore` over a JSON REST endpoint.
//!
//! # Protocol
//!
//! - `GET  {base_url}{planner_path}` returns the planner document
//! - `PUT  {base_url}{planner_path}` with the full document returns the stored document
//!
//! Both requests carry the session token as a bearer `Authorization` header.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpStoreConfig::new("https://planner.example.edu")
//!     .with_planner_path("/api/planner")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let store = HttpPlannerStore::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::domain::foundation::SessionToken;
use crate::ports::{PlannerStore, StoreError};

/// Longest response body echoed back in `StoreError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the HTTP planner store.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the planner service (no trailing slash needed).
    pub base_url: String,
    /// Path of the planner document (default: `/planner`).
    pub planner_path: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpStoreConfig {
    /// Creates a configuration for `base_url` with default path and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            planner_path: "/planner".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the planner document path.
    pub fn with_planner_path(mut self, path: impl Into<String>) -> Self {
        self.planner_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the planner document.
    pub fn planner_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.planner_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

impl From<&StoreConfig> for HttpStoreConfig {
    fn from(config: &StoreConfig) -> Self {
        Self::new(config.base_url.clone())
            .with_planner_path(config.planner_path.clone())
            .with_timeout(config.request_timeout())
    }
}

/// Planner store backed by an HTTP JSON endpoint.
pub struct HttpPlannerStore {
    config: HttpStoreConfig,
    client: Client,
}

impl HttpPlannerStore {
    /// Creates a new store with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the HTTP client cannot be built.
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Sends a request and maps transport failures.
    async fn send(&self, request: RequestBuilder, token: &SessionToken) -> Result<Response, StoreError> {
        request
            .bearer_auth(token.expose())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    StoreError::network(format!("Connection failed: {}", e))
                } else {
                    StoreError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses and decodes the JSON document.
    async fn read_document(response: Response) -> Result<Value, StoreError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "Planner store rejected the session");
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            tracing::error!(%status, "Planner store returned an error status");
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::InvalidPayload(e.to_string()))
    }
}

/// Largest index `<= max` that lies on a char boundary of `s`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0)
}

#[async_trait]
impl PlannerStore for HttpPlannerStore {
    async fn fetch(&self, token: &SessionToken) -> Result<Value, StoreError> {
        let url = self.config.planner_url();
        tracing::debug!(%url, "Fetching planner document");
        let response = self.send(self.client.get(&url), token).await?;
        Self::read_document(response).await
    }

    async fn save(&self, token: &SessionToken, payload: &Value) -> Result<Value, StoreError> {
        let url = self.config.planner_url();
        tracing::debug!(%url, "Saving planner document");
        let response = self.send(self.client.put(&url).json(payload), token).await?;
        Self::read_document(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn token() -> SessionToken {
        SessionToken::new("secret-token").unwrap()
    }

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn planner_url_joins_base_and_path() {
        let config = HttpStoreConfig::new("https://planner.example.edu/").with_planner_path("/api/planner");
        assert_eq!(config.planner_url(), "https://planner.example.edu/api/planner");

        let config = HttpStoreConfig::new("http://localhost:3000").with_planner_path("planner");
        assert_eq!(config.planner_url(), "http://localhost:3000/planner");
    }

    #[test]
    fn default_config_values() {
        let config = HttpStoreConfig::new("http://localhost");
        assert_eq!(config.planner_path, "/planner");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn floor_char_boundary_never_splits_characters() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("ção", 1), 0);
        assert_eq!(floor_char_boundary("ção", 2), 2);
    }

    #[tokio::test]
    async fn fetch_sends_bearer_token_and_parses_document() {
        let (base, server) = serve_once("200 OK", r#"{"planned_codes":["MC202"]}"#).await;
        let store = HttpPlannerStore::new(HttpStoreConfig::new(base)).unwrap();

        let doc = store.fetch(&token()).await.unwrap();
        assert_eq!(doc["planned_codes"], json!(["MC202"]));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /planner "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret-token"));
    }

    #[tokio::test]
    async fn save_puts_full_payload() {
        let (base, server) = serve_once("200 OK", r#"{"planned_codes":["MA111"],"revision":2}"#).await;
        let store = HttpPlannerStore::new(HttpStoreConfig::new(base)).unwrap();

        let payload = json!({ "planned_codes": ["MA111"], "keep": true });
        let stored = store.save(&token(), &payload).await.unwrap();
        assert_eq!(stored["revision"], 2);

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /planner "));
        assert!(request.contains(r#""keep":true"#));
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_unauthorized() {
        let (base, _server) = serve_once("401 Unauthorized", "{}").await;
        let store = HttpPlannerStore::new(HttpStoreConfig::new(base)).unwrap();
        assert!(matches!(store.fetch(&token()).await, Err(StoreError::Unauthorized)));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let (base, _server) = serve_once("503 Service Unavailable", r#"{"error":"maintenance"}"#).await;
        let store = HttpPlannerStore::new(HttpStoreConfig::new(base)).unwrap();

        match store.fetch(&token()).await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert!(body.contains("maintenance"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_payload() {
        let (base, _server) = serve_once("200 OK", "not json").await;
        let store = HttpPlannerStore::new(HttpStoreConfig::new(base)).unwrap();
        assert!(matches!(store.fetch(&token()).await, Err(StoreError::InvalidPayload(_))));
    }
}
