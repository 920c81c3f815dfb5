//! Beacon HTTP Client
//!
//! A small, type-safe HTTP client for the game-server management API.
//!
//! The monitor uses it to discover instances, read the current user's
//! rights, and list, fetch and cancel jobs. Failures are classified so the
//! caller can tell an expected exclusion (access denied) or a recoverable
//! topology change (instance offline) apart from a generic failure.
//!
//! # Example
//!
//! ```no_run
//! use beacon_client::ServerClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ServerClient::new("http://localhost:5000").with_token("secret");
//!
//!     for instance in client.list_instances().await? {
//!         println!("{} online={}", instance.id, instance.online);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod instances;
mod jobs;
mod users;

// Re-export commonly used types
pub use error::{ClientError, Result};

use beacon_core::dto::error::ErrorMessage;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the server API
///
/// Endpoints are organized into logical groups:
/// - Instances and per-instance permission sets
/// - Current user profile
/// - Job listing, lookup and cancellation
#[derive(Debug, Clone)]
pub struct ServerClient {
    /// Base URL of the server (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token attached to every request, if any
    token: Option<String>,
}

impl ServerClient {
    /// Create a new server client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server API (e.g., "http://localhost:5000")
    ///
    /// # Example
    /// ```
    /// use beacon_client::ServerClient;
    ///
    /// let client = ServerClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new server client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use beacon_client::ServerClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ServerClient::with_client("http://localhost:5000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.authorized(self.client.get(url))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &body));
        }

        Ok(())
    }
}

/// Classify a non-success response
fn error_from_status(status: StatusCode, body: &str) -> ClientError {
    let parsed = ErrorMessage::parse(body);
    let message = parsed
        .message
        .clone()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    tracing::debug!(
        "API request failed with status {} (error code {:?}): {}",
        status,
        parsed.error_code,
        message
    );

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::AccessDenied(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT if parsed.is_instance_offline() => {
            ClientError::InstanceOffline(message)
        }
        _ => ClientError::api_error(status.as_u16(), message),
    }
}
