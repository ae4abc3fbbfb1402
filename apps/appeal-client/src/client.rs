use std::time::Duration;

use appeal_shared::{
    api::{AppealResponse, HealthResponse, ListResponse, SubmitResponse},
    Appeal, API_KEY_HEADER,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timeout - server took too long to respond")]
    Timeout,

    #[error("Cannot connect to server: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(e)
        }
    }
}

#[derive(Clone)]
pub struct AppealClient {
    client: Client,
    base_url: String,
    api_key: String,
    submit_timeout: Duration,
    health_timeout: Duration,
}

impl AppealClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
            api_key: api_key.trim().to_string(),
            submit_timeout: SUBMIT_TIMEOUT,
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, submit: Duration, health: Duration) -> Self {
        self.submit_timeout = submit;
        self.health_timeout = health;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn submit_url(&self) -> String {
        format!("{}/appeal", self.base_url)
    }

    pub async fn submit(&self, appeal: &Appeal) -> Result<SubmitResponse, ClientError> {
        let request = self
            .client
            .post(self.submit_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(appeal);

        self.execute(request, self.submit_timeout).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        self.execute(self.client.get(&url), self.health_timeout).await
    }

    pub async fn list(&self) -> Result<ListResponse, ClientError> {
        let url = format!("{}/appeals", self.base_url);
        let request = self.client.get(&url).header(API_KEY_HEADER, &self.api_key);
        self.execute(request, self.submit_timeout).await
    }

    pub async fn fetch(&self, id: &str) -> Result<Appeal, ClientError> {
        let url = format!("{}/appeal/{}", self.base_url, id.trim());
        let request = self.client.get(&url).header(API_KEY_HEADER, &self.api_key);
        let response: AppealResponse = self.execute(request, self.submit_timeout).await?;
        Ok(response.appeal)
    }

    /// Sends `request` and reads its body, aborting both once `limit` elapses.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        limit: Duration,
    ) -> Result<T, ClientError> {
        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, ClientError>((status, body))
        };

        let (status, body) = tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| ClientError::Timeout)??;

        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                message: error_message(status, &body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16())),
        Err(_) => "Unknown error".to_string(),
    }
}

fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("http://{}", url);
    }
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Best-effort connectivity check run alongside the form; only ever logs.
pub fn spawn_health_probe(client: AppealClient) -> JoinHandle<()> {
    tokio::spawn(async move {
        match client.health().await {
            Ok(health) => info!("Server connection successful: {}", health.message),
            Err(ClientError::Server { status, .. }) => {
                warn!("Server responded but may not be healthy: {}", status)
            }
            Err(e) => {
                warn!("Could not connect to server: {}", e);
                warn!("Server should be at: {}", client.base_url());
            }
        }
    })
}

/// User-facing text for a failed submission.
pub fn failure_message(error: &ClientError, submit_url: &str) -> String {
    let detail = match error {
        ClientError::Network(_) => format!(
            "Cannot connect to server.\n\n\
             Please check:\n\
             - Server is running (appeal-server)\n\
             - URL is correct: {}\n\
             - Run with RUST_LOG=debug for details",
            submit_url
        ),
        ClientError::Timeout => "Server took too long to respond. Try again.".to_string(),
        ClientError::Server { message, .. } if message.contains("API key") => {
            "Authentication failed. API key may be incorrect.".to_string()
        }
        ClientError::Server { message, .. } => message.clone(),
        ClientError::InvalidResponse(reason) => format!("Unexpected response: {}", reason),
    };

    format!("Failed to submit appeal. {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(normalize_base_url(" localhost:3001/api/ "), "http://localhost:3001/api");
        assert_eq!(normalize_base_url("https://appeals.example.com"), "https://appeals.example.com");
        let client = AppealClient::new("http://h/api//", "k");
        assert_eq!(client.submit_url(), "http://h/api/appeal");
    }

    #[test]
    fn error_message_prefers_server_text() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, br#"{"success":false,"message":"Missing required fields"}"#),
            "Missing required fields"
        );
        assert_eq!(error_message(status, br#"{"success":false}"#), "Server error: 400");
        assert_eq!(error_message(status, b"<html>oops</html>"), "Unknown error");
    }

    #[test]
    fn failure_messages_distinguish_causes() {
        let url = "http://localhost:3001/api/appeal";

        let timeout = failure_message(&ClientError::Timeout, url);
        assert_eq!(timeout, "Failed to submit appeal. Server took too long to respond. Try again.");

        let auth = failure_message(
            &ClientError::Server {
                status: StatusCode::FORBIDDEN,
                message: "Invalid API key".into(),
            },
            url,
        );
        assert_eq!(auth, "Failed to submit appeal. Authentication failed. API key may be incorrect.");

        let server = failure_message(
            &ClientError::Server {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Server error while saving appeal".into(),
            },
            url,
        );
        assert_eq!(server, "Failed to submit appeal. Server error while saving appeal");
    }
}
