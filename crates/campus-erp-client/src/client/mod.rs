//! HTTP client for the Campus ERP API.

pub mod auth;
pub mod dashboard;
pub mod resources;

use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client holding the base URL and, once logged in, the access token.
#[derive(Debug, Clone)]
pub struct CampusErpClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CampusErpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with the bearer token attached.
    async fn get_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Maps error statuses to [`ClientError`], using the `error` field of the
    /// body as the message when there is one.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(ClientError::from);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&body);

        Err(match status.as_u16() {
            401 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            code => ClientError::ServerError {
                status: code,
                message,
            },
        })
    }
}

pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
