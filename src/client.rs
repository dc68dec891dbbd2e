//! Client for the auth backend

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::time::Duration;

use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest, UserRecord};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Backend operations the auth controller depends on
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Look up the user a token belongs to
    async fn me(&self, token: &str) -> Result<UserRecord>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    /// Tell the backend the session is over. Callers treat this as best effort.
    async fn logout(&self, token: &str) -> Result<()>;
}

/// JSON-over-HTTP implementation of [`AuthBackend`]
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn me(&self, token: &str) -> Result<UserRecord> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        // Accept both `{"user": {...}}` and a bare record
        let record = match value {
            serde_json::Value::Object(mut map) if map.contains_key("user") => {
                map.remove("user").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(record)?)
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        read_auth_response(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        read_auth_response(response).await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        Ok(())
    }
}

async fn read_auth_response(response: Response) -> Result<AuthResponse> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(rejection(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| Error::Backend {
        status: status.as_u16(),
        message: format!("malformed response: {}", e),
    })
}

/// Build a backend error, preferring the message the backend sent
fn rejection(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<AuthResponse>(body)
        .ok()
        .and_then(|parsed| parsed.reason().map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Error::Backend {
        status: status.as_u16(),
        message,
    }
}
