use super::auth::{self, Credentials, TokenCache};
use super::error::{CephApiError, Result};
use crate::config::{Settings, TlsMode};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Versioned media types of the manager REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V0_1,
    V1_0,
    V1_1,
    V1_3,
}

impl ApiVersion {
    pub fn media_type(self) -> &'static str {
        match self {
            ApiVersion::V0_1 => "application/vnd.ceph.api.v0.1+json",
            ApiVersion::V1_0 => "application/vnd.ceph.api.v1.0+json",
            ApiVersion::V1_1 => "application/vnd.ceph.api.v1.1+json",
            ApiVersion::V1_3 => "application/vnd.ceph.api.v1.3+json",
        }
    }
}

/// Authenticated client for the Ceph Manager REST API.
///
/// One instance is shared by every tool call. It logs in lazily, reuses the
/// session token until shortly before it expires and retries server errors
/// and transport failures with exponential backoff.
pub struct CephClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    tokens: TokenCache,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl CephClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent());

        builder = match settings.tls_mode() {
            TlsMode::Disabled => {
                warn!("TLS certificate verification disabled for the manager connection");
                builder.danger_accept_invalid_certs(true)
            }
            TlsMode::CustomCa(path) => {
                let pem = std::fs::read(&path).map_err(|e| {
                    CephApiError::Config(format!("failed to read CA file {:?}: {}", path, e))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    CephApiError::Config(format!("invalid CA file {:?}: {}", path, e))
                })?;
                builder.add_root_certificate(cert)
            }
            TlsMode::System => builder,
        };

        let http = builder
            .build()
            .map_err(|e| CephApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.manager_url.trim_end_matches('/').to_string(),
            credentials: Credentials {
                username: settings.username.clone(),
                password: settings.password.clone(),
            },
            tokens: TokenCache::default(),
            max_attempts: settings.max_retries.max(1),
            retry_backoff: Duration::from_secs(1),
        })
    }

    /// Override the first retry delay (doubled on every further attempt).
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in now instead of on the first request.
    pub async fn authenticate(&self) -> Result<()> {
        self.bearer_token().await.map(|_| ())
    }

    pub(crate) async fn get(&self, path: &str, version: ApiVersion) -> Result<Value> {
        self.request(Method::GET, path, version, None).await
    }

    pub(crate) async fn put(&self, path: &str, version: ApiVersion, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, version, Some(body)).await
    }

    async fn bearer_token(&self) -> Result<String> {
        self.tokens
            .bearer(|| auth::login(&self.http, &self.base_url, &self.credentials))
            .await
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        version: ApiVersion,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 1..=self.max_attempts {
            let token = self.bearer_token().await?;
            debug!(method = %method, endpoint = %path, attempt, "manager API request");

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&token)
                .header(ACCEPT, version.media_type())
                .header(CONTENT_TYPE, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    if attempt < self.max_attempts {
                        let delay = self.backoff(attempt);
                        warn!(endpoint = %path, attempt, error = %e, "request failed, retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(CephApiError::Request(format!(
                        "Request failed after {} attempts: {}",
                        self.max_attempts, e
                    )));
                }
            };

            let status = response.status();
            match status {
                StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                    let bytes = response.bytes().await.map_err(|e| {
                        CephApiError::Request(format!("Failed to read response body: {}", e))
                    })?;
                    return decode_body(&bytes);
                }
                StatusCode::UNAUTHORIZED => {
                    self.tokens.invalidate().await;
                    return Err(status_error(
                        status,
                        "Authentication failed. Check username and password.",
                    ));
                }
                StatusCode::FORBIDDEN => {
                    return Err(status_error(
                        status,
                        "Access forbidden. Check user permissions.",
                    ));
                }
                StatusCode::NOT_FOUND => {
                    return Err(status_error(status, format!("Endpoint not found: {}", path)));
                }
                s if s.is_server_error() => {
                    if attempt < self.max_attempts {
                        let delay = self.backoff(attempt);
                        warn!(endpoint = %path, attempt, status = s.as_u16(), "server error, retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(status_error(s, format!("Server error: {}", s.as_u16())));
                }
                s => {
                    return Err(status_error(
                        s,
                        format!("Unexpected response: {}", s.as_u16()),
                    ));
                }
            }
        }

        Err(CephApiError::Request(format!(
            "Request failed after {} attempts",
            self.max_attempts
        )))
    }
}

fn status_error(status: StatusCode, message: impl Into<String>) -> CephApiError {
    CephApiError::Status {
        status: status.as_u16(),
        message: message.into(),
    }
}

fn decode_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| CephApiError::Decode(e.to_string()))
}
