use super::client::ApiVersion;
use super::error::{CephApiError, Result};
use crate::config::Password;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::future::Future;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{debug, info};

/// Token lifetime assumed when the manager does not send a `ttl`
pub(crate) const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(28_800);

/// A token is refreshed this long before it expires
pub(crate) const REFRESH_BUFFER: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub(crate) struct Credentials {
    pub username: String,
    pub password: Password,
}

#[derive(Debug, Clone)]
pub(crate) struct SessionToken {
    value: String,
    expires_at: Instant,
}

impl SessionToken {
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_usable(&self, now: Instant) -> bool {
        now + REFRESH_BUFFER < self.expires_at
    }
}

#[derive(Deserialize)]
struct AuthReply {
    token: Option<String>,
    ttl: Option<u64>,
}

/// Caches the manager session token. The mutex is held across a refresh, so
/// concurrent callers wait for one login instead of issuing their own.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    session: Mutex<Option<SessionToken>>,
}

impl TokenCache {
    pub async fn bearer<F, Fut>(&self, login: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SessionToken>>,
    {
        let mut session = self.session.lock().await;

        if let Some(token) = session.as_ref() {
            if token.is_usable(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("session token expiring, refreshing");
        }

        let fresh = login().await?;
        let value = fresh.value.clone();
        *session = Some(fresh);
        Ok(value)
    }

    pub async fn invalidate(&self) {
        self.session.lock().await.take();
    }
}

/// `POST /api/auth` and turn the reply into a session token.
pub(crate) async fn login(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<SessionToken> {
    let url = format!("{}/api/auth", base_url);
    debug!(url = %url, username = %credentials.username, "authenticating with manager");

    let response = http
        .post(&url)
        .header(ACCEPT, ApiVersion::V1_0.media_type())
        .json(&serde_json::json!({
            "username": credentials.username,
            "password": credentials.password.expose(),
        }))
        .send()
        .await
        .map_err(|e| {
            CephApiError::Authentication(format!("Network error during authentication: {}", e))
        })?;

    match response.status() {
        StatusCode::CREATED => {
            let reply: AuthReply = response.json().await.map_err(|e| {
                CephApiError::Authentication(format!("Invalid authentication response: {}", e))
            })?;
            let token = reply.token.filter(|t| !t.is_empty()).ok_or_else(|| {
                CephApiError::Authentication("No token received from authentication".to_string())
            })?;
            let ttl = reply.ttl.map(Duration::from_secs).unwrap_or(DEFAULT_TOKEN_TTL);
            info!(ttl_seconds = ttl.as_secs(), "authenticated with manager");
            Ok(SessionToken::new(token, ttl))
        }
        StatusCode::BAD_REQUEST => Err(CephApiError::Authentication(
            "Invalid credentials provided".to_string(),
        )),
        StatusCode::UNAUTHORIZED => Err(CephApiError::Authentication(
            "Authentication failed - check username and password".to_string(),
        )),
        status => {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.trim();
            let message = if detail.is_empty() {
                format!("Authentication failed with status {}", status.as_u16())
            } else {
                format!(
                    "Authentication failed with status {}: {}",
                    status.as_u16(),
                    detail
                )
            };
            Err(CephApiError::Authentication(message))
        }
    }
}
