//! Bearer token acquisition
//!
//! The enterprise API accepts OAuth2 client-credentials tokens. Tokens are
//! cached as pre-formatted `Bearer ...` header values and refreshed shortly
//! before they expire, so every request can ask for a token without paying
//! for a round trip to the token endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use skyusage_core::error::{Result, SkyusageError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://www.starlink.com/api/auth/connect/token";

/// Refresh this long before the provider-reported expiry
const TOKEN_REFRESH_BUFFER_SECS: u64 = 60;

/// Lifetime assumed when the token response carries no `expires_in`
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Source of the `Authorization` header value for API requests
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// A valid `Bearer ...` header value, fresh or cached
    async fn bearer_header(&self) -> Result<Arc<str>>;
}

/// A pre-issued token used as-is
#[derive(Clone)]
pub struct StaticToken {
    bearer_header: Arc<str>,
}

impl StaticToken {
    pub fn new(token: &str) -> Self {
        Self {
            bearer_header: format!("Bearer {token}").into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_header(&self) -> Result<Arc<str>> {
        Ok(self.bearer_header.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    bearer_header: Arc<str>,
    /// Expiry with the refresh buffer already applied
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// OAuth2 client-credentials token source with caching
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached_token: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached_token: RwLock::new(None),
        }
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SkyusageError::Auth(format!("Token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SkyusageError::Auth(format!("Token response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(SkyusageError::Auth(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| SkyusageError::Auth(format!("Token parse error: {e}, body: {body}")))?;
        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SkyusageError::Auth("Access token not found in response".into()))?;

        let expires_in = parsed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let lifetime = Duration::from_secs(expires_in)
            .saturating_sub(Duration::from_secs(TOKEN_REFRESH_BUFFER_SECS));
        debug!("Acquired new access token, expires in {} seconds", expires_in);

        Ok(CachedToken {
            bearer_header: format!("Bearer {access_token}").into(),
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn bearer_header(&self) -> Result<Arc<str>> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref cached) = *cache
                && !cached.is_expired()
            {
                return Ok(cached.bearer_header.clone());
            }
        }

        let mut cache = self.cached_token.write().await;

        // another task may have refreshed while we waited for the write lock
        if let Some(ref cached) = *cache
            && !cached.is_expired()
        {
            return Ok(cached.bearer_header.clone());
        }

        let fresh = self.fetch_token().await?;
        let header = fresh.bearer_header.clone();
        *cache = Some(fresh);
        Ok(header)
    }
}
