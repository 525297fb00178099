//! HTTP client for the Starlink enterprise API
//!
//! Every request carries a bearer token from the injected [`TokenSource`]
//! and is bounded by a request timeout, so a hanging provider surfaces as a
//! timeout error instead of blocking the caller forever.

use crate::accounts::AccountManager;
use crate::auth::TokenSource;
use crate::retry::{RetryPolicy, with_retry};
use crate::service_lines::ServiceLineManager;
use crate::usage::UsageFetcher;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use skyusage_core::error::{Result, SkyusageError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://web-api.starlink.com";

/// Default per-request deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client; cheap to clone
#[derive(Clone)]
pub struct StarlinkClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for StarlinkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarlinkClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StarlinkClient {
    pub fn builder(tokens: Arc<dyn TokenSource>) -> StarlinkClientBuilder {
        StarlinkClientBuilder::new(tokens)
    }

    /// Account listing
    pub fn accounts(&self) -> AccountManager<'_> {
        AccountManager::new(self)
    }

    /// Service line listing and details
    pub fn service_lines(&self) -> ServiceLineManager<'_> {
        ServiceLineManager::new(self)
    }

    /// Billing-cycle usage queries
    pub fn usage(&self) -> UsageFetcher<'_> {
        UsageFetcher::new(self)
    }

    /// GET `endpoint` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let bearer = self.tokens.bearer_header().await?;
        debug!("GET {}", url);

        let response = with_retry(&self.retry, endpoint, || {
            self.http
                .get(&url)
                .header(AUTHORIZATION, &*bearer)
                .header(ACCEPT, "application/json")
                .send()
        })
        .await?;

        Self::decode(endpoint, response).await
    }

    /// POST a JSON body to `endpoint` and decode the JSON response
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let bearer = self.tokens.bearer_header().await?;
        debug!("POST {} with body {}", url, serde_json::to_string(body)?);

        let response = with_retry(&self.retry, endpoint, || {
            self.http
                .post(&url)
                .header(AUTHORIZATION, &*bearer)
                .header(ACCEPT, "application/json")
                .json(body)
                .send()
        })
        .await?;

        Self::decode(endpoint, response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SkyusageError::Api {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Builder for [`StarlinkClient`]
pub struct StarlinkClientBuilder {
    tokens: Arc<dyn TokenSource>,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    http: Option<reqwest::Client>,
}

impl StarlinkClientBuilder {
    fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            tokens,
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            http: None,
        }
    }

    /// Override the API base URL; a trailing slash is ignored
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a preconfigured HTTP client; the timeout setting is then ignored
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<StarlinkClient> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().timeout(self.timeout).build()?,
        };

        Ok(StarlinkClient {
            http,
            base_url: self.base_url,
            tokens: self.tokens,
            retry: self.retry,
        })
    }
}
