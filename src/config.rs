//! Runtime configuration
//!
//! Validates the connection arguments once and turns them into a ready
//! [`StarlinkClient`].

use crate::cli::ConnectionArgs;
use skyusage_core::error::{Result, SkyusageError};
use skyusage_provider_starlink::{
    ClientCredentials, RetryPolicy, StarlinkClient, StaticToken, TokenSource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How requests are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth2 client-credentials exchange
    Client { id: String, secret: String },
    /// Bearer token supplied by the caller
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Client { id, .. } => f
                .debug_struct("Client")
                .field("id", id)
                .finish_non_exhaustive(),
            Credentials::Token(_) => f.write_str("Token(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub api_url: String,
    pub token_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Settings {
    /// Validate connection arguments
    ///
    /// A bearer token takes precedence over client credentials.
    pub fn from_args(args: &ConnectionArgs) -> Result<Self> {
        let credentials = match (
            non_empty(&args.token),
            non_empty(&args.client_id),
            non_empty(&args.client_secret),
        ) {
            (Some(token), _, _) => Credentials::Token(token.to_string()),
            (None, Some(id), Some(secret)) => Credentials::Client {
                id: id.to_string(),
                secret: secret.to_string(),
            },
            _ => {
                return Err(SkyusageError::Config(
                    "STARLINK_CLIENT_ID and STARLINK_CLIENT_SECRET must be set (or pass --token)"
                        .into(),
                ));
            }
        };

        if args.timeout == 0 {
            return Err(SkyusageError::Config("timeout must be at least 1 second".into()));
        }

        Ok(Self {
            credentials,
            api_url: args.api_url.clone(),
            token_url: args.token_url.clone(),
            timeout: Duration::from_secs(args.timeout),
            retry: RetryPolicy::default().with_max_retries(args.retries),
        })
    }

    /// Build an authenticated client
    pub fn build_client(&self) -> Result<StarlinkClient> {
        let http = reqwest_client(self.timeout)?;

        let tokens: Arc<dyn TokenSource> = match &self.credentials {
            Credentials::Client { id, secret } => Arc::new(ClientCredentials::new(
                http.clone(),
                self.token_url.clone(),
                id.clone(),
                secret.clone(),
            )),
            Credentials::Token(token) => Arc::new(StaticToken::new(token)),
        };

        debug!(
            "Using API {} with timeout {:?} and {} retries",
            self.api_url, self.timeout, self.retry.max_retries
        );

        StarlinkClient::builder(tokens)
            .base_url(self.api_url.clone())
            .retry(self.retry.clone())
            .http_client(http)
            .build()
    }
}

fn reqwest_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
