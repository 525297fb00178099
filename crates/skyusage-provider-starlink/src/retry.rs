//! Retry policy for provider requests
//!
//! Requests are not retried unless a policy with `max_retries > 0` is
//! injected into the client. When enabled, connection failures, timeouts,
//! rate limits (429) and server errors are retried with capped exponential
//! backoff plus random jitter.

use rand::Rng;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retry attempts after the initial request
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Random jitter as a fraction of the delay (0.0-1.0)
    pub jitter: f64,
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter: 0.1,
            retryable_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// No retries: every failure goes straight back to the caller
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        self.retryable_status_codes.contains(&status.as_u16())
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = (self.initial_delay_ms as f64) * self.backoff_multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay_ms as f64);

        let jitter_range = capped * self.jitter;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..jitter_range)
        } else {
            0.0
        };

        Duration::from_millis((capped + jitter).max(0.0) as u64)
    }
}

/// Whether a transport error is worth another attempt
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Run `make_request` until it succeeds or the policy gives up
///
/// A response with a non-retryable status is returned as-is; status
/// handling is the caller's job.
pub async fn with_retry<F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    make_request: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let max_attempts = policy.max_retries + 1;
    let mut attempt = 0;

    loop {
        let is_last = attempt + 1 >= max_attempts;

        match make_request().await {
            Ok(response) if !is_last && policy.should_retry_status(response.status()) => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    operation = operation,
                    status = %response.status(),
                    attempt = attempt + 1,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retryable status code, will retry after delay"
                );
                tokio::time::sleep(delay).await;
            }
            Ok(response) => {
                if attempt > 0 {
                    debug!(
                        operation = operation,
                        status = %response.status(),
                        attempt = attempt + 1,
                        "Request completed after retry"
                    );
                }
                return Ok(response);
            }
            Err(error) if !is_last && is_retryable_error(&error) => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    operation = operation,
                    error = %error,
                    attempt = attempt + 1,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retryable error, will retry after delay"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }

        attempt += 1;
    }
}
