//! Retryable HTTP client used for remote configuration retrieval and
//! instance-metadata lookups.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};

/// Retry policy for outbound HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
    /// Maximum number of retries for transient failures.
    pub max_retries: u32,
    /// Base for the exponential backoff calculation.
    pub base_for_backoff: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Upper bound on the backoff delay.
    pub max_backoff: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_for_backoff: 2,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

/// Creates an HTTP client with exponential-backoff retry middleware for
/// transient errors such as network issues or rate limiting.
pub fn create_retryable_http_client(
    config: &HttpRetryConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let retry_policy = ExponentialBackoff::builder()
        .jitter(Jitter::Full)
        .base(config.base_for_backoff)
        .retry_bounds(config.initial_backoff, config.max_backoff)
        .build_with_max_retries(config.max_retries);

    let base_client = reqwest::Client::builder().connect_timeout(config.connect_timeout).build()?;

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
