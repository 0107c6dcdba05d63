use crate::core::config::TseProviderConfig;
use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Transport-level retry for a single HTTP request.
///
/// Only connection failures and timeouts are retried; a response with any
/// status code is returned to the caller as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the first one (total runs = 1 + retries)
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &TseProviderConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) if attempt <= self.retries && is_transient(&err) => {
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt,
                        self.retries + 1,
                        err
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
