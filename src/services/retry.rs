use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::errors::GenerationError;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.llm_max_attempts.max(1),
            backoff: config.retry_backoff(),
        }
    }

    pub fn no_backoff(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Duration::ZERO,
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error or the attempts run out.
/// Only `Unavailable` is retried; the wait grows linearly with the attempt number.
pub async fn retry_unavailable<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                log::warn!(
                    "{} attempt {}/{} failed: {}",
                    label,
                    attempt,
                    policy.max_attempts,
                    err
                );
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_retryable() {
                    log::error!("{} gave up after {} attempts: {}", label, attempt, err);
                }
                return Err(err);
            }
        }
    }
}
