use configuration::RefdataConfig;
use std::future::Future;
use std::time::Duration;

/// A bounded fixed-delay retry policy.
///
/// Injected into the reference lookup rather than hardcoded there, so
/// tests can shrink the delay to zero and count attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between failed attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn from_config(config: &RefdataConfig) -> Self {
        Self::new(
            config.retry_attempts,
            Duration::from_secs(config.retry_delay_secs),
        )
    }
}

/// Runs `operation` under the policy, retrying while `is_retryable`
/// approves the error and attempts remain.
pub async fn retry_with_policy<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempts += 1;

                if !is_retryable(&err) || attempts >= policy.max_attempts {
                    return Err(err);
                }

                tracing::warn!(attempt = attempts, error = %err, "lookup failed, retrying");
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
