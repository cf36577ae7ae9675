use std::future::Future;

use tokio::time::{sleep, timeout};

use crate::config::RetryConfig;

use super::error::InferenceError;

pub async fn with_retry<T, F, Fut>(
    operation: &'static str,
    policy: &RetryConfig,
    mut op: F,
) -> Result<T, InferenceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, InferenceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = match timeout(policy.timeout, op(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::Timeout(policy.timeout)),
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(target: "inference", operation, attempt, "remote call recovered");
                }
                return Ok(value);
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= max_attempts => {
                tracing::warn!(
                    target: "inference",
                    operation,
                    attempt,
                    error = %err,
                    "remote call failed; no attempts left"
                );
                return Err(InferenceError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                tracing::warn!(
                    target: "inference",
                    operation,
                    attempt,
                    max_attempts,
                    error = %err,
                    "remote call failed; retrying"
                );
                sleep(policy.backoff).await;
                attempt += 1;
            }
        }
    }
}
