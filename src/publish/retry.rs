//! Bounded retry with per-attempt recovery for network operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{ReleaseError, Result};

/// Maximum backoff between attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Which failures are retried, and how often
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt; worst case is `max_retries + 1` attempts
    pub max_retries: u32,
    /// Predicate selecting retryable errors
    pub is_retryable: fn(&ReleaseError) -> bool,
    /// Delay before the first retry, doubled for every further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy with a custom predicate and no backoff
    pub fn new(max_retries: u32, is_retryable: fn(&ReleaseError) -> bool) -> Self {
        Self {
            max_retries,
            is_retryable,
            base_delay: Duration::ZERO,
        }
    }

    /// Retry network-class failures only
    pub fn transient(max_retries: u32) -> Self {
        Self::new(max_retries, ReleaseError::is_transient)
    }

    /// Set the exponential backoff base
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retrying after the failed `attempt`
    fn backoff(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }
}

/// Run `operation` under `policy` without a recovery step.
pub async fn execute_with_retry<T, Op, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: Op,
) -> Result<T>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    execute_with_recovery(policy, operation_name, operation, |_| async {
        Ok::<(), ReleaseError>(())
    })
    .await
}

/// Run `operation` under `policy`, calling `on_retry` between attempts.
///
/// `operation` receives the attempt index, starting at 0. When an attempt
/// fails with a retryable error and retries remain, `on_retry` is invoked
/// with the failed attempt's index before the next attempt. Recovery is
/// best-effort: its failure is logged and the retry proceeds. Errors the
/// policy does not consider retryable, and the error of the final attempt,
/// are returned unchanged.
pub async fn execute_with_recovery<T, Op, Fut, Rec, RecFut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: Op,
    mut on_retry: Rec,
) -> Result<T>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    Rec: FnMut(u32) -> RecFut,
    RecFut: Future<Output = Result<()>>,
{
    let mut attempt = 0u32;

    loop {
        let error = match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    log::info!(
                        "{} succeeded after {} retry(ies)",
                        operation_name,
                        attempt
                    );
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if !(policy.is_retryable)(&error) {
            log::debug!("{} failed with non-retryable error: {}", operation_name, error);
            return Err(error);
        }

        if attempt >= policy.max_retries {
            log::error!(
                "{} failed after {} attempt(s): {}",
                operation_name,
                attempt + 1,
                error
            );
            return Err(error);
        }

        log::warn!(
            "{} failed (attempt {}/{}): {}",
            operation_name,
            attempt + 1,
            policy.max_retries + 1,
            error
        );

        let delay = policy.backoff(attempt);
        if !delay.is_zero() {
            log::info!("Retrying {} in {:.1}s", operation_name, delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }

        if let Err(recovery_error) = on_retry(attempt).await {
            log::warn!(
                "Recovery before retrying {} failed: {}",
                operation_name,
                recovery_error
            );
        }

        attempt += 1;
    }
}
