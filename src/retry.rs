//! Bounded exponential backoff for provider calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::providers::ProviderError;

/// Longest wait honoured from a provider `retry-after` hint.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Retry limits for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Cap on the computed backoff.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Backoff before retry number `retry` (0-based): doubles each time,
    /// capped at `max_backoff`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Wait before retry number `retry`. A provider `retry-after` hint takes
    /// precedence over the computed backoff, clamped to [`MAX_RETRY_AFTER`].
    pub fn delay_for(&self, retry: u32, error: &ProviderError) -> Duration {
        match error.retry_after() {
            Some(hint) if hint > MAX_RETRY_AFTER => {
                warn!(
                    hint_secs = hint.as_secs(),
                    cap_secs = MAX_RETRY_AFTER.as_secs(),
                    "retry-after hint exceeds cap, clamping"
                );
                MAX_RETRY_AFTER
            }
            Some(hint) => hint,
            None => self.backoff(retry),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Run `op`, retrying transient failures according to `policy`.
///
/// Non-transient errors are returned immediately. After the retry budget is
/// spent the last error is returned.
///
/// # Errors
///
/// Returns the final [`ProviderError`] when no attempt succeeds.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: impl Display,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut retry: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && retry < policy.max_retries => {
                let delay = policy.delay_for(retry, &e);
                retry = retry.saturating_add(1);
                warn!(
                    target_item = %label,
                    retry,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "transient provider failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
