//! Retry policy with deterministic exponential backoff
//!
//! Pure decision logic: given a failed attempt's classification and the
//! attempt number, decide retry-or-fail and compute the delay. No jitter is
//! applied; backoff is `base_delay * 2^attempt` exactly.

use std::time::Duration;

use super::error::HttpError;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, counting the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom maximum attempt count
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the base delay
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay applied after the given attempt fails: `base_delay * 2^attempt`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Decide whether a failed attempt is retried.
    ///
    /// Rules, in order:
    /// 1. 400 and 404 fail immediately (malformed request, missing resource)
    /// 2. exhausted attempts fail regardless of status
    /// 3. any other status below 500 except 429 fails (client error)
    /// 4. no status at all, 5xx, or 429 retries with exponential delay
    pub fn decide(&self, attempt: u32, failure: &HttpError) -> RetryDecision {
        if matches!(failure.status_code(), Some(400) | Some(404)) {
            return RetryDecision::Fail;
        }
        if attempt >= self.max_attempts {
            return RetryDecision::Fail;
        }
        if !failure.is_retryable() {
            return RetryDecision::Fail;
        }
        RetryDecision::Retry {
            delay: self.delay_for_attempt(attempt),
        }
    }
}

/// Decision on whether to retry a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the given delay
    Retry { delay: Duration },
    /// Give up and surface the failure
    Fail,
}
