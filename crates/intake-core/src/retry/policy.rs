use std::time::Duration;

use super::classify;
use super::error::{FailureShape, StopReason};

/// Decides whether a failure is worth another attempt.
///
/// Any `Fn(&E) -> bool` closure is a predicate, so callers can swap the
/// classification policy without touching the executor.
pub trait RetryPredicate<E>: Send + Sync {
    fn should_retry(&self, error: &E) -> bool;
}

impl<E, F> RetryPredicate<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        self(error)
    }
}

/// Retries network errors, 5xx and 429; see [`classify::default_should_retry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRetryPredicate;

impl<E: FailureShape> RetryPredicate<E> for DefaultRetryPredicate {
    fn should_retry(&self, error: &E) -> bool {
        classify::default_should_retry(Some(error))
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop and hand the failure to the caller.
    Stop(StopReason),
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy.
///
/// The delay before attempt `k + 1` is `initial_delay * backoff_multiplier^(k - 1)`,
/// never below `initial_delay`. There is no jitter, and no cap unless
/// `max_delay` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Optional upper bound on a single delay.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Policy for calls to the generative model: 3 attempts, 1.5s, x2.
    pub fn ai() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1500),
            backoff_multiplier: 2.0,
            max_delay: None,
        }
    }

    /// Policy for authentication calls: 2 attempts, 500ms, x1.5.
    pub fn auth() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(500),
            backoff_multiplier: 1.5,
            max_delay: None,
        }
    }

    /// Effective attempt limit (at least one).
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based) before the next one.
    ///
    /// Never shorter than `initial_delay`, even when `max_delay` is lower.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff_multiplier.powi(exp);
        let raw = Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX);
        let delay = raw.max(self.initial_delay);
        match self.max_delay {
            Some(cap) => delay.min(cap.max(self.initial_delay)),
            None => delay,
        }
    }

    /// Decide what to do after attempt `attempt` (1-based) failed.
    ///
    /// The attempt limit is checked first: the last attempt's failure is
    /// returned whatever `retryable` says.
    pub fn decide(&self, attempt: u32, retryable: bool) -> RetryDecision {
        if attempt >= self.attempts() {
            return RetryDecision::Stop(StopReason::Exhausted);
        }
        if !retryable {
            return RetryDecision::Stop(StopReason::NotRetryable);
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }
}
