//! Preset policies (AI, auth) with partial overrides.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::error::{FailureShape, RetryError};
use super::policy::{RetryPolicy, RetryPredicate};
use super::run::{OnRetry, RetryExecutor};

/// Partial override of a retry configuration. `None` keeps the preset value.
pub struct RetryOverrides<E> {
    pub max_attempts: Option<u32>,
    pub initial_delay: Option<Duration>,
    pub backoff_multiplier: Option<f64>,
    pub max_delay: Option<Duration>,
    pub should_retry: Option<Arc<dyn RetryPredicate<E>>>,
    pub on_retry: Option<OnRetry>,
}

impl<E> Default for RetryOverrides<E> {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_delay: None,
            backoff_multiplier: None,
            max_delay: None,
            should_retry: None,
            on_retry: None,
        }
    }
}

impl<E> fmt::Debug for RetryOverrides<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOverrides")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("should_retry", &self.should_retry.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

impl<E> RetryOverrides<E> {
    pub fn predicate<P>(mut self, predicate: P) -> Self
    where
        P: RetryPredicate<E> + 'static,
    {
        self.should_retry = Some(Arc::new(predicate));
        self
    }

    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    /// Timing fields of `base`, replaced where this override sets them.
    pub fn apply(&self, base: RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(base.max_attempts),
            initial_delay: self.initial_delay.unwrap_or(base.initial_delay),
            backoff_multiplier: self.backoff_multiplier.unwrap_or(base.backoff_multiplier),
            max_delay: self.max_delay.or(base.max_delay),
        }
    }
}

/// Run `operation` under the AI preset (3 attempts, 1.5s, x2) plus `overrides`.
pub async fn execute_ai_with_retry<T, E, F, Fut>(
    operation: F,
    overrides: RetryOverrides<E>,
) -> Result<T, RetryError<E>>
where
    E: FailureShape + fmt::Display + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::ai()
        .with_overrides(overrides)
        .run(operation)
        .await
}

/// Run `operation` under the auth preset (2 attempts, 500ms, x1.5) plus `overrides`.
pub async fn execute_auth_with_retry<T, E, F, Fut>(
    operation: F,
    overrides: RetryOverrides<E>,
) -> Result<T, RetryError<E>>
where
    E: FailureShape + fmt::Display + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::auth()
        .with_overrides(overrides)
        .run(operation)
        .await
}
