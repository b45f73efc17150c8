//! Retry loop: run an async operation until success or the policy says stop.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::error::{FailureShape, RetryError};
use super::policy::{DefaultRetryPredicate, RetryDecision, RetryPolicy, RetryPredicate};
use super::preset::RetryOverrides;

/// Observer called with the failed attempt number and the delay before the next attempt.
pub type OnRetry = Arc<dyn Fn(u32, Duration) + Send + Sync>;

/// Runs a failable async operation with exponential backoff.
///
/// The executor holds no per-call state: every [`RetryExecutor::run`] owns its
/// attempt counter, so one executor can serve concurrent callers. There is no
/// built-in timeout or cancellation; race the returned future against your
/// own signal and drop it to cancel.
pub struct RetryExecutor<E> {
    policy: RetryPolicy,
    predicate: Arc<dyn RetryPredicate<E>>,
    on_retry: Option<OnRetry>,
}

impl<E> Clone for RetryExecutor<E> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            predicate: Arc::clone(&self.predicate),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryExecutor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", &self.policy)
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: FailureShape + 'static> RetryExecutor<E> {
    /// Executor using the default retryability predicate.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_predicate(policy, DefaultRetryPredicate)
    }

    /// Executor with the AI preset (3 attempts, 1.5s, x2).
    pub fn ai() -> Self {
        Self::new(RetryPolicy::ai())
    }

    /// Executor with the auth preset (2 attempts, 500ms, x1.5).
    pub fn auth() -> Self {
        Self::new(RetryPolicy::auth())
    }
}

impl<E> RetryExecutor<E> {
    pub fn with_predicate<P>(policy: RetryPolicy, predicate: P) -> Self
    where
        P: RetryPredicate<E> + 'static,
    {
        Self {
            policy,
            predicate: Arc::new(predicate),
            on_retry: None,
        }
    }

    /// Replace the retryability predicate.
    pub fn should_retry<P>(mut self, predicate: P) -> Self
    where
        P: RetryPredicate<E> + 'static,
    {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Observe scheduled retries. Has no effect on control flow.
    pub fn on_retry<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    /// Apply a partial override to the policy, predicate and observer.
    pub fn with_overrides(mut self, overrides: RetryOverrides<E>) -> Self {
        self.policy = overrides.apply(self.policy);
        if let Some(predicate) = overrides.should_retry {
            self.predicate = predicate;
        }
        if let Some(observer) = overrides.on_retry {
            self.on_retry = Some(observer);
        }
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Invoke `operation` until it succeeds, the predicate rejects a failure,
    /// or `max_attempts` invocations have failed.
    ///
    /// Attempts run strictly one after another. The returned error wraps the
    /// final attempt's failure unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: FailureShape + fmt::Display,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1u32;
        loop {
            let delay = {
                let error = match operation().await {
                    Ok(value) => {
                        if attempt > 1 {
                            tracing::debug!("operation succeeded on attempt {}", attempt);
                        }
                        return Ok(value);
                    }
                    Err(e) => e,
                };
                let retryable = attempt < max_attempts && self.predicate.should_retry(&error);
                match self.policy.decide(attempt, retryable) {
                    RetryDecision::Stop(reason) => {
                        tracing::debug!(
                            attempt,
                            ?reason,
                            "operation failed, not retrying: {}",
                            error
                        );
                        return Err(RetryError::new(error, attempt, reason));
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            attempt,
                            max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            status = ?error.response_status(),
                            code = ?error.code(),
                            "attempt failed, retrying: {}",
                            error
                        );
                        delay
                    }
                }
            };

            if let Some(observer) = &self.on_retry {
                observer(attempt, delay);
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Run `operation` under `policy` with the default retryability predicate.
pub async fn execute_with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation: F,
) -> Result<T, RetryError<E>>
where
    E: FailureShape + fmt::Display + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::new(policy).run(operation).await
}
