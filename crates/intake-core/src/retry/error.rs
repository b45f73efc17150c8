//! Failure shape seen by the retry layer, and the terminal error it returns.

use std::fmt;

/// Optional fields a failure may expose to retry classification.
///
/// The failure's message is its `Display` output. Implementors override only
/// what their errors actually carry; a failure with no status is treated as a
/// network-level error.
pub trait FailureShape {
    /// HTTP status of the response that produced this failure, if a response was received.
    fn response_status(&self) -> Option<u16> {
        None
    }

    /// Low-level error code (e.g. a connection abort marker).
    fn code(&self) -> Option<&str> {
        None
    }

    /// True when a later attempt cannot succeed (bad input, missing credentials).
    fn is_permanent(&self) -> bool {
        false
    }
}

/// Why the executor stopped without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every allowed attempt failed.
    Exhausted,
    /// The predicate rejected the failure while attempts remained.
    NotRetryable,
}

/// Terminal failure returned by the retry executor.
///
/// Carries the last attempt's failure unchanged, together with how many
/// attempts were made and why the executor stopped.
#[derive(Debug)]
pub struct RetryError<E> {
    error: E,
    attempts: u32,
    reason: StopReason,
}

impl<E> RetryError<E> {
    pub(crate) fn new(error: E, attempts: u32, reason: StopReason) -> Self {
        Self {
            error,
            attempts,
            reason,
        }
    }

    /// Number of times the operation was invoked (1-based).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reason(&self) -> StopReason {
        self.reason
    }

    /// True if every allowed attempt was used.
    pub fn is_exhausted(&self) -> bool {
        self.reason == StopReason::Exhausted
    }

    /// The failure of the final attempt.
    pub fn get_ref(&self) -> &E {
        &self.error
    }

    /// Unwrap the final attempt's failure.
    pub fn into_inner(self) -> E {
        self.error
    }
}

impl<E> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            StopReason::Exhausted if self.attempts == 1 => write!(f, "failed after 1 attempt"),
            StopReason::Exhausted => write!(f, "gave up after {} attempts", self.attempts),
            StopReason::NotRetryable => {
                write!(f, "not retryable (attempt {})", self.attempts)
            }
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
