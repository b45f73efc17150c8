//! Retry and backoff.
//!
//! This module holds the failure classification (network errors, throttling,
//! server errors, client rejections), the exponential backoff policy and the
//! async executor that drives a failable operation through them. Callers
//! (the question filter, the CLI) share one consistent policy.

mod classify;
mod error;
mod policy;
mod preset;
mod run;

pub use classify::{classify, classify_http_status, default_should_retry, ErrorKind};
pub use error::{FailureShape, RetryError, StopReason};
pub use policy::{DefaultRetryPredicate, RetryDecision, RetryPolicy, RetryPredicate};
pub use preset::{execute_ai_with_retry, execute_auth_with_retry, RetryOverrides};
pub use run::{execute_with_retry, OnRetry, RetryExecutor};
