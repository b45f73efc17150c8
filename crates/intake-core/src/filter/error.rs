//! Error type for the question filtering call.

use thiserror::Error;

use crate::retry::FailureShape;

/// Failure of one question filtering call (or one model request inside it).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Question was empty after trimming.
    #[error("question is empty")]
    EmptyQuestion,
    /// No API key in the configured environment variable.
    #[error("model API key not configured (set {var})")]
    MissingApiKey { var: String },
    /// Request never produced a response (connect, DNS, timeout, reset).
    #[error("model request failed: {message}")]
    Transport { code: Option<String>, message: String },
    /// Model endpoint answered with a non-2xx status.
    #[error("model returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Model output could not be parsed into a classification.
    #[error("malformed model output: {0}")]
    MalformedResponse(String),
    /// Model chose a category outside the fixed set.
    #[error("model chose unknown category {0:?}")]
    UnknownCategory(String),
    /// Blocking request task panicked or was cancelled.
    #[error("model request task failed: {0}")]
    Join(String),
}

impl FailureShape for FilterError {
    fn response_status(&self) -> Option<u16> {
        match self {
            FilterError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn code(&self) -> Option<&str> {
        match self {
            FilterError::Transport { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    fn is_permanent(&self) -> bool {
        matches!(
            self,
            FilterError::EmptyQuestion | FilterError::MissingApiKey { .. } | FilterError::Join(_)
        )
    }
}
