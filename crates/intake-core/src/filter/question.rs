//! Result of filtering one question.

use serde::Serialize;

use super::category::QuestionCategory;
use super::error::FilterError;

/// Classification of a visitor's question, built once per call and never mutated.
///
/// Serializes with camelCase keys (`hasAutoResponse`, `autoResponse`) for web clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredQuestion {
    category: QuestionCategory,
    has_auto_response: bool,
    auto_response: Option<String>,
    reasoning: String,
    confidence: f64,
}

impl FilteredQuestion {
    /// Fails when `confidence` is not a finite number in [0, 1].
    /// An `auto_response` is dropped when `has_auto_response` is false.
    pub fn new(
        category: QuestionCategory,
        has_auto_response: bool,
        auto_response: Option<String>,
        reasoning: String,
        confidence: f64,
    ) -> Result<Self, FilterError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(FilterError::MalformedResponse(format!(
                "confidence {} outside [0, 1]",
                confidence
            )));
        }
        Ok(Self {
            category,
            has_auto_response,
            auto_response: auto_response.filter(|_| has_auto_response),
            reasoning,
            confidence,
        })
    }

    pub fn category(&self) -> QuestionCategory {
        self.category
    }

    pub fn has_auto_response(&self) -> bool {
        self.has_auto_response
    }

    pub fn auto_response(&self) -> Option<&str> {
        self.auto_response.as_deref()
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
