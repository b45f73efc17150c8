//! AI-backed question filtering.
//!
//! One call classifies a visitor's question with the generative model,
//! validates the category, and supplies an automatic answer when one is
//! warranted: from the local FAQ table first, then from the model's own
//! answer, and finally from a second model request. The whole call is a
//! single retry unit; none of its steps are retried on their own.

mod category;
mod error;
mod faq;
mod model;
mod prompt;
mod question;

pub use category::QuestionCategory;
pub use error::FilterError;
pub use faq::{FaqEntry, FaqTable};
pub use model::{GeminiClient, ModelClient};
pub use prompt::{auto_response_prompt, classification_prompt, parse_classification, Classification};
pub use question::FilteredQuestion;

/// Classifies questions with a model and answers them from a FAQ table where possible.
#[derive(Debug, Clone)]
pub struct QuestionFilter<M> {
    model: M,
    faq: FaqTable,
}

impl<M: ModelClient> QuestionFilter<M> {
    pub fn new(model: M, faq: FaqTable) -> Self {
        Self { model, faq }
    }

    pub fn faq(&self) -> &FaqTable {
        &self.faq
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Filter one question. Failures of either model request propagate unchanged.
    pub async fn filter(&self, question: &str) -> Result<FilteredQuestion, FilterError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(FilterError::EmptyQuestion);
        }

        let reply = self.model.generate(&classification_prompt(question)).await?;
        let c = parse_classification(&reply)?;
        tracing::debug!(
            category = %c.category,
            confidence = c.confidence,
            has_auto_response = c.has_auto_response,
            "question classified"
        );

        let auto_response = if !c.has_auto_response {
            None
        } else if let Some(entry) = self.faq.lookup(c.category, question) {
            tracing::debug!("answered from FAQ ({})", entry.category);
            Some(entry.answer.clone())
        } else if let Some(answer) = c.auto_response {
            Some(answer)
        } else {
            let text = self
                .model
                .generate(&auto_response_prompt(c.category, question))
                .await?;
            let text = text.trim();
            if text.is_empty() {
                return Err(FilterError::MalformedResponse(
                    "empty automatic response".into(),
                ));
            }
            Some(text.to_string())
        };

        FilteredQuestion::new(
            c.category,
            c.has_auto_response,
            auto_response,
            c.reasoning,
            c.confidence,
        )
    }
}
