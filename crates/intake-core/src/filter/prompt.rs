//! Prompt construction and parsing of the model's classification output.

use serde::Deserialize;
use std::fmt::Write;

use super::category::QuestionCategory;
use super::error::FilterError;

/// Classification as returned by the model, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: QuestionCategory,
    pub has_auto_response: bool,
    pub auto_response: Option<String>,
    pub reasoning: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClassification {
    category: String,
    #[serde(alias = "has_auto_response")]
    has_auto_response: bool,
    #[serde(default, alias = "auto_response")]
    auto_response: Option<String>,
    #[serde(default)]
    reasoning: String,
    confidence: f64,
}

/// Prompt asking the model to classify `question` and answer with one JSON object.
pub fn classification_prompt(question: &str) -> String {
    let mut prompt = String::from(
        "You triage questions sent to a law firm's website. \
         Classify the visitor's question into exactly one category:\n",
    );
    for c in QuestionCategory::ALL {
        let _ = writeln!(prompt, "- {}: {}", c.as_str(), c.description());
    }
    prompt.push_str(
        "\nSet hasAutoResponse to true only when a short general answer, without legal \
         advice about the visitor's own situation, fully addresses the question. \
         When it is true you may include that answer in autoResponse.\n\
         Reply with a single JSON object and nothing else:\n\
         {\"category\": \"<category>\", \"hasAutoResponse\": <true|false>, \
         \"autoResponse\": \"<text or null>\", \"reasoning\": \"<one sentence>\", \
         \"confidence\": <number between 0 and 1>}\n\nQuestion: ",
    );
    prompt.push_str(question);
    prompt
}

/// Prompt asking the model for a short general answer in `category`.
pub fn auto_response_prompt(category: QuestionCategory, question: &str) -> String {
    format!(
        "You answer visitor questions on a law firm's website. The question was filed \
         under \"{}\" ({}). Write a brief, friendly, general answer in plain text \
         (at most three sentences). Do not give legal advice about the visitor's own \
         situation; suggest a consultation where appropriate.\n\nQuestion: {}",
        category.as_str(),
        category.description(),
        question
    )
}

/// Parse the model's reply into a validated classification.
///
/// Tolerates surrounding prose and Markdown code fences by taking the
/// outermost `{...}` span.
pub fn parse_classification(text: &str) -> Result<Classification, FilterError> {
    let json = extract_json_object(text)
        .ok_or_else(|| FilterError::MalformedResponse("no JSON object in model output".into()))?;
    let raw: RawClassification = serde_json::from_str(json)
        .map_err(|e| FilterError::MalformedResponse(format!("invalid classification JSON: {}", e)))?;
    let category: QuestionCategory = raw.category.parse()?;
    if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
        return Err(FilterError::MalformedResponse(format!(
            "confidence {} outside [0, 1]",
            raw.confidence
        )));
    }
    let auto_response = raw
        .auto_response
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(Classification {
        category,
        has_auto_response: raw.has_auto_response,
        auto_response,
        reasoning: raw.reasoning.trim().to_string(),
        confidence: raw.confidence,
    })
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
