//! Fixed set of categories a question can be filed under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    GeneralLegalInfo,
    ConsultationRequest,
    FeesAndBilling,
    CaseSpecific,
    UrgentMatter,
    OffTopic,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 6] = [
        QuestionCategory::GeneralLegalInfo,
        QuestionCategory::ConsultationRequest,
        QuestionCategory::FeesAndBilling,
        QuestionCategory::CaseSpecific,
        QuestionCategory::UrgentMatter,
        QuestionCategory::OffTopic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::GeneralLegalInfo => "general_legal_info",
            QuestionCategory::ConsultationRequest => "consultation_request",
            QuestionCategory::FeesAndBilling => "fees_and_billing",
            QuestionCategory::CaseSpecific => "case_specific",
            QuestionCategory::UrgentMatter => "urgent_matter",
            QuestionCategory::OffTopic => "off_topic",
        }
    }

    /// One-line description used when prompting the model.
    pub fn description(self) -> &'static str {
        match self {
            QuestionCategory::GeneralLegalInfo => {
                "general questions about the law, the firm, or its practice areas"
            }
            QuestionCategory::ConsultationRequest => {
                "the visitor wants to book or ask about a consultation"
            }
            QuestionCategory::FeesAndBilling => "questions about fees, retainers, or payment",
            QuestionCategory::CaseSpecific => {
                "questions about the visitor's own facts that need an attorney's review"
            }
            QuestionCategory::UrgentMatter => {
                "time-critical situations such as arrests, deadlines, or hearings"
            }
            QuestionCategory::OffTopic => "anything unrelated to legal services",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionCategory {
    type Err = FilterError;

    /// Accepts snake_case, kebab-case, or spaced names in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        QuestionCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| FilterError::UnknownCategory(s.trim().to_string()))
    }
}
