//! Local FAQ table: canned answers matched by phrase, bypassing the model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::category::QuestionCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub category: QuestionCategory,
    /// Phrases that trigger this entry, matched on whole words.
    pub patterns: Vec<String>,
    pub answer: String,
}

/// Ordered FAQ entries. Table order breaks ties between equally good matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqTable {
    #[serde(default)]
    pub entries: Vec<FaqEntry>,
}

impl FaqTable {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Answers shipped with the binary.
    pub fn builtin() -> Self {
        fn entry(category: QuestionCategory, patterns: &[&str], answer: &str) -> FaqEntry {
            FaqEntry {
                category,
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                answer: answer.to_string(),
            }
        }

        Self::new(vec![
            entry(
                QuestionCategory::GeneralLegalInfo,
                &["office hours", "open on", "are you open", "business hours"],
                "Our office is open Monday through Friday, 9am to 5pm. \
                 Messages left after hours are answered the next business day.",
            ),
            entry(
                QuestionCategory::ConsultationRequest,
                &[
                    "schedule a consultation",
                    "book a consultation",
                    "free consultation",
                    "initial consultation",
                    "make an appointment",
                ],
                "You can book an initial consultation through the contact form or by phone. \
                 Consultations last about 30 minutes and can be held in person or by video.",
            ),
            entry(
                QuestionCategory::FeesAndBilling,
                &["how much", "fees", "retainer", "payment plan", "hourly rate", "cost"],
                "Fees depend on the type of matter. Many matters are handled for a flat fee; \
                 others are billed hourly against a retainer. We explain all costs in writing \
                 before any work begins.",
            ),
            entry(
                QuestionCategory::GeneralLegalInfo,
                &["what should i bring", "what documents", "documents to bring"],
                "Please bring any contracts, letters, court papers, and a short timeline of \
                 events to your consultation. Copies are fine.",
            ),
        ])
    }

    /// Load a table from a TOML file with `[[entries]]` sections.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read FAQ {}", path.display()))?;
        let table: FaqTable =
            toml::from_str(&data).with_context(|| format!("parse FAQ {}", path.display()))?;
        tracing::debug!("loaded {} FAQ entries from {}", table.entries.len(), path.display());
        Ok(table)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry for `question`, preferring entries in `category`.
    ///
    /// Among candidates the longest matching phrase wins; ties go to the
    /// earlier entry. Entries of other categories are used only when nothing
    /// in `category` matches.
    pub fn lookup(&self, category: QuestionCategory, question: &str) -> Option<&FaqEntry> {
        let haystack = format!(" {} ", normalize(question));
        let mut best: Option<((bool, usize), &FaqEntry)> = None;
        for entry in &self.entries {
            let longest = entry
                .patterns
                .iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty() && haystack.contains(&format!(" {} ", p)))
                .map(|p| p.len())
                .max();
            let Some(len) = longest else { continue };
            let key = (entry.category == category, len);
            if best.map_or(true, |(k, _)| key > k) {
                best = Some((key, entry));
            }
        }
        best.map(|(_, entry)| entry)
    }
}

/// Lowercase and collapse every run of non-alphanumerics into one space.
fn normalize(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn normalize_collapses_punctuation() {
        assert_eq!(normalize("  How MUCH, do you charge?!"), "how much do you charge");
    }

    #[test]
    fn matches_whole_words_only() {
        let table = FaqTable::builtin();
        assert!(table
            .lookup(QuestionCategory::FeesAndBilling, "Do you serve coffees?")
            .is_none());
        let hit = table
            .lookup(QuestionCategory::FeesAndBilling, "What are your fees?")
            .unwrap();
        assert_eq!(hit.category, QuestionCategory::FeesAndBilling);
    }

    #[test]
    fn prefers_requested_category() {
        let table = FaqTable::new(vec![
            FaqEntry {
                category: QuestionCategory::FeesAndBilling,
                patterns: vec!["free consultation".into()],
                answer: "fees".into(),
            },
            FaqEntry {
                category: QuestionCategory::ConsultationRequest,
                patterns: vec!["consultation".into()],
                answer: "booking".into(),
            },
        ]);
        let q = "Is the first consultation a free consultation?";
        assert_eq!(
            table
                .lookup(QuestionCategory::ConsultationRequest, q)
                .unwrap()
                .answer,
            "booking"
        );
        // No entry in this category: fall back to the longest match anywhere.
        assert_eq!(
            table.lookup(QuestionCategory::OffTopic, q).unwrap().answer,
            "fees"
        );
    }

    #[test]
    fn longest_pattern_wins_then_table_order() {
        let table = FaqTable::new(vec![
            FaqEntry {
                category: QuestionCategory::GeneralLegalInfo,
                patterns: vec!["hours".into()],
                answer: "short".into(),
            },
            FaqEntry {
                category: QuestionCategory::GeneralLegalInfo,
                patterns: vec!["office hours".into()],
                answer: "long".into(),
            },
            FaqEntry {
                category: QuestionCategory::GeneralLegalInfo,
                patterns: vec!["Office-Hours".into()],
                answer: "duplicate".into(),
            },
        ]);
        let hit = table
            .lookup(QuestionCategory::GeneralLegalInfo, "What are your office hours?")
            .unwrap();
        assert_eq!(hit.answer, "long");
    }

    #[test]
    fn load_from_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"
            [[entries]]
            category = "urgent_matter"
            patterns = ["arrested", "in custody"]
            answer = "Call our emergency line now."
            "#
        )
        .unwrap();
        f.flush().unwrap();
        let table = FaqTable::load(f.path()).unwrap();
        assert_eq!(table.entries().len(), 1);
        let hit = table
            .lookup(QuestionCategory::UrgentMatter, "My son was ARRESTED last night")
            .unwrap();
        assert_eq!(hit.answer, "Call our emergency line now.");
    }

    #[test]
    fn load_rejects_unknown_category() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "[[entries]]\ncategory = \"maritime\"\npatterns = [\"boat\"]\nanswer = \"x\"\n"
        )
        .unwrap();
        f.flush().unwrap();
        assert!(FaqTable::load(f.path()).is_err());
    }
}
