//! `intake faq list|match` – inspect the local FAQ table.

use anyhow::Result;
use intake_core::config::IntakeConfig;
use intake_core::filter::QuestionCategory;

pub fn run_faq_list(cfg: &IntakeConfig) -> Result<()> {
    let table = cfg.faq_table()?;
    if table.is_empty() {
        println!("FAQ table is empty.");
        return Ok(());
    }
    println!("{:<4} {:<22} {}", "#", "CATEGORY", "PATTERNS");
    for (i, entry) in table.entries().iter().enumerate() {
        println!(
            "{:<4} {:<22} {}",
            i + 1,
            entry.category.as_str(),
            entry.patterns.join(", ")
        );
    }
    Ok(())
}

pub fn run_faq_match(
    cfg: &IntakeConfig,
    question: &str,
    category: Option<QuestionCategory>,
) -> Result<()> {
    let table = cfg.faq_table()?;
    let category = category.unwrap_or(QuestionCategory::GeneralLegalInfo);
    match table.lookup(category, question) {
        Some(entry) => {
            println!("[{}] {}", entry.category, entry.answer);
        }
        None => println!("No FAQ entry matches."),
    }
    Ok(())
}
