//! CLI for intake legal question triage.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use intake_core::config;
use intake_core::filter::QuestionCategory;

use commands::{run_ask, run_completions, run_faq_list, run_faq_match, AskOptions};

/// Top-level CLI for intake.
#[derive(Debug, Parser)]
#[command(name = "intake")]
#[command(about = "intake: triage legal questions with a generative model and a local FAQ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify a question and print the automatic answer, retrying transient model failures.
    Ask {
        /// The visitor's question.
        question: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
        /// Override the maximum number of attempts.
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        max_attempts: Option<u32>,
        /// Override the delay before the second attempt, in milliseconds.
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Override the backoff multiplier.
        #[arg(long, value_name = "FACTOR")]
        backoff: Option<f64>,
    },

    /// Inspect the local FAQ table.
    Faq {
        #[command(subcommand)]
        command: FaqCommand,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum FaqCommand {
    /// List all FAQ entries.
    List,
    /// Look up a question in the FAQ table without calling the model.
    Match {
        /// The visitor's question.
        question: String,
        /// Preferred category (default: general_legal_info).
        #[arg(long)]
        category: Option<QuestionCategory>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Ask {
                question,
                json,
                max_attempts,
                delay_ms,
                backoff,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let opts = AskOptions {
                    json,
                    max_attempts,
                    delay_ms,
                    backoff,
                };
                run_ask(&cfg, &question, &opts).await?;
            }
            CliCommand::Faq { command } => {
                let cfg = config::load_or_init()?;
                match command {
                    FaqCommand::List => run_faq_list(&cfg)?,
                    FaqCommand::Match { question, category } => {
                        run_faq_match(&cfg, &question, category)?
                    }
                }
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
