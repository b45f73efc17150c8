//! `intake ask <question>` – classify a question through the retrying model call.

use anyhow::{Context, Result};
use intake_core::config::IntakeConfig;
use intake_core::filter::{FilterError, FilteredQuestion, GeminiClient, QuestionFilter};
use intake_core::retry::{RetryExecutor, RetryOverrides};
use std::time::Duration;

/// Flags that override the configured retry policy.
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    pub json: bool,
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    pub backoff: Option<f64>,
}

impl AskOptions {
    fn overrides<E>(&self) -> RetryOverrides<E> {
        RetryOverrides {
            max_attempts: self.max_attempts,
            initial_delay: self.delay_ms.map(Duration::from_millis),
            backoff_multiplier: self.backoff,
            ..Default::default()
        }
    }
}

pub async fn run_ask(cfg: &IntakeConfig, question: &str, opts: &AskOptions) -> Result<()> {
    if let Some(factor) = opts.backoff {
        anyhow::ensure!(
            factor.is_finite() && factor > 0.0,
            "--backoff must be a positive number"
        );
    }

    let client = GeminiClient::from_config(&cfg.model)?;
    client.check()?;
    let filter = QuestionFilter::new(client, cfg.faq_table()?);

    let executor = RetryExecutor::<FilterError>::new(cfg.retry_policy())
        .with_overrides(opts.overrides())
        .on_retry(|attempt, delay| {
            eprintln!(
                "attempt {} failed, retrying in {} ms",
                attempt,
                delay.as_millis()
            );
        });
    tracing::info!("ask: {:?}", executor.policy());

    let result = executor
        .run(|| filter.filter(question))
        .await
        .context("question filtering failed")?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(q: &FilteredQuestion) {
    println!("Category:   {}", q.category());
    println!("Confidence: {:.2}", q.confidence());
    if !q.reasoning().is_empty() {
        println!("Reasoning:  {}", q.reasoning());
    }
    match q.auto_response() {
        Some(answer) => println!("\n{}", answer),
        None => println!("\nNo automatic answer; route to an attorney."),
    }
}
