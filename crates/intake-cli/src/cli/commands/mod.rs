//! CLI command handlers. Each command is in its own file.

mod ask;
mod completions;
mod faq;

pub use ask::{run_ask, AskOptions};
pub use completions::run_completions;
pub use faq::{run_faq_list, run_faq_match};
