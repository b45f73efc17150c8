pub mod config;
pub mod filter;
pub mod logging;
pub mod retry;
