//! CLI layer for pact
//!
//! Handles command parsing and output formatting.

mod app;
mod output;
mod blueprint;
mod contract;
mod dashboard;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
