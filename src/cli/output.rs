//! Output formatting for CLI commands

use std::io::IsTerminal;

use serde::Serialize;

use crate::domain::ContractStatus;
use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    color: bool,
    date_format: String,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
            date_format: "%b %-d, %Y".to_string(),
        }
    }

    /// Uses a project's strftime pattern for dates
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers normally render text themselves; this is the fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Renders a status, coloured when writing to a terminal
    pub fn status(&self, status: ContractStatus) -> String {
        let text = format!("{:<9}", status.as_str());
        if self.color {
            status.status_color().paint(&text)
        } else {
            text
        }
    }

    /// Formats a timestamp with the configured date pattern
    pub fn date(&self, at: &chrono::DateTime<chrono::Utc>) -> String {
        use std::fmt::Write;

        // An invalid pattern surfaces as a fmt error; fall back to RFC 3339
        let mut out = String::new();
        if write!(out, "{}", at.format(&self.date_format)).is_err() {
            return at.to_rfc3339();
        }
        out
    }
}
