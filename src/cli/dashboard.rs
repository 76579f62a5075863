//! Dashboard command

use anyhow::Result;

use super::output::Output;
use crate::domain::{Category, DashboardStats};
use crate::storage::Project;

/// Show contract counts by category
pub fn show(project: &Project, output: &Output) -> Result<()> {
    let ledger = project.ledger()?;

    let stats = DashboardStats::tally(ledger.contracts());
    tracing::debug!(total = stats.total, "tallied contracts");

    if output.is_json() {
        output.data(&serde_json::json!({
            "blueprints": ledger.blueprints().len(),
            "contracts": stats,
        }));
        return Ok(());
    }

    println!("Contract Dashboard");
    println!("{}", "-".repeat(30));
    println!("{:<12} {}", "Total", stats.total);
    for category in Category::ALL {
        println!("{:<12} {}", capitalize(category.as_str()), stats.count(category));
    }
    println!();
    println!("{} blueprint(s)", ledger.blueprints().len());

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
