//! Blueprint CLI commands

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Blueprint, BlueprintDraft, BlueprintId, FieldType};
use crate::storage::Project;

/// A `--field` argument: `type` or `type:label`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub label: Option<String>,
}

impl FromStr for FieldSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, label) = match s.split_once(':') {
            Some((kind, label)) => (kind, Some(label.trim().to_string())),
            None => (s, None),
        };
        Ok(Self {
            field_type: kind.parse()?,
            label: label.filter(|l| !l.is_empty()),
        })
    }
}

#[derive(Subcommand)]
pub enum BlueprintCommands {
    /// Create a blueprint
    ///
    /// Examples:
    ///   pact blueprint new "NDA" --field text:"Party Name" --field signature --field checkbox:"I agree"
    New {
        /// Blueprint name
        name: String,

        /// Short description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Field as `type` or `type:label` (text, date, signature, checkbox); repeatable
        #[arg(long = "field", short = 'F')]
        fields: Vec<FieldSpec>,
    },

    /// List blueprints
    List,

    /// Show blueprint details
    Show {
        /// Blueprint ID
        id: String,
    },

    /// Delete a blueprint (contracts made from it are kept)
    Delete {
        /// Blueprint ID
        id: String,
    },
}

pub fn run(cmd: BlueprintCommands, project: &Project, output: &Output) -> Result<()> {
    match cmd {
        BlueprintCommands::New {
            name,
            description,
            fields,
        } => new_blueprint(project, output, name, description, fields),
        BlueprintCommands::List => list_blueprints(project, output),
        BlueprintCommands::Show { id } => show_blueprint(project, output, &id),
        BlueprintCommands::Delete { id } => delete_blueprint(project, output, &id),
    }
}

fn blueprint_json(blueprint: &Blueprint) -> serde_json::Value {
    serde_json::json!({
        "id": blueprint.id,
        "name": blueprint.name,
        "description": blueprint.description,
        "created_at": blueprint.created_at,
        "fields": blueprint.fields.iter().map(|f| serde_json::json!({
            "id": f.id,
            "type": f.field_type,
            "label": f.label,
        })).collect::<Vec<_>>(),
    })
}

fn new_blueprint(
    project: &Project,
    output: &Output,
    name: String,
    description: String,
    fields: Vec<FieldSpec>,
) -> Result<()> {
    let mut ledger = project.ledger()?;

    let mut draft = BlueprintDraft::new(name).description(description);
    for spec in fields {
        match spec.label {
            Some(label) => draft.add_labeled_field(spec.field_type, label),
            None => draft.add_field(spec.field_type),
        };
    }

    let blueprint = draft.save()?;
    ledger.add_blueprint(blueprint.clone())?;

    if output.is_json() {
        output.data(&blueprint_json(&blueprint));
    } else {
        output.success(&format!(
            "Created blueprint: {} - {} ({} fields)",
            blueprint.id,
            blueprint.name,
            blueprint.fields.len()
        ));
    }

    Ok(())
}

fn list_blueprints(project: &Project, output: &Output) -> Result<()> {
    let ledger = project.ledger()?;
    let blueprints = ledger.blueprints();

    if output.is_json() {
        let items: Vec<_> = blueprints.iter().map(blueprint_json).collect();
        output.data(&items);
    } else if blueprints.is_empty() {
        println!("No blueprints");
    } else {
        println!("{:<16} {:<8} {:<14} NAME", "ID", "FIELDS", "CREATED");
        println!("{}", "-".repeat(70));

        for blueprint in blueprints {
            println!(
                "{:<16} {:<8} {:<14} {}",
                blueprint.id,
                blueprint.fields.len(),
                output.date(&blueprint.created_at),
                blueprint.name
            );
        }
    }

    Ok(())
}

fn show_blueprint(project: &Project, output: &Output, id_str: &str) -> Result<()> {
    let ledger = project.ledger()?;

    let id: BlueprintId = id_str.parse()?;
    let blueprint = ledger
        .blueprint(&id)
        .ok_or_else(|| anyhow::anyhow!("Blueprint not found: {}", id))?;

    if output.is_json() {
        output.data(&blueprint_json(blueprint));
    } else {
        println!("Blueprint: {}", blueprint.id);
        println!("Name: {}", blueprint.name);
        if !blueprint.description.is_empty() {
            println!("Description: {}", blueprint.description);
        }
        println!("Created: {}", output.date(&blueprint.created_at));

        println!("\nFields:");
        for field in &blueprint.fields {
            println!("  {:<16} {:<10} {}", field.id, field.field_type, field.label);
        }
    }

    Ok(())
}

fn delete_blueprint(project: &Project, output: &Output, id_str: &str) -> Result<()> {
    let mut ledger = project.ledger()?;

    let id: BlueprintId = id_str.parse()?;
    let removed = ledger
        .delete_blueprint(&id)
        .with_context(|| format!("Failed to delete blueprint {}", id))?;
    if !removed {
        anyhow::bail!("Blueprint not found: {}", id);
    }

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id, "deleted": true }));
    } else {
        output.success(&format!("Deleted blueprint: {}", id));
    }

    Ok(())
}
