//! Contract CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{
    Blueprint, BlueprintId, Contract, ContractDraft, ContractEdit, ContractId, ContractStatus,
    FieldId, FieldValue, StatusFilter,
};
use crate::storage::{JsonlStore, Ledger, Project};

#[derive(Subcommand)]
pub enum ContractCommands {
    /// Create a contract from a blueprint
    ///
    /// Examples:
    ///   pact contract new "NDA with Acme" --blueprint bp-1234567
    ///   pact contract new "NDA with Acme" -b bp-1234567 --set fd-89abcde="Acme Corp"
    New {
        /// Contract name
        name: String,

        /// Blueprint ID to instantiate
        #[arg(long, short)]
        blueprint: Option<String>,

        /// Initial field value as `field-id=value`; repeatable
        #[arg(long = "set", short = 's')]
        values: Vec<String>,
    },

    /// List contracts
    List {
        /// all, active, pending, signed, revoked, or an exact status
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show contract details and lifecycle
    Show {
        /// Contract ID
        id: String,
    },

    /// Edit field values (only while created or approved)
    Set {
        /// Contract ID
        id: String,

        /// Field values as `field-id=value`
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Move a contract to its next status
    Advance {
        /// Contract ID
        id: String,
    },

    /// Revoke a contract (only before it is signed; cannot be undone)
    Revoke {
        /// Contract ID
        id: String,

        /// Confirm the revocation
        #[arg(long, short)]
        yes: bool,
    },

    /// Delete a contract
    Delete {
        /// Contract ID
        id: String,
    },
}

pub fn run(cmd: ContractCommands, project: &Project, output: &Output) -> Result<()> {
    match cmd {
        ContractCommands::New {
            name,
            blueprint,
            values,
        } => new_contract(project, output, name, blueprint.as_deref(), &values),
        ContractCommands::List { filter } => list_contracts(project, output, filter.as_deref()),
        ContractCommands::Show { id } => show_contract(project, output, &id),
        ContractCommands::Set { id, values } => set_values(project, output, &id, &values),
        ContractCommands::Advance { id } => advance_contract(project, output, &id),
        ContractCommands::Revoke { id, yes } => revoke_contract(project, output, &id, yes),
        ContractCommands::Delete { id } => delete_contract(project, output, &id),
    }
}

/// Splits `field-id=value` into its parts
fn split_assignment(raw: &str) -> Result<(FieldId, &str)> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected field-id=value, got '{}'", raw))?;
    Ok((id.parse()?, value))
}

/// Converts raw input to a value typed by the named field
fn typed_value(blueprint: &Blueprint, id: &FieldId, raw: &str) -> Result<FieldValue> {
    let field = blueprint
        .field(id)
        .ok_or_else(|| anyhow::anyhow!("No field {} on this blueprint", id))?;

    FieldValue::parse_for(field.field_type, raw).ok_or_else(|| {
        anyhow::anyhow!(
            "'{}' is not a valid {} value for field {}",
            raw,
            field.field_type,
            id
        )
    })
}

fn find_contract<'a>(ledger: &'a Ledger<JsonlStore>, id_str: &str) -> Result<&'a Contract> {
    let id: ContractId = id_str.parse()?;
    ledger
        .contract(&id)
        .ok_or_else(|| anyhow::anyhow!("Contract not found: {}", id))
}

fn contract_json(contract: &Contract) -> serde_json::Value {
    serde_json::json!({
        "id": contract.id,
        "name": contract.name,
        "blueprint_id": contract.blueprint_id,
        "blueprint_name": contract.blueprint_name,
        "status": contract.status,
        "category": contract.status.category(),
        "color": contract.status.status_color(),
        "next_status": contract.status.next_status(),
        "can_revoke": contract.status.can_revoke(),
        "can_edit": contract.status.can_edit(),
        "created_at": contract.created_at,
        "updated_at": contract.updated_at,
        "fields": contract.fields.iter().map(|f| serde_json::json!({
            "id": f.id(),
            "type": f.field_type(),
            "label": f.label(),
            "value": f.value,
        })).collect::<Vec<_>>(),
    })
}

fn new_contract(
    project: &Project,
    output: &Output,
    name: String,
    blueprint_str: Option<&str>,
    values: &[String],
) -> Result<()> {
    let mut ledger = project.ledger()?;

    let blueprint: Option<&Blueprint> = match blueprint_str {
        Some(s) => {
            let id: BlueprintId = s.parse()?;
            Some(
                ledger
                    .blueprint(&id)
                    .ok_or_else(|| anyhow::anyhow!("Blueprint not found: {}", id))?,
            )
        }
        None => None,
    };

    let mut draft = ContractDraft::new(name);
    if let Some(bp) = blueprint {
        for raw in values {
            let (id, value) = split_assignment(raw)?;
            let value = typed_value(bp, &id, value)?;
            draft = draft.value(id, value);
        }
    }

    let contract = draft.save(blueprint)?;
    ledger.add_contract(contract.clone())?;

    if output.is_json() {
        output.data(&contract_json(&contract));
    } else {
        output.success(&format!(
            "Created contract: {} - {} (from {})",
            contract.id, contract.name, contract.blueprint_name
        ));
    }

    Ok(())
}

fn list_contracts(project: &Project, output: &Output, filter_str: Option<&str>) -> Result<()> {
    let ledger = project.ledger()?;

    let filter: StatusFilter = match filter_str {
        Some(s) => s.parse().map_err(anyhow::Error::msg)?,
        None => project.config().project.default_filter()?,
    };
    let contracts = filter.apply(ledger.contracts());

    if output.is_json() {
        let items: Vec<_> = contracts.iter().map(|c| contract_json(c)).collect();
        output.data(&items);
    } else if contracts.is_empty() {
        match filter {
            StatusFilter::All => println!("No contracts"),
            _ => println!("No {} contracts", filter),
        }
    } else {
        println!(
            "{:<16} {:<9} {:<24} {:<20} {}",
            "ID", "STATUS", "NAME", "BLUEPRINT", "CREATED"
        );
        println!("{}", "-".repeat(86));

        for contract in contracts {
            println!(
                "{:<16} {} {:<24} {:<20} {}",
                contract.id,
                output.status(contract.status),
                contract.name,
                contract.blueprint_name,
                output.date(&contract.created_at)
            );
        }
    }

    Ok(())
}

/// Renders the forward path with the current position marked
fn timeline(status: ContractStatus) -> String {
    let current = status.stage();
    ContractStatus::PATH
        .iter()
        .enumerate()
        .map(|(idx, step)| match current {
            Some(at) if idx < at => format!("✓ {}", step),
            Some(at) if idx == at => format!("[{}]", step),
            _ => step.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" → ")
}

fn show_contract(project: &Project, output: &Output, id_str: &str) -> Result<()> {
    let ledger = project.ledger()?;
    let contract = find_contract(&ledger, id_str)?;

    if output.is_json() {
        output.data(&contract_json(contract));
        return Ok(());
    }

    println!("Contract: {}", contract.id);
    println!("Name: {}", contract.name);
    println!("Blueprint: {} ({})", contract.blueprint_name, contract.blueprint_id);
    println!("Status: {}", output.status(contract.status).trim_end());
    println!("Created: {}", output.date(&contract.created_at));
    println!("Last Updated: {}", output.date(&contract.updated_at));

    println!("\nLifecycle:");
    println!("  {}", timeline(contract.status));
    if contract.status == ContractStatus::Revoked {
        println!("  This contract has been revoked");
    }

    let mut actions = Vec::new();
    if let Some(next) = contract.status.next_status() {
        actions.push(format!("advance (→ {})", next));
    }
    if contract.status.can_revoke() {
        actions.push("revoke".to_string());
    }
    if contract.status.can_edit() {
        actions.push("set".to_string());
    }
    if !actions.is_empty() {
        println!("  Available: {}", actions.join(", "));
    }

    println!("\nFields:");
    for field in &contract.fields {
        println!(
            "  {:<16} {:<20} {}",
            field.id(),
            field.label(),
            field.display_value()
        );
    }

    Ok(())
}

fn set_values(project: &Project, output: &Output, id_str: &str, values: &[String]) -> Result<()> {
    let mut ledger = project.ledger()?;
    let contract = find_contract(&ledger, id_str)?;

    let mut edit = ContractEdit::begin(contract)?;
    for raw in values {
        let (id, value) = split_assignment(raw)?;
        let field_type = contract
            .field(&id)
            .map(|f| f.field_type())
            .ok_or_else(|| anyhow::anyhow!("Contract has no field {}", id))?;
        let value = FieldValue::parse_for(field_type, value).ok_or_else(|| {
            anyhow::anyhow!("'{}' is not a valid {} value for field {}", value, field_type, id)
        })?;
        edit.set(&id, value)?;
    }

    if !edit.is_dirty() {
        let unchanged = edit.cancel();
        output.success(&format!("No changes to contract: {}", unchanged.id));
        return Ok(());
    }

    let updated = edit.save();
    ledger
        .update_contract(updated.clone())
        .with_context(|| format!("Failed to save contract {}", updated.id))?;

    if output.is_json() {
        output.data(&contract_json(&updated));
    } else {
        output.success(&format!(
            "Updated contract: {} ({} of {} fields filled)",
            updated.id,
            updated.filled_count(),
            updated.fields.len()
        ));
    }

    Ok(())
}

fn advance_contract(project: &Project, output: &Output, id_str: &str) -> Result<()> {
    let mut ledger = project.ledger()?;
    let contract = find_contract(&ledger, id_str)?;

    let from = contract.status;
    let updated = contract.advanced()?;
    tracing::info!(id = %updated.id, %from, to = %updated.status, "advanced contract");
    ledger.update_contract(updated.clone())?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": updated.id,
            "from": from,
            "status": updated.status,
            "next_status": updated.status.next_status(),
        }));
    } else {
        output.success(&format!(
            "Moved contract {} from {} to {}",
            updated.id, from, updated.status
        ));
    }

    Ok(())
}

fn revoke_contract(project: &Project, output: &Output, id_str: &str, confirmed: bool) -> Result<()> {
    let mut ledger = project.ledger()?;
    let contract = find_contract(&ledger, id_str)?;

    // Check legality before asking for confirmation
    let updated = contract.revoked()?;

    if project.config().project.confirm_revoke && !confirmed {
        anyhow::bail!(
            "Revoking {} cannot be undone. Re-run with --yes to confirm.",
            updated.id
        );
    }

    tracing::info!(id = %updated.id, from = %contract.status, "revoked contract");
    ledger.update_contract(updated.clone())?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": updated.id,
            "status": updated.status,
        }));
    } else {
        output.success(&format!("Revoked contract: {}", updated.id));
    }

    Ok(())
}

fn delete_contract(project: &Project, output: &Output, id_str: &str) -> Result<()> {
    let mut ledger = project.ledger()?;

    let id: ContractId = id_str.parse()?;
    if !ledger.delete_contract(&id)? {
        anyhow::bail!("Contract not found: {}", id);
    }

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id, "deleted": true }));
    } else {
        output.success(&format!("Deleted contract: {}", id));
    }

    Ok(())
}
