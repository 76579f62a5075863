//! Contract domain model
//!
//! A contract is a named instantiation of one blueprint. Every change
//! produces a new [`Contract`] value; nothing here mutates in place, so a
//! caller can hand the result straight back to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::blueprint::{Blueprint, ValidationError};
use super::field::{ContractField, FieldType, FieldValue};
use super::id::{BlueprintId, ContractId, FieldId};
use super::lifecycle::{ContractStatus, LifecycleError};

/// Rejected field-value edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Contract is {0}; field values can only be edited while created or approved")]
    NotEditable(ContractStatus),

    #[error("Contract has no field {0}")]
    UnknownField(FieldId),

    #[error("Field {field} is a {expected} field and cannot hold {value:?}")]
    TypeMismatch {
        field: FieldId,
        expected: FieldType,
        value: FieldValue,
    },
}

/// A contract instantiated from a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,

    pub name: String,

    /// Never re-validated; the blueprint may be deleted later
    pub blueprint_id: BlueprintId,

    /// Blueprint name at creation time
    pub blueprint_name: String,

    pub status: ContractStatus,

    pub fields: Vec<ContractField>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Looks up a field by ID
    pub fn field(&self, id: &FieldId) -> Option<&ContractField> {
        self.fields.iter().find(|f| f.id() == id)
    }

    /// Number of fields holding a non-empty value
    pub fn filled_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.value.is_empty()).count()
    }

    /// Returns a copy with the given status, bypassing the lifecycle guards
    pub fn with_status(&self, status: ContractStatus) -> Contract {
        Contract {
            status,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Returns a copy moved one step along the forward path
    pub fn advanced(&self) -> Result<Contract, LifecycleError> {
        Ok(self.with_status(self.status.advance()?))
    }

    /// Returns a revoked copy, if revocation is still allowed
    pub fn revoked(&self) -> Result<Contract, LifecycleError> {
        Ok(self.with_status(self.status.revoke()?))
    }

    /// Returns a copy with one field value replaced
    pub fn with_field_value(
        &self,
        id: &FieldId,
        value: impl Into<FieldValue>,
    ) -> Result<Contract, EditError> {
        let mut edit = ContractEdit::begin(self)?;
        edit.set(id, value)?;
        Ok(edit.save())
    }

    /// Starts an edit session on this contract
    pub fn edit(&self) -> Result<ContractEdit, EditError> {
        ContractEdit::begin(self)
    }
}

fn check_value(
    fields: &[ContractField],
    id: &FieldId,
    value: &FieldValue,
) -> Result<usize, EditError> {
    let index = fields
        .iter()
        .position(|f| f.id() == id)
        .ok_or_else(|| EditError::UnknownField(id.clone()))?;

    let expected = fields[index].field_type();
    if !value.fits(expected) {
        return Err(EditError::TypeMismatch {
            field: id.clone(),
            expected,
            value: value.clone(),
        });
    }
    Ok(index)
}

/// The single editable snapshot of a contract's field values
///
/// Values are staged here and only reach the contract on [`save`](Self::save).
#[derive(Debug, Clone, PartialEq)]
pub struct ContractEdit {
    original: Contract,
    fields: Vec<ContractField>,
}

impl ContractEdit {
    /// Begins editing, if the contract's status allows it
    pub fn begin(contract: &Contract) -> Result<Self, EditError> {
        if !contract.status.can_edit() {
            return Err(EditError::NotEditable(contract.status));
        }
        Ok(Self {
            original: contract.clone(),
            fields: contract.fields.clone(),
        })
    }

    /// Stages a new value for a field
    pub fn set(&mut self, id: &FieldId, value: impl Into<FieldValue>) -> Result<(), EditError> {
        let value = value.into();
        let index = check_value(&self.fields, id, &value)?;
        self.fields[index].value = value;
        Ok(())
    }

    /// Staged fields, in display order
    pub fn fields(&self) -> &[ContractField] {
        &self.fields
    }

    /// Returns true if any staged value differs from the original
    pub fn is_dirty(&self) -> bool {
        self.fields != self.original.fields
    }

    /// Discards staged values
    pub fn cancel(self) -> Contract {
        self.original
    }

    /// Applies staged values and stamps `updated_at`
    pub fn save(self) -> Contract {
        Contract {
            fields: self.fields,
            updated_at: Utc::now(),
            ..self.original
        }
    }
}

/// A contract being created from a blueprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractDraft {
    pub name: String,
    values: Vec<(FieldId, FieldValue)>,
}

impl ContractDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Pre-fills a field value, checked against the blueprint on save
    pub fn value(mut self, id: FieldId, value: impl Into<FieldValue>) -> Self {
        self.values.push((id, value.into()));
        self
    }

    /// Validates the draft against the selected blueprint
    ///
    /// Fields are copied from the blueprint in order, each starting at its
    /// type's empty value before any pre-filled values are applied.
    pub fn save(self, blueprint: Option<&Blueprint>) -> Result<Contract, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName("contract"));
        }
        let blueprint = blueprint.ok_or(ValidationError::NoBlueprint)?;

        let mut fields: Vec<ContractField> =
            blueprint.fields.iter().map(ContractField::blank).collect();

        for (id, value) in self.values {
            let index = check_value(&fields, &id, &value).map_err(|e| match e {
                EditError::TypeMismatch {
                    field, expected, ..
                } => ValidationError::InitialValueMismatch { field, expected },
                _ => ValidationError::UnknownField(id.clone()),
            })?;
            fields[index].value = value;
        }

        let now = Utc::now();
        Ok(Contract {
            id: ContractId::generate(&self.name, now),
            name: self.name,
            blueprint_id: blueprint.id.clone(),
            blueprint_name: blueprint.name.clone(),
            status: ContractStatus::Created,
            fields,
            created_at: now,
            updated_at: now,
        })
    }
}
