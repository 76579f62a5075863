//! Blueprint domain model
//!
//! Blueprints are reusable field templates. They are authored as a
//! [`BlueprintDraft`], where labels can still change and fields can be
//! added or removed, and become an immutable [`Blueprint`] on save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::field::{Field, FieldType, Position};
use super::id::{BlueprintId, FieldId};

/// Rejections at the blueprint and contract creation boundaries
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a {0} name")]
    EmptyName(&'static str),

    #[error("Please add at least one field")]
    NoFields,

    #[error("Please select a blueprint")]
    NoBlueprint,

    #[error("Value for field {field} does not match its type ({expected})")]
    InitialValueMismatch { field: FieldId, expected: FieldType },

    #[error("Blueprint has no field {0}")]
    UnknownField(FieldId),
}

/// A saved, reusable field template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub id: BlueprintId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Display order is sequence order
    pub fields: Vec<Field>,

    pub created_at: DateTime<Utc>,
}

impl Blueprint {
    /// Looks up a field by ID
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }
}

/// A blueprint being authored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlueprintDraft {
    pub name: String,
    pub description: String,
    fields: Vec<Field>,
}

impl BlueprintDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a field with the type's default label, returning its ID
    pub fn add_field(&mut self, field_type: FieldType) -> FieldId {
        self.add_labeled_field(field_type, field_type.default_label())
    }

    /// Appends a field with an explicit label, returning its ID
    pub fn add_labeled_field(&mut self, field_type: FieldType, label: impl Into<String>) -> FieldId {
        let label = label.into();
        let id = FieldId::generate(&label, Utc::now());
        self.fields.push(Field {
            id: id.clone(),
            field_type,
            label,
            position: Position::for_index(self.fields.len()),
        });
        id
    }

    /// Renames a field, returning false if it does not exist
    pub fn set_label(&mut self, id: &FieldId, label: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| &f.id == id) {
            Some(field) => {
                field.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Removes a field, returning false if it does not exist
    pub fn remove_field(&mut self, id: &FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| &f.id != id);
        self.fields.len() != before
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validates the draft and produces a blueprint with a fresh ID
    pub fn save(self) -> Result<Blueprint, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName("blueprint"));
        }
        if self.fields.is_empty() {
            return Err(ValidationError::NoFields);
        }

        let now = Utc::now();
        Ok(Blueprint {
            id: BlueprintId::generate(&self.name, now),
            name: self.name,
            description: self.description,
            fields: self.fields,
            created_at: now,
        })
    }
}
