//! Field model
//!
//! A field is one typed input slot. Blueprints hold bare [`Field`]s; a
//! contract holds [`ContractField`]s, which carry a value alongside the
//! slot copied from the blueprint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::FieldId;

/// Kind of input a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Date,
    Signature,
    Checkbox,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Signature,
        FieldType::Checkbox,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Signature => "signature",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Label given to a freshly added field, e.g. "Checkbox Field"
    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Date => "Date Field",
            FieldType::Signature => "Signature Field",
            FieldType::Checkbox => "Checkbox Field",
        }
    }

    /// The "unfilled" value for this type
    pub fn empty_value(self) -> FieldValue {
        match self {
            FieldType::Checkbox => FieldValue::Checked(false),
            FieldType::Text | FieldType::Date | FieldType::Signature => {
                FieldValue::Text(String::new())
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "date" => Ok(FieldType::Date),
            "signature" | "sig" => Ok(FieldType::Signature),
            "checkbox" | "check" => Ok(FieldType::Checkbox),
            _ => {
                let known: Vec<_> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
                Err(format!(
                    "Unknown field type: {} (expected one of {})",
                    s,
                    known.join(", ")
                ))
            }
        }
    }
}

/// Layout hint for a field on the authoring canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Canvas slot for the field at `index`
    pub fn for_index(index: usize) -> Self {
        Self {
            x: 50.0,
            y: 50.0 + 60.0 * index as f64,
        }
    }
}

/// Value held by a contract field
///
/// Serialized untagged, so it is a bare JSON boolean or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
}

impl FieldValue {
    /// Returns true if the value fits a field of the given type
    pub fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (FieldValue::Checked(_), FieldType::Checkbox)
                | (
                    FieldValue::Text(_),
                    FieldType::Text | FieldType::Date | FieldType::Signature
                )
        )
    }

    /// Returns true if the value counts as unfilled
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Checked(checked) => !checked,
            FieldValue::Text(text) => text.is_empty(),
        }
    }

    /// Parses user input into a value for the given field type
    ///
    /// Returns None when a checkbox value is not a recognizable boolean.
    pub fn parse_for(field_type: FieldType, input: &str) -> Option<FieldValue> {
        match field_type {
            FieldType::Checkbox => match input.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" | "x" => Some(FieldValue::Checked(true)),
                "false" | "no" | "n" | "0" | "off" | "" => Some(FieldValue::Checked(false)),
                _ => None,
            },
            FieldType::Text | FieldType::Date | FieldType::Signature => {
                Some(FieldValue::Text(input.to_string()))
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Checked(true) => f.write_str("[x]"),
            FieldValue::Checked(false) => f.write_str("[ ]"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A typed input slot on a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub label: String,

    #[serde(default)]
    pub position: Position,
}

/// A field on a contract, with its current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredContractField")]
pub struct ContractField {
    #[serde(flatten)]
    pub field: Field,

    pub value: FieldValue,
}

/// Stored shape of a contract field; a missing or null value means unfilled
#[derive(Deserialize)]
struct StoredContractField {
    #[serde(flatten)]
    field: Field,

    #[serde(default)]
    value: Option<FieldValue>,
}

impl From<StoredContractField> for ContractField {
    fn from(stored: StoredContractField) -> Self {
        let value = stored
            .value
            .unwrap_or_else(|| stored.field.field_type.empty_value());
        Self {
            field: stored.field,
            value,
        }
    }
}

impl ContractField {
    /// Copies a blueprint field with the type's empty value
    pub fn blank(field: &Field) -> Self {
        Self {
            value: field.field_type.empty_value(),
            field: field.clone(),
        }
    }

    pub fn id(&self) -> &FieldId {
        &self.field.id
    }

    pub fn field_type(&self) -> FieldType {
        self.field.field_type
    }

    pub fn label(&self) -> &str {
        &self.field.label
    }

    /// Human-readable rendering of the value for read-only views
    pub fn display_value(&self) -> String {
        match (&self.value, self.field.field_type) {
            (FieldValue::Checked(true), _) => "✓ Checked".to_string(),
            (FieldValue::Checked(false), _) => "○ Not checked".to_string(),
            (FieldValue::Text(text), FieldType::Signature) if text.is_empty() => {
                "(Not signed)".to_string()
            }
            (FieldValue::Text(text), _) if text.is_empty() => "(Empty)".to_string(),
            (FieldValue::Text(text), _) => text.clone(),
        }
    }
}
