//! Identifiers for blueprints, contracts and fields
//!
//! ID Format (freshly generated):
//! - Blueprint IDs: `bp-{7-char-hash}` (e.g., `bp-7f2b4c1`)
//! - Contract IDs: `ct-{7-char-hash}` (e.g., `ct-9d3e5f2`)
//! - Field IDs: `fd-{7-char-hash}` (e.g., `fd-03ab9e1`)
//!
//! Hash is derived from a seed (name or label), the creation timestamp and a
//! process-local sequence number, so two fields added within the same
//! nanosecond still get distinct IDs.
//!
//! IDs read back from storage are opaque: any non-empty string is accepted
//! verbatim, which keeps collections written by other tools loadable.
//! Parsing user input (`FromStr`) also trims and rejects inner whitespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid {kind} ID: identifiers must not be empty")]
    Empty { kind: &'static str },

    #[error("Invalid {kind} ID '{value}': identifiers must not contain whitespace")]
    Whitespace { kind: &'static str, value: String },
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a 7-character hash from seed, timestamp and a sequence number
fn generate_hash(seed: &str, timestamp: DateTime<Utc>) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}{}{}",
        seed,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        sequence
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

fn validate(kind: &'static str, s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if s.chars().any(char::is_whitespace) {
        return Err(IdError::Whitespace {
            kind,
            value: s.to_string(),
        });
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh ID from a seed and timestamp
            pub fn generate(seed: &str, timestamp: DateTime<Utc>) -> Self {
                Self(format!(concat!($prefix, "-{}"), generate_hash(seed, timestamp)))
            }

            /// Returns the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                validate($kind, s)?;
                Ok(Self(s.to_string()))
            }
        }

        /// Stored IDs are taken verbatim; only an empty string is refused
        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.is_empty() {
                    return Err(IdError::Empty { kind: $kind });
                }
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

opaque_id!(
    /// Blueprint ID, generated as `bp-{7-char-hash}`
    BlueprintId,
    "bp",
    "blueprint"
);

opaque_id!(
    /// Contract ID, generated as `ct-{7-char-hash}`
    ContractId,
    "ct",
    "contract"
);

opaque_id!(
    /// Field ID, generated as `fd-{7-char-hash}`
    ///
    /// Copied verbatim from a blueprint onto every contract instantiated from it.
    FieldId,
    "fd",
    "field"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_unique_for_same_seed_and_timestamp() {
        let ts = Utc::now();

        let id1 = FieldId::generate("Text Field", ts);
        let id2 = FieldId::generate("Text Field", ts);

        assert_ne!(id1, id2);
    }

    #[test]
    fn generated_format_is_correct() {
        let bp = BlueprintId::generate("NDA", Utc::now()).to_string();
        let ct = ContractId::generate("NDA with Acme", Utc::now()).to_string();
        let fd = FieldId::generate("Signature", Utc::now()).to_string();

        assert!(bp.starts_with("bp-"));
        assert_eq!(bp.len(), 10); // "bp-" + 7 chars
        assert!(ct.starts_with("ct-"));
        assert!(fd.starts_with("fd-"));
    }

    #[test]
    fn parses_generated_ids() {
        let original = ContractId::generate("Lease", Utc::now());
        let parsed: ContractId = original.to_string().parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn accepts_foreign_opaque_ids() {
        let id: BlueprintId = "1700000000000_k3j9x2a1b".parse().unwrap();
        assert_eq!(id.as_str(), "1700000000000_k3j9x2a1b");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(
            "".parse::<FieldId>(),
            Err(IdError::Empty { kind: "field" })
        );
        assert!("   ".parse::<ContractId>().is_err());
        assert!("ct 123".parse::<ContractId>().is_err());
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id: ContractId = "  ct-1234567 ".parse().unwrap();
        assert_eq!(id.as_str(), "ct-1234567");
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id: FieldId = "f1".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"f1\"");

        let parsed: FieldId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_keeps_stored_ids_verbatim() {
        let padded: ContractId = serde_json::from_str("\" x \"").unwrap();
        assert_eq!(padded.as_str(), " x ");

        let spaced: BlueprintId = serde_json::from_str("\"a b\"").unwrap();
        assert_eq!(serde_json::to_string(&spaced).unwrap(), "\"a b\"");
    }

    #[test]
    fn serde_rejects_empty_id() {
        assert!(serde_json::from_str::<BlueprintId>("\"\"").is_err());
    }
}
