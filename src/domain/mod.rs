//! Domain models for pact
//!
//! Contains the blueprint/contract model and the lifecycle engine, without
//! any I/O concerns.

mod id;
mod field;
mod blueprint;
mod contract;
mod lifecycle;
mod dashboard;

pub use id::{BlueprintId, ContractId, FieldId, IdError};
pub use field::{ContractField, Field, FieldType, FieldValue, Position};
pub use blueprint::{Blueprint, BlueprintDraft, ValidationError};
pub use contract::{Contract, ContractDraft, ContractEdit, EditError};
pub use lifecycle::{Category, ContractStatus, LifecycleError, StatusColor};
pub use dashboard::{DashboardStats, StatusFilter};
