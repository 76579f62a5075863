//! pact - A local-first contract lifecycle manager
//!
//! Users author reusable "blueprints" (typed field templates), instantiate
//! contracts from them, fill field values, and move each contract along a
//! fixed approval lifecycle until it is locked or revoked.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Blueprint, BlueprintId, Contract, ContractId, ContractStatus, Category};
