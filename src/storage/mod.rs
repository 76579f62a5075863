//! # Storage Layer
//!
//! Persistence for pact. The domain never touches storage directly: a
//! [`CollectionStore`] is passed in explicitly and always reads and writes
//! whole collections (last write wins, no partial updates).
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Blueprints | JSONL (one JSON per line) | `.pact/blueprints.jsonl` |
//! | Contracts | JSONL (one JSON per line) | `.pact/contracts.jsonl` |
//! | Config | TOML | `.pact/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`JsonlStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//!
//! ## Project Structure
//!
//! ```text
//! .pact/
//! ├── blueprints.jsonl      # Blueprint collection
//! ├── contracts.jsonl       # Contract collection
//! └── config.toml           # Project configuration
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a pact project
//! - [`Ledger`] - In-memory collections backed by a store
//! - [`JsonlStore`] / [`MemoryStore`] - Store implementations
//! - [`Config`] - Project and global configuration

mod jsonl;
mod memory;
mod ledger;
mod config;
mod project;

use anyhow::Result;

use crate::domain::{Blueprint, Contract};

pub use jsonl::{JsonlFile, JsonlStore};
pub use memory::MemoryStore;
pub use ledger::{replace_by_id, Ledger};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use project::{Project, ProjectError};

/// Whole-collection persistence for blueprints and contracts
pub trait CollectionStore {
    fn load_blueprints(&self) -> Result<Vec<Blueprint>>;

    fn load_contracts(&self) -> Result<Vec<Contract>>;

    fn save_blueprints(&self, blueprints: &[Blueprint]) -> Result<()>;

    fn save_contracts(&self, contracts: &[Contract]) -> Result<()>;
}
