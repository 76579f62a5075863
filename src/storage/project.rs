//! Project management
//!
//! Handles project initialization and provides access to the store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, JsonlStore, Ledger};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a pact project. Run 'pact init' first.")]
    NotInProject,
}

/// A pact project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let pact_dir = root.join(".pact");

        if !pact_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;
        tracing::debug!(root = %root.display(), "opened project");

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let pact_dir = root.join(".pact");

        fs::create_dir_all(&pact_dir).with_context(|| {
            format!("Failed to create .pact directory: {}", pact_dir.display())
        })?;

        // Create default config
        let config_path = pact_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# pact configuration

# Default filter for 'pact contract list'
# (all, active, pending, signed, revoked, or a status such as locked)
default_filter = "all"

# strftime pattern for dates in text output
date_format = "%b %-d, %Y"

# Require --yes before 'pact contract revoke'
confirm_revoke = true
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create empty collections so the layout is visible right away
        let store = JsonlStore::for_project(&root);
        for path in [store.blueprints_path(), store.contracts_path()] {
            if !path.exists() {
                fs::write(path, "")
                    .with_context(|| format!("Failed to create {}", path.display()))?;
            }
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .pact directory path
    pub fn pact_dir(&self) -> PathBuf {
        self.root.join(".pact")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the collection store
    pub fn store(&self) -> JsonlStore {
        JsonlStore::for_project(&self.root)
    }

    /// Loads both collections into a ledger
    pub fn ledger(&self) -> Result<Ledger<JsonlStore>> {
        Ledger::hydrate(self.store())
    }
}
