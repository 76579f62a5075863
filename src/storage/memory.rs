//! In-memory collection store
//!
//! Holds both collections in process memory. Useful for tests and for
//! embedding the ledger without touching the filesystem.

use std::cell::RefCell;

use anyhow::Result;

use super::CollectionStore;
use crate::domain::{Blueprint, Contract};

#[derive(Debug, Default)]
pub struct MemoryStore {
    blueprints: RefCell<Vec<Blueprint>>,
    contracts: RefCell<Vec<Contract>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing collections
    pub fn with(blueprints: Vec<Blueprint>, contracts: Vec<Contract>) -> Self {
        Self {
            blueprints: RefCell::new(blueprints),
            contracts: RefCell::new(contracts),
            saves: RefCell::new(0),
        }
    }

    /// Number of collection writes so far
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl CollectionStore for MemoryStore {
    fn load_blueprints(&self) -> Result<Vec<Blueprint>> {
        Ok(self.blueprints.borrow().clone())
    }

    fn load_contracts(&self) -> Result<Vec<Contract>> {
        Ok(self.contracts.borrow().clone())
    }

    fn save_blueprints(&self, blueprints: &[Blueprint]) -> Result<()> {
        *self.blueprints.borrow_mut() = blueprints.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn save_contracts(&self, contracts: &[Contract]) -> Result<()> {
        *self.contracts.borrow_mut() = contracts.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
