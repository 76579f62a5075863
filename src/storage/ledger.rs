//! In-memory ledger of blueprints and contracts
//!
//! The ledger is hydrated from a [`CollectionStore`] once, then every
//! mutation builds the next collection by value substitution, writes the
//! whole collection back, and only then replaces its in-memory copy.

use anyhow::Result;

use super::CollectionStore;
use crate::domain::{Blueprint, BlueprintId, Contract, ContractId};

pub struct Ledger<S> {
    store: S,
    blueprints: Vec<Blueprint>,
    contracts: Vec<Contract>,
}

/// Replaces the contract with the same ID, returning None if absent
pub fn replace_by_id(contracts: &[Contract], updated: Contract) -> Option<Vec<Contract>> {
    let index = contracts.iter().position(|c| c.id == updated.id)?;
    let mut next = contracts.to_vec();
    next[index] = updated;
    Some(next)
}

impl<S: CollectionStore> Ledger<S> {
    /// Loads both collections from the store
    pub fn hydrate(store: S) -> Result<Self> {
        let blueprints = store.load_blueprints()?;
        let contracts = store.load_contracts()?;
        tracing::debug!(
            blueprints = blueprints.len(),
            contracts = contracts.len(),
            "hydrated ledger"
        );

        Ok(Self {
            store,
            blueprints,
            contracts,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn blueprints(&self) -> &[Blueprint] {
        &self.blueprints
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn blueprint(&self, id: &BlueprintId) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| &b.id == id)
    }

    pub fn contract(&self, id: &ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|c| &c.id == id)
    }

    /// Appends a blueprint and persists the collection
    pub fn add_blueprint(&mut self, blueprint: Blueprint) -> Result<()> {
        let mut next = self.blueprints.clone();
        tracing::info!(id = %blueprint.id, name = %blueprint.name, "adding blueprint");
        next.push(blueprint);
        self.store.save_blueprints(&next)?;
        self.blueprints = next;
        Ok(())
    }

    /// Removes a blueprint; contracts made from it are left untouched
    pub fn delete_blueprint(&mut self, id: &BlueprintId) -> Result<bool> {
        let next: Vec<_> = self
            .blueprints
            .iter()
            .filter(|b| &b.id != id)
            .cloned()
            .collect();
        if next.len() == self.blueprints.len() {
            return Ok(false);
        }

        tracing::info!(%id, "deleting blueprint");
        self.store.save_blueprints(&next)?;
        self.blueprints = next;
        Ok(true)
    }

    /// Appends a contract and persists the collection
    pub fn add_contract(&mut self, contract: Contract) -> Result<()> {
        let mut next = self.contracts.clone();
        tracing::info!(id = %contract.id, blueprint = %contract.blueprint_id, "adding contract");
        next.push(contract);
        self.store.save_contracts(&next)?;
        self.contracts = next;
        Ok(())
    }

    /// Replaces a contract by ID and persists the collection
    ///
    /// Returns false, without writing, when no contract has that ID.
    pub fn update_contract(&mut self, contract: Contract) -> Result<bool> {
        let id = contract.id.clone();
        let status = contract.status;
        let Some(next) = replace_by_id(&self.contracts, contract) else {
            return Ok(false);
        };

        tracing::info!(%id, %status, "updating contract");
        self.store.save_contracts(&next)?;
        self.contracts = next;
        Ok(true)
    }

    /// Removes a contract by ID and persists the collection
    pub fn delete_contract(&mut self, id: &ContractId) -> Result<bool> {
        let next: Vec<_> = self
            .contracts
            .iter()
            .filter(|c| &c.id != id)
            .cloned()
            .collect();
        if next.len() == self.contracts.len() {
            return Ok(false);
        }

        tracing::info!(%id, "deleting contract");
        self.store.save_contracts(&next)?;
        self.contracts = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlueprintDraft, ContractDraft, ContractStatus, FieldType};
    use crate::storage::MemoryStore;

    fn blueprint(name: &str) -> Blueprint {
        let mut draft = BlueprintDraft::new(name);
        draft.add_field(FieldType::Text);
        draft.save().unwrap()
    }

    fn ledger_with_contracts(names: &[&str]) -> (Ledger<MemoryStore>, Blueprint) {
        let bp = blueprint("NDA");
        let contracts = names
            .iter()
            .map(|n| ContractDraft::new(*n).save(Some(&bp)).unwrap())
            .collect();
        let store = MemoryStore::with(vec![bp.clone()], contracts);
        (Ledger::hydrate(store).unwrap(), bp)
    }

    #[test]
    fn hydrate_loads_both_collections() {
        let (ledger, bp) = ledger_with_contracts(&["A", "B"]);

        assert_eq!(ledger.blueprints().len(), 1);
        assert_eq!(ledger.contracts().len(), 2);
        assert!(ledger.blueprint(&bp.id).is_some());
        assert_eq!(ledger.store().save_count(), 0);
    }

    #[test]
    fn add_persists_full_collection() {
        let mut ledger = Ledger::hydrate(MemoryStore::new()).unwrap();
        let bp = blueprint("Lease");
        ledger.add_blueprint(bp.clone()).unwrap();
        ledger
            .add_contract(ContractDraft::new("Flat 4").save(Some(&bp)).unwrap())
            .unwrap();

        assert_eq!(ledger.store().load_blueprints().unwrap(), vec![bp]);
        assert_eq!(ledger.store().load_contracts().unwrap().len(), 1);
        assert_eq!(ledger.store().save_count(), 2);
    }

    #[test]
    fn update_replaces_by_id_in_place() {
        let (mut ledger, _) = ledger_with_contracts(&["A", "B", "C"]);
        let target = ledger.contracts()[1].advanced().unwrap();

        assert!(ledger.update_contract(target.clone()).unwrap());

        let names: Vec<_> = ledger.contracts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ledger.contract(&target.id).unwrap().status, ContractStatus::Approved);
        assert_eq!(ledger.store().load_contracts().unwrap()[1], target);
    }

    #[test]
    fn update_of_unknown_contract_is_a_noop() {
        let (mut ledger, bp) = ledger_with_contracts(&["A"]);
        let stranger = ContractDraft::new("Stranger").save(Some(&bp)).unwrap();

        assert!(!ledger.update_contract(stranger).unwrap());
        assert_eq!(ledger.store().save_count(), 0);
    }

    #[test]
    fn delete_contract_filters_by_id() {
        let (mut ledger, _) = ledger_with_contracts(&["A", "B"]);
        let id = ledger.contracts()[0].id.clone();

        assert!(ledger.delete_contract(&id).unwrap());
        assert!(!ledger.delete_contract(&id).unwrap());
        assert_eq!(ledger.store().load_contracts().unwrap().len(), 1);
    }

    #[test]
    fn deleting_blueprint_keeps_its_contracts() {
        let (mut ledger, bp) = ledger_with_contracts(&["A", "B"]);

        assert!(ledger.delete_blueprint(&bp.id).unwrap());

        assert!(ledger.blueprints().is_empty());
        assert_eq!(ledger.contracts().len(), 2);
        assert_eq!(ledger.contracts()[0].blueprint_name, "NDA");
    }

    #[test]
    fn replace_by_id_is_pure() {
        let (ledger, _) = ledger_with_contracts(&["A", "B"]);
        let original = ledger.contracts().to_vec();
        let updated = original[0].with_status(ContractStatus::Revoked);

        let next = replace_by_id(&original, updated).unwrap();

        assert_eq!(original[0].status, ContractStatus::Created);
        assert_eq!(next[0].status, ContractStatus::Revoked);
        assert_eq!(next[1], original[1]);
    }
}
