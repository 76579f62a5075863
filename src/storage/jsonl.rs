//! JSONL storage for blueprints and contracts
//!
//! Each collection lives in its own file with one JSON object per line, in
//! collection order. Every save rewrites the whole file. Uses file locking
//! for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::CollectionStore;
use crate::domain::{Blueprint, Contract};

/// A single collection stored as JSONL
pub struct JsonlFile<T> {
    path: PathBuf,
    kind: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonlFile<T> {
    /// Creates a collection file handle at the given path
    pub fn new(path: impl Into<PathBuf>, kind: &'static str) -> Self {
        Self {
            path: path.into(),
            kind,
            _marker: PhantomData,
        }
    }

    /// Returns the path to the collection file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record, in file order
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "{} store missing, starting empty", self.kind);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {} store: {}", self.kind, self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {} store", self.kind))?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(&line).with_context(|| {
                format!("Failed to parse {} at line {}", self.kind, line_num + 1)
            })?;

            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded {} collection", self.kind);

        // Lock is released when file is dropped
        Ok(records)
    }

    /// Writes all records (full rewrite, order preserved)
    pub fn write_all(&self, records: &[T]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {} store", self.kind))?;

            let mut writer = BufWriter::new(&file);

            for record in records {
                let line = serde_json::to_string(record)
                    .with_context(|| format!("Failed to serialize {}", self.kind))?;
                writeln!(writer, "{}", line)
                    .with_context(|| format!("Failed to write {}", self.kind))?;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush {} store", self.kind))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved {} collection", self.kind);

        Ok(())
    }
}

/// File-backed store for both collections
pub struct JsonlStore {
    blueprints: JsonlFile<Blueprint>,
    contracts: JsonlFile<Contract>,
}

impl JsonlStore {
    /// Creates a store rooted at the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            blueprints: JsonlFile::new(dir.join("blueprints.jsonl"), "blueprint"),
            contracts: JsonlFile::new(dir.join("contracts.jsonl"), "contract"),
        }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".pact"))
    }

    pub fn blueprints_path(&self) -> &Path {
        self.blueprints.path()
    }

    pub fn contracts_path(&self) -> &Path {
        self.contracts.path()
    }
}

impl CollectionStore for JsonlStore {
    fn load_blueprints(&self) -> Result<Vec<Blueprint>> {
        self.blueprints.read_all()
    }

    fn load_contracts(&self) -> Result<Vec<Contract>> {
        self.contracts.read_all()
    }

    fn save_blueprints(&self, blueprints: &[Blueprint]) -> Result<()> {
        self.blueprints.write_all(blueprints)
    }

    fn save_contracts(&self, contracts: &[Contract]) -> Result<()> {
        self.contracts.write_all(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlueprintDraft, ContractDraft, ContractStatus, FieldType, FieldValue};
    use tempfile::TempDir;

    fn make_blueprint(name: &str) -> Blueprint {
        let mut draft = BlueprintDraft::new(name);
        draft.add_field(FieldType::Text);
        draft.add_field(FieldType::Checkbox);
        draft.save().unwrap()
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());

        assert!(store.load_blueprints().unwrap().is_empty());
        assert!(store.load_contracts().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());

        let blueprints = vec![make_blueprint("Zeta"), make_blueprint("Alpha"), make_blueprint("Mid")];
        store.save_blueprints(&blueprints).unwrap();

        let loaded = store.load_blueprints().unwrap();
        let names: Vec<_> = loaded.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(loaded, blueprints);
    }

    #[test]
    fn save_is_a_full_rewrite() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        let blueprint = make_blueprint("NDA");

        let first = ContractDraft::new("First").save(Some(&blueprint)).unwrap();
        let second = ContractDraft::new("Second").save(Some(&blueprint)).unwrap();
        store.save_contracts(&[first.clone(), second]).unwrap();

        let signed = first.with_status(ContractStatus::Signed);
        store.save_contracts(&[signed]).unwrap();

        let loaded = store.load_contracts().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].status, ContractStatus::Signed);
    }

    #[test]
    fn skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        store.save_blueprints(&[make_blueprint("NDA")]).unwrap();

        let content = fs::read_to_string(store.blueprints_path()).unwrap();
        fs::write(store.blueprints_path(), format!("\n{}\n\n", content)).unwrap();

        assert_eq!(store.load_blueprints().unwrap().len(), 1);
    }

    #[test]
    fn reports_line_of_corrupt_record() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        store.save_blueprints(&[make_blueprint("NDA")]).unwrap();

        let mut content = fs::read_to_string(store.blueprints_path()).unwrap();
        content.push_str("{not json}\n");
        fs::write(store.blueprints_path(), content).unwrap();

        let err = store.load_blueprints().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn reads_records_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        let line = r#"{"id":"1700000000000_abc123def","name":"NDA","blueprintId":"1699999999999_zzz","blueprintName":"NDA Template","status":"sent","fields":[{"id":"f1","type":"checkbox","label":"Agree","position":{"x":50,"y":50},"value":true}],"createdAt":"2024-03-01T10:00:00.000Z","updatedAt":"2024-03-02T10:00:00.000Z"}"#;
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(store.contracts_path(), format!("{}\n", line)).unwrap();

        let contracts = store.load_contracts().unwrap();
        assert_eq!(contracts[0].status, ContractStatus::Sent);
        assert_eq!(contracts[0].blueprint_id.as_str(), "1699999999999_zzz");
        assert_eq!(contracts[0].filled_count(), 1);
    }

    #[test]
    fn field_without_value_loads_as_unfilled() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        let line = r#"{"id":"c1","name":"Lease","blueprintId":"b1","blueprintName":"Lease","status":"created","fields":[{"id":"f1","type":"text","label":"Tenant"},{"id":"f2","type":"checkbox","label":"Pets"}],"createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:00Z"}"#;
        fs::write(store.contracts_path(), format!("{}\n", line)).unwrap();

        let contracts = store.load_contracts().unwrap();
        assert_eq!(contracts[0].filled_count(), 0);
        assert_eq!(contracts[0].fields[1].value, FieldValue::Checked(false));
    }

    #[test]
    fn stored_ids_round_trip_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        let line = r#"{"id":" x ","name":"Lease","blueprintId":"a b","blueprintName":"Lease","status":"created","fields":[{"id":"f 1","type":"text","label":"Tenant","value":""}],"createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:00Z"}"#;
        fs::write(store.contracts_path(), format!("{}\n", line)).unwrap();

        let contracts = store.load_contracts().unwrap();
        assert_eq!(contracts[0].id.as_str(), " x ");
        assert_eq!(contracts[0].blueprint_id.as_str(), "a b");

        store.save_contracts(&contracts).unwrap();
        assert_eq!(store.load_contracts().unwrap(), contracts);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path().join("nested").join("dir"));

        store.save_blueprints(&[make_blueprint("NDA")]).unwrap();

        assert!(store.blueprints_path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path());
        store.save_blueprints(&[make_blueprint("NDA")]).unwrap();

        // Temp file should not exist after write
        let temp_path = store.blueprints_path().with_extension("jsonl.tmp");
        assert!(!temp_path.exists());
    }
}
