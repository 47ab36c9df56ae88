//! Processed-id ledger: the set of message ids already turned into transactions.
//!
//! Persisted as a JSON array of strings. A missing document and an empty
//! ledger are different states: `clear` removes the document instead of
//! writing `[]`.

use penny_core::store::{self, StoreError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedLedger {
    ids: BTreeSet<String>,
}

impl ProcessedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedLedger {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Load/save/remove for the processed-id ledger.
pub trait LedgerStore {
    /// Never fails: unreadable state degrades to an empty ledger.
    fn load(&self) -> ProcessedLedger;
    fn save(&self, ledger: &ProcessedLedger) -> Result<(), StoreError>;
    /// Remove the persisted ledger entirely.
    fn clear(&self) -> Result<(), StoreError>;
    fn exists(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self) -> ProcessedLedger {
        match store::read_json::<Vec<String>>(&self.path) {
            Ok(Some(ids)) => {
                tracing::debug!(
                    count = ids.len(),
                    path = %self.path.display(),
                    "loaded processed ids"
                );
                ids.into_iter().collect()
            }
            Ok(None) => ProcessedLedger::new(),
            Err(e) => {
                tracing::warn!(error = %e, "processed-id ledger unreadable, starting empty");
                ProcessedLedger::new()
            }
        }
    }

    fn save(&self, ledger: &ProcessedLedger) -> Result<(), StoreError> {
        let ids: Vec<&str> = ledger.iter().collect();
        store::write_json(&self.path, &ids)
    }

    fn clear(&self) -> Result<(), StoreError> {
        store::remove(&self.path)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_absent_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("processed_sms_ids.json"));
        assert!(!store.exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_sms_ids.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(JsonLedgerStore::new(&path).load().is_empty());

        // Right JSON, wrong shape
        fs::write(&path, r#"{"ids": ["1"]}"#).unwrap();
        assert!(JsonLedgerStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("processed_sms_ids.json"));
        let ledger: ProcessedLedger = ["2", "10"].into_iter().collect();
        store.save(&ledger).unwrap();

        let back = store.load();
        assert_eq!(back, ledger);
        assert!(back.contains("10"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("processed_sms_ids.json"));
        store.save(&["1"].into_iter().collect()).unwrap();
        assert!(store.exists());

        store.clear().unwrap();
        assert!(!store.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }
}
