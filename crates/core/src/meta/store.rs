//! In-memory full-refresh snapshot store over one entity root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::records::Record;

/// Parses one logical record from a directory on disk.
///
/// Each entity type (elections today, future entity types later) supplies
/// its own parser; the store stays entity-agnostic.
pub trait RecordParser: Send + Sync {
    fn parse(&self, dir: &Path) -> Result<Record>;
}

#[derive(Default)]
struct StoreState {
    known_keys: Vec<String>,
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

/// Mapping from primary key to parsed record, rebuilt wholesale on sync.
///
/// `known_keys` and `records` are replaced by `refresh_keys` and
/// `refresh_records` under separate write-lock acquisitions, so readers may
/// observe an updated key list with an older snapshot between the two steps.
/// The lock itself guarantees only that no reader sees a torn map.
pub struct MetaStore {
    root: PathBuf,
    parser: Arc<dyn RecordParser>,
    state: RwLock<StoreState>,
}

impl MetaStore {
    pub fn new(root: impl Into<PathBuf>, parser: Arc<dyn RecordParser>) -> Self {
        Self {
            root: root.into(),
            parser,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Entity root directory (one subdirectory per key).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replace `known_keys` with the subdirectory names under the root,
    /// sorted. Non-directory entries are excluded. Returns the key count.
    pub fn refresh_keys(&self) -> Result<usize> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|err| Error::from_io(err, &self.root))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();

        let count = keys.len();
        self.write().known_keys = keys;
        debug!("refreshed keys under {}: {count}", self.root.display());
        Ok(count)
    }

    /// Parse every known key and replace the record snapshot.
    ///
    /// Fail-fast: any per-key parse error aborts the refresh without
    /// committing a partial snapshot; the prior records stay intact.
    pub fn refresh_records(&self) -> Result<usize> {
        let keys = self.known_keys();
        let mut records = Vec::with_capacity(keys.len());
        let mut index = HashMap::with_capacity(keys.len());
        for key in keys {
            let record = self.parser.parse(&self.root.join(&key))?;
            index.insert(key, records.len());
            records.push(record);
        }

        let count = records.len();
        let mut state = self.write();
        state.records = records;
        state.index = index;
        Ok(count)
    }

    /// Current key list.
    pub fn known_keys(&self) -> Vec<String> {
        self.read().known_keys.clone()
    }

    /// Look up one record.
    ///
    /// Fails with `NotFound` for keys outside `known_keys`. A known key with
    /// no snapshot entry (store empty or mid-refresh) falls back to parsing
    /// that key's directory fresh; the result is not cached back.
    pub fn get(&self, key: &str) -> Result<Record> {
        {
            let state = self.read();
            if !state.known_keys.iter().any(|k| k == key) {
                return Err(Error::not_found(format!("no record for key '{key}'")));
            }
            if let Some(&slot) = state.index.get(key) {
                return Ok(state.records[slot].clone());
            }
        }
        self.parser.parse(&self.root.join(key))
    }

    /// Every record in the snapshot, in the insertion order of the last
    /// refresh pass. Keys discovered but not yet parsed are not consulted.
    pub fn all(&self) -> Vec<Record> {
        self.read().records.clone()
    }

    /// Records whose `field` equals `value` exactly; records lacking the
    /// field are excluded.
    pub fn where_field(&self, field: &str, value: &Value) -> Vec<Record> {
        self.read()
            .records
            .iter()
            .filter(|r| r.matches(field, value))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    // Writers replace state fields wholesale with fully-built values, so a
    // guard recovered from a poisoned lock still holds a coherent snapshot.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Parser stub that counts invocations and names records after their
    /// directory.
    struct StubParser {
        calls: AtomicUsize,
        fail_on: Option<String>,
    }

    impl StubParser {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(key: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(key.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RecordParser for StubParser {
        fn parse(&self, dir: &Path) -> Result<Record> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.fail_on.as_deref() == Some(key.as_str()) {
                return Err(Error::structure(format!("bad record '{key}'")));
            }
            let mut record = Record::new();
            record.set("key", key.clone());
            record.set("name", format!("Election {key}"));
            Ok(record)
        }
    }

    fn seeded_root(keys: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for key in keys {
            fs::create_dir(dir.path().join(key)).expect("mkdir");
        }
        // A stray file must not become a key.
        fs::write(dir.path().join("README.md"), "not an election").expect("write");
        dir
    }

    #[test]
    fn refresh_keys_lists_only_directories_sorted() {
        let root = seeded_root(&["e2", "e1", "e3"]);
        let store = MetaStore::new(root.path(), Arc::new(StubParser::new()));
        let count = store.refresh_keys().expect("refresh");
        assert_eq!(count, 3);
        assert_eq!(store.known_keys(), vec!["e1", "e2", "e3"]);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let root = seeded_root(&["e1"]);
        let store = MetaStore::new(root.path(), Arc::new(StubParser::new()));
        store.refresh_keys().expect("refresh");
        let err = store.get("e9").expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn known_key_without_snapshot_entry_falls_back_without_caching() {
        let root = seeded_root(&["e1"]);
        let parser = Arc::new(StubParser::new());
        let store = MetaStore::new(root.path(), Arc::clone(&parser) as Arc<dyn RecordParser>);
        store.refresh_keys().expect("refresh");

        let first = store.get("e1").expect("fallback");
        assert_eq!(first.key(), Some("e1"));
        let second = store.get("e1").expect("fallback again");
        assert_eq!(first, second);
        // Two fallback parses: nothing was cached into the snapshot.
        assert_eq!(parser.calls(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn refresh_records_populates_in_key_order() {
        let root = seeded_root(&["e2", "e1"]);
        let store = MetaStore::new(root.path(), Arc::new(StubParser::new()));
        store.refresh_keys().expect("keys");
        let count = store.refresh_records().expect("records");
        assert_eq!(count, 2);
        let all = store.all();
        assert_eq!(all[0].key(), Some("e1"));
        assert_eq!(all[1].key(), Some("e2"));
    }

    #[test]
    fn failed_refresh_keeps_prior_snapshot() {
        let root = seeded_root(&["e1", "e2"]);
        let store = MetaStore::new(root.path(), Arc::new(StubParser::new()));
        store.refresh_keys().expect("keys");
        store.refresh_records().expect("records");
        let before = store.all();

        fs::create_dir(root.path().join("e3")).expect("mkdir");
        let failing = MetaStore::new(root.path(), Arc::new(StubParser::failing_on("e3")));
        failing.refresh_keys().expect("keys");
        failing.refresh_records().expect_err("e3 must fail the pass");
        assert!(failing.is_empty(), "partial snapshot must not commit");

        // The original store was never touched.
        assert_eq!(store.all(), before);
    }

    #[test]
    fn where_field_filters_by_exact_equality() {
        let root = seeded_root(&["e1", "e2"]);
        let store = MetaStore::new(root.path(), Arc::new(StubParser::new()));
        store.refresh_keys().expect("keys");
        store.refresh_records().expect("records");

        let hits = store.where_field("name", &serde_json::json!("Election e1"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key(), Some("e1"));
        // Absent field: no matches, no panic.
        assert!(store
            .where_field("status", &serde_json::json!("ongoing"))
            .is_empty());
    }
}
