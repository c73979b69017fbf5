//! History store adapter.
//!
//! The rotation engine talks to an ordered key/value store through the
//! `HistoryStore` trait and composes every key through [`crate::keys::Keys`]
//! — never ad hoc strings. `put_all` is the one atomicity primitive the
//! engine relies on: a logical update is a single all-or-nothing batch and
//! partial application is never observable.

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{Result, RotaError};

/// Key: store key string. Value: raw bytes (counters, dates, YAML).
const ROTA: TableDefinition<&str, &[u8]> = TableDefinition::new("rota");

pub trait HistoryStore: Send + Sync {
    /// `Ok(None)` when the key is absent — absence is a default, not an error.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Write every entry in one atomic batch.
    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;

    fn list_keys(&self) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

/// Embedded store backed by redb. A write transaction spanning all keys of
/// a batch gives `put_all` its all-or-nothing guarantee.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`.
    ///
    /// Creates the table up front so reads never race its existence.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(|e| RotaError::Store(e.to_string()))?;
        let wt = db
            .begin_write()
            .map_err(|e| RotaError::Store(e.to_string()))?;
        wt.open_table(ROTA)
            .map_err(|e| RotaError::Store(e.to_string()))?;
        wt.commit().map_err(|e| RotaError::Store(e.to_string()))?;
        Ok(Self { db })
    }
}

impl HistoryStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| RotaError::Store(e.to_string()))?;
        let table = rt
            .open_table(ROTA)
            .map_err(|e| RotaError::Store(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| RotaError::Store(e.to_string()))?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.put_all(BTreeMap::from([(key.to_string(), value.to_vec())]))
    }

    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| RotaError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(ROTA)
                .map_err(|e| RotaError::Store(e.to_string()))?;
            for (key, value) in &entries {
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(|e| RotaError::Store(e.to_string()))?;
            }
        }
        wt.commit().map_err(|e| RotaError::Store(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| RotaError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(ROTA)
                .map_err(|e| RotaError::Store(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| RotaError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| RotaError::Store(e.to_string()))?;
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| RotaError::Store(e.to_string()))?;
        let table = rt
            .open_table(ROTA)
            .map_err(|e| RotaError::Store(e.to_string()))?;

        let mut keys = Vec::new();
        for entry in table.iter().map_err(|e| RotaError::Store(e.to_string()))? {
            let (k, _) = entry.map_err(|e| RotaError::Store(e.to_string()))?;
            keys.push(k.value().to_string());
        }
        Ok(keys)
    }
}

// ---------------------------------------------------------------------------
// MemStore (test support)
// ---------------------------------------------------------------------------

/// In-memory store for engine unit tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemStore {
    data: std::sync::Mutex<BTreeMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl HistoryStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn put_all(&self, entries: BTreeMap<String, Vec<u8>>) -> Result<()> {
        self.data.lock().unwrap().extend(entries);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.data.lock().unwrap().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, RedbStore) {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn absent_key_reads_as_none() {
        let (_dir, store) = open_tmp();
        assert_eq!(store.get("team::missing").unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let (_dir, store) = open_tmp();
        store.put("team::member::alice", &[0, 7]).unwrap();
        assert_eq!(store.get("team::member::alice").unwrap(), Some(vec![0, 7]));
    }

    #[test]
    fn put_all_lands_every_key() {
        let (_dir, store) = open_tmp();
        let batch = BTreeMap::from([
            ("a".to_string(), b"1".to_vec()),
            ("b".to_string(), b"2".to_vec()),
            ("c".to_string(), b"3".to_vec()),
        ]);
        store.put_all(batch).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get("b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get("c").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn put_overwrites_existing_value() {
        let (_dir, store) = open_tmp();
        store.put("k", b"old").unwrap();
        store.put("k", b"new").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn delete_removes_key_and_is_idempotent() {
        let (_dir, store) = open_tmp();
        store.put("k", b"v").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.delete("k").unwrap();
    }

    #[test]
    fn list_keys_returns_all_keys_in_order() {
        let (_dir, store) = open_tmp();
        store.put("b", b"2").unwrap();
        store.put("a", b"1").unwrap();
        assert_eq!(store.list_keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.put("k", b"v").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }
}
