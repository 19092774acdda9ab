use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use super::r#trait::{EntityKind, EntityStore, StoreError};

/// File-backed entity store: one JSON array per collection under a data directory.
///
/// A missing file reads as an empty collection. Each file is replaced
/// atomically (write to a temp file, then rename), but a batch spanning several
/// collections is written file by file with no rollback.
#[derive(Debug, Clone)]
pub struct JsonFileEntityStore {
    dir: PathBuf,
}

impl JsonFileEntityStore {
    /// Open (and create if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create data dir {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.collection_name()))
    }
}

impl EntityStore for JsonFileEntityStore {
    fn read_all(&self, kind: EntityKind) -> Result<Vec<JsonValue>, StoreError> {
        let path = self.path_for(kind);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(source) => return Err(StoreError::Io { collection: kind, source }),
        };

        if raw.trim().is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
            collection: kind,
            message: e.to_string(),
        })
    }

    fn write_all(&self, kind: EntityKind, records: Vec<JsonValue>) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&records).map_err(|e| StoreError::Serialization {
            collection: kind,
            message: e.to_string(),
        })?;

        let path = self.path_for(kind);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| StoreError::Io { collection: kind, source })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { collection: kind, source })?;

        tracing::debug!(collection = %kind, records = records.len(), "collection written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntityStore::open(dir.path()).unwrap();
        assert!(store.read_all(EntityKind::Products).unwrap().is_empty());
    }

    #[test]
    fn write_then_read_from_a_fresh_handle() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntityStore::open(dir.path()).unwrap();
        store
            .write_all(EntityKind::StockEntries, vec![json!({"id": 1, "quantity": 4})])
            .unwrap();

        let reopened = JsonFileEntityStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.read_all(EntityKind::StockEntries).unwrap(),
            vec![json!({"id": 1, "quantity": 4})]
        );
        assert!(dir.path().join("stock.json").exists());
        assert!(!dir.path().join("stock.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("transfers.json"), "{not json").unwrap();
        let store = JsonFileEntityStore::open(dir.path()).unwrap();

        let err = store.read_all(EntityKind::Transfers).unwrap_err();
        assert!(matches!(err, StoreError::Serialization { collection: EntityKind::Transfers, .. }));
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileEntityStore::open(&nested).unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }
}
