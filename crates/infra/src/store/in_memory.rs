use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::r#trait::{EntityKind, EntityStore, StoreError};

/// In-memory entity store.
///
/// Intended for tests/dev. A batch write is applied under a single lock, so
/// readers never observe half of a transfer.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    collections: RwLock<HashMap<EntityKind, Vec<JsonValue>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn read_all(&self, kind: EntityKind) -> Result<Vec<JsonValue>, StoreError> {
        let map = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))?;
        Ok(map.get(&kind).cloned().unwrap_or_default())
    }

    fn write_all(&self, kind: EntityKind, records: Vec<JsonValue>) -> Result<(), StoreError> {
        self.write_batch(vec![(kind, records)])
    }

    fn write_batch(&self, batch: Vec<(EntityKind, Vec<JsonValue>)>) -> Result<(), StoreError> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))?;
        for (kind, records) in batch {
            map.insert(kind, records);
        }
        Ok(())
    }
}
