use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use stockroom_inventory::{AlertAcknowledgment, Product, StockEntry, Transfer, Warehouse};

/// The entity collections the store holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Products,
    Warehouses,
    StockEntries,
    Transfers,
    AlertAcknowledgments,
}

impl EntityKind {
    /// Stable collection name (also the file stem for file-backed stores).
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Products => "products",
            EntityKind::Warehouses => "warehouses",
            EntityKind::StockEntries => "stock",
            EntityKind::Transfers => "transfers",
            EntityKind::AlertAcknowledgments => "alert_acknowledgments",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Durable store failure. Never client-correctable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {collection}: {source}")]
    Io {
        collection: EntityKind,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {collection} records: {message}")]
    Serialization {
        collection: EntityKind,
        message: String,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-collection entity store.
///
/// Reads return the full collection; writes replace it. There are no partial
/// updates. A backend that can write several collections atomically should
/// override [`EntityStore::write_batch`]; the default writes them one by one
/// and may leave the batch partially applied on failure.
pub trait EntityStore: Send + Sync {
    fn read_all(&self, kind: EntityKind) -> Result<Vec<JsonValue>, StoreError>;

    fn write_all(&self, kind: EntityKind, records: Vec<JsonValue>) -> Result<(), StoreError>;

    fn write_batch(&self, batch: Vec<(EntityKind, Vec<JsonValue>)>) -> Result<(), StoreError> {
        for (kind, records) in batch {
            self.write_all(kind, records)?;
        }
        Ok(())
    }
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn read_all(&self, kind: EntityKind) -> Result<Vec<JsonValue>, StoreError> {
        (**self).read_all(kind)
    }

    fn write_all(&self, kind: EntityKind, records: Vec<JsonValue>) -> Result<(), StoreError> {
        (**self).write_all(kind, records)
    }

    fn write_batch(&self, batch: Vec<(EntityKind, Vec<JsonValue>)>) -> Result<(), StoreError> {
        (**self).write_batch(batch)
    }
}

/// A domain record that lives in one store collection.
pub trait StoredRecord: Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

impl StoredRecord for Product {
    const KIND: EntityKind = EntityKind::Products;
}

impl StoredRecord for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouses;
}

impl StoredRecord for StockEntry {
    const KIND: EntityKind = EntityKind::StockEntries;
}

impl StoredRecord for Transfer {
    const KIND: EntityKind = EntityKind::Transfers;
}

impl StoredRecord for AlertAcknowledgment {
    const KIND: EntityKind = EntityKind::AlertAcknowledgments;
}

/// Serialize typed records into their raw stored form.
pub fn encode<T: StoredRecord>(records: &[T]) -> Result<Vec<JsonValue>, StoreError> {
    records
        .iter()
        .map(|r| {
            serde_json::to_value(r).map_err(|e| StoreError::Serialization {
                collection: T::KIND,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Typed access on top of the raw collection contract.
pub trait EntityStoreExt: EntityStore {
    fn load<T: StoredRecord>(&self) -> Result<Vec<T>, StoreError> {
        self.read_all(T::KIND)?
            .into_iter()
            .map(|v| {
                serde_json::from_value(v).map_err(|e| StoreError::Serialization {
                    collection: T::KIND,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    fn save<T: StoredRecord>(&self, records: &[T]) -> Result<(), StoreError> {
        self.write_all(T::KIND, encode(records)?)
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}
