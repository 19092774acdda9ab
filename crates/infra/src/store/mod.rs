//! Entity store boundary.
//!
//! The core reads and writes whole entity collections through [`EntityStore`];
//! it never depends on a concrete backend. Records travel as JSON values so
//! backends stay independent of the domain types.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::JsonFileEntityStore;
pub use in_memory::InMemoryEntityStore;
pub use r#trait::{EntityKind, EntityStore, EntityStoreExt, StoreError, StoredRecord, encode};
