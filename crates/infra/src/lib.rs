//! Infrastructure layer: entity store backends, configuration, and the
//! services that run transfer/alert units of work against the store.

pub mod config;
pub mod services;
pub mod store;
