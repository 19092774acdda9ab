//! Inventory domain module.
//!
//! This crate contains the business rules for multi-warehouse stock: the stock
//! ledger, transfer planning and alert classification. Everything here is
//! deterministic domain logic (no IO, no HTTP, no storage); callers pass in the
//! current collections and the current time.

pub mod alerts;
pub mod ledger;
pub mod model;
pub mod transfer;

pub use alerts::{
    AlertStatus, AlertSummary, Classification, Severity, StockAlert, acknowledge, classify,
    compute_alerts, unacknowledge,
};
pub use ledger::{StockLedger, WarehouseStock};
pub use model::{AlertAcknowledgment, Product, StockEntry, Transfer, TransferStatus, Warehouse};
pub use transfer::{
    RequestedQuantity, TransferFilter, TransferOutcome, TransferRequest, TransferView,
    ValidatedTransfer, list_transfers, plan_transfer,
};
