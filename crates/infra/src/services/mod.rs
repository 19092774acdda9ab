//! Units of work over the entity store.
//!
//! Each service loads the collections it needs, runs the pure domain logic
//! from `stockroom-inventory`, and writes the results back. Mutating
//! operations hold a service-wide lock for the whole read-validate-write
//! sequence, so two concurrent transfers can never both pass validation
//! against the same stale stock.

pub mod alerts;
pub mod error;
pub mod stock;
pub mod transfers;

pub use alerts::AlertService;
pub use error::{ErrorKind, ServiceError};
pub use stock::{StockBreakdown, StockService};
pub use transfers::TransferService;
