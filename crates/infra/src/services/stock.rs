use std::sync::Arc;

use serde::Serialize;

use stockroom_core::ProductId;
use stockroom_inventory::{StockEntry, StockLedger, Warehouse, WarehouseStock};

use crate::services::ServiceError;
use crate::store::{EntityStore, EntityStoreExt};

/// Where one product's stock sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBreakdown {
    pub product_id: ProductId,
    pub total_quantity: i64,
    pub warehouses: Vec<WarehouseStock>,
}

/// Read-only stock lookups.
pub struct StockService {
    store: Arc<dyn EntityStore>,
}

impl StockService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn breakdown(&self, product_id: ProductId) -> Result<StockBreakdown, ServiceError> {
        let stock: Vec<StockEntry> = self.store.load()?;
        let warehouses: Vec<Warehouse> = self.store.load()?;
        let ledger = StockLedger::new(&stock, &warehouses);

        Ok(StockBreakdown {
            product_id,
            total_quantity: ledger.total_quantity(product_id),
            warehouses: ledger.breakdown(product_id),
        })
    }
}
