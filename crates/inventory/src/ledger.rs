//! Read-side view over stock entries.

use serde::Serialize;

use stockroom_core::{ProductId, WarehouseId};

use crate::model::{StockEntry, Warehouse};

/// Per-warehouse stock line for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStock {
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub warehouse_location: String,
    pub quantity: i64,
}

/// Answers "how much of product P is in warehouse W" and "how much of P exists in total".
///
/// Borrowed, never mutates. Missing data yields zero or an empty breakdown.
#[derive(Debug, Clone, Copy)]
pub struct StockLedger<'a> {
    entries: &'a [StockEntry],
    warehouses: &'a [Warehouse],
}

impl<'a> StockLedger<'a> {
    pub fn new(entries: &'a [StockEntry], warehouses: &'a [Warehouse]) -> Self {
        Self { entries, warehouses }
    }

    /// The stock entry for a product/warehouse pair, if one has been created.
    pub fn entry(&self, product_id: ProductId, warehouse_id: WarehouseId) -> Option<&'a StockEntry> {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id && e.warehouse_id == warehouse_id)
    }

    pub fn quantity_at(&self, product_id: ProductId, warehouse_id: WarehouseId) -> i64 {
        self.entry(product_id, warehouse_id).map(|e| e.quantity).unwrap_or(0)
    }

    pub fn total_quantity(&self, product_id: ProductId) -> i64 {
        self.entries
            .iter()
            .filter(|e| e.product_id == product_id)
            .map(|e| e.quantity)
            .sum()
    }

    /// Where a product's stock sits, in stock-entry order.
    ///
    /// Zero-quantity entries and entries pointing at a warehouse that no longer
    /// exists are left out.
    pub fn breakdown(&self, product_id: ProductId) -> Vec<WarehouseStock> {
        self.entries
            .iter()
            .filter(|e| e.product_id == product_id && e.quantity != 0)
            .filter_map(|e| {
                let warehouse = self.warehouses.iter().find(|w| w.id == e.warehouse_id)?;
                Some(WarehouseStock {
                    warehouse_id: warehouse.id,
                    warehouse_name: warehouse.name.clone(),
                    warehouse_location: warehouse.location.clone(),
                    quantity: e.quantity,
                })
            })
            .collect()
    }
}
