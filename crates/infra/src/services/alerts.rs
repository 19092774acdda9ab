use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use stockroom_core::ProductId;
use stockroom_inventory::{
    AlertAcknowledgment, AlertSummary, Product, StockAlert, StockEntry, StockLedger, Warehouse,
    acknowledge, compute_alerts, unacknowledge,
};

use crate::services::ServiceError;
use crate::store::{EntityStore, EntityStoreExt};

/// Computes stock alerts and records acknowledgments.
pub struct AlertService {
    store: Arc<dyn EntityStore>,
    default_actor: String,
    write_lock: Mutex<()>,
}

impl AlertService {
    pub fn new(store: Arc<dyn EntityStore>, default_actor: impl Into<String>) -> Self {
        Self {
            store,
            default_actor: default_actor.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn alerts(&self) -> Result<Vec<StockAlert>, ServiceError> {
        let products: Vec<Product> = self.store.load()?;
        let warehouses: Vec<Warehouse> = self.store.load()?;
        let stock: Vec<StockEntry> = self.store.load()?;
        let acknowledgments: Vec<AlertAcknowledgment> = self.store.load()?;

        let ledger = StockLedger::new(&stock, &warehouses);
        Ok(compute_alerts(&products, &ledger, &acknowledgments))
    }

    pub fn summary(&self) -> Result<AlertSummary, ServiceError> {
        Ok(AlertSummary::from_alerts(&self.alerts()?))
    }

    /// Mark a product's alert as seen. Re-acknowledging overwrites the previous record.
    pub fn acknowledge(
        &self,
        product_id: Option<ProductId>,
        acknowledged_by: Option<&str>,
    ) -> Result<AlertAcknowledgment, ServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current: Vec<AlertAcknowledgment> = self.store.load()?;
        let (updated, record) = acknowledge(
            &current,
            product_id,
            acknowledged_by,
            &self.default_actor,
            Utc::now(),
        )?;
        self.store.save(&updated)?;

        tracing::info!(
            product_id = %record.product_id,
            acknowledged_by = record.acknowledged_by.as_deref().unwrap_or_default(),
            "alert acknowledged"
        );
        Ok(record)
    }

    /// Clear a product's acknowledgment. Succeeds when there was none.
    pub fn unacknowledge(&self, product_id: Option<ProductId>) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current: Vec<AlertAcknowledgment> = self.store.load()?;
        let updated = unacknowledge(&current, product_id)?;
        if updated.len() != current.len() {
            self.store.save(&updated)?;
            tracing::info!(product_id = ?product_id, "alert acknowledgment cleared");
        }
        Ok(())
    }
}
