use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use stockroom_inventory::{
    Product, StockEntry, Transfer, TransferFilter, TransferRequest, TransferView, Warehouse,
    list_transfers, plan_transfer,
};

use crate::services::ServiceError;
use crate::store::{EntityStore, EntityStoreExt, StoredRecord, encode};

/// Executes and lists stock transfers.
pub struct TransferService {
    store: Arc<dyn EntityStore>,
    write_lock: Mutex<()>,
}

impl TransferService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Validate and apply a transfer, persisting the stock and transfer collections together.
    ///
    /// On a persistence error the transfer must be treated as not applied. A
    /// backend without atomic batches may still have written one of the two
    /// collections.
    pub fn create_transfer(&self, request: &TransferRequest) -> Result<TransferView, ServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let products: Vec<Product> = self.store.load()?;
        let warehouses: Vec<Warehouse> = self.store.load()?;
        let stock: Vec<StockEntry> = self.store.load()?;
        let mut transfers: Vec<Transfer> = self.store.load()?;

        let outcome = match plan_transfer(request, &products, &warehouses, &stock, &transfers, Utc::now()) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "transfer rejected");
                return Err(e.into());
            }
        };

        let transfer = outcome.transfer;
        transfers.push(transfer.clone());

        let batch = vec![
            (StockEntry::KIND, encode(&outcome.stock)?),
            (Transfer::KIND, encode(&transfers)?),
        ];
        if let Err(e) = self.store.write_batch(batch) {
            tracing::warn!(error = %e, transfer_id = %transfer.id, "transfer not persisted");
            return Err(e.into());
        }

        tracing::info!(
            transfer_id = %transfer.id,
            product_id = %transfer.product_id,
            from_warehouse_id = %transfer.from_warehouse_id,
            to_warehouse_id = %transfer.to_warehouse_id,
            quantity = transfer.quantity,
            new_destination_entry = outcome.created_destination_entry,
            "transfer completed"
        );

        Ok(TransferView::enrich(&transfer, &products, &warehouses))
    }

    /// All transfers (optionally for one product), newest first, with display names.
    pub fn list_transfers(&self, filter: TransferFilter) -> Result<Vec<TransferView>, ServiceError> {
        let transfers: Vec<Transfer> = self.store.load()?;
        // Name resolution degrades to placeholder labels, so unreadable reference data is not fatal.
        let products: Vec<Product> = self.store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "products unavailable for transfer listing");
            Vec::new()
        });
        let warehouses: Vec<Warehouse> = self.store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "warehouses unavailable for transfer listing");
            Vec::new()
        });

        Ok(list_transfers(&transfers, &products, &warehouses, filter))
    }
}
