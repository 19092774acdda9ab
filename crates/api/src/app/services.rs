use std::sync::Arc;

use stockroom_infra::services::{AlertService, StockService, TransferService};
use stockroom_infra::store::EntityStore;

/// Services shared by all handlers. One instance per process, so the
/// per-service write locks are process-wide.
pub struct AppServices {
    pub transfers: TransferService,
    pub alerts: AlertService,
    pub stock: StockService,
}

impl AppServices {
    pub fn new(store: Arc<dyn EntityStore>, default_actor: &str) -> Self {
        Self {
            transfers: TransferService::new(store.clone()),
            alerts: AlertService::new(store.clone(), default_actor),
            stock: StockService::new(store),
        }
    }
}
