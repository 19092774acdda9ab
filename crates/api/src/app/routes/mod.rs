use axum::{Router, routing::get};

pub mod alerts;
pub mod stock;
pub mod system;
pub mod transfers;

/// Router for all inventory endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/transfers",
            get(transfers::list_transfers).post(transfers::create_transfer),
        )
        .route("/stock/:product_id", get(stock::get_breakdown))
        .route(
            "/alerts",
            get(alerts::list_alerts)
                .post(alerts::acknowledge)
                .delete(alerts::unacknowledge),
        )
        .route("/alerts/summary", get(alerts::summary))
}
