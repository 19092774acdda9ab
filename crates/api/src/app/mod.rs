//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store-backed services shared by every handler
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and query parameter parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use stockroom_infra::config::AppConfig;
use stockroom_infra::store::{EntityStore, StoreError};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from process configuration (entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let store = config.open_store()?;
    Ok(build_app_with_store(store, &config.default_actor))
}

/// Build the router over an already-open store.
pub fn build_app_with_store(store: Arc<dyn EntityStore>, default_actor: &str) -> Router {
    let services = Arc::new(services::AppServices::new(store, default_actor));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}
