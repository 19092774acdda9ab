use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use stockroom_infra::services::ServiceError;
use stockroom_inventory::{TransferFilter, TransferRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_transfers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductQuery>,
) -> axum::response::Response {
    let product_id = match query.product_id() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(ServiceError::from(e)),
    };

    match services.transfers.list_transfers(TransferFilter { product_id }) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_transfer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.transfers.create_transfer(&request) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
