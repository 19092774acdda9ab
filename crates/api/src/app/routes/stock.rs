use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use stockroom_core::ProductId;
use stockroom_infra::services::ServiceError;

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn get_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(ServiceError::from(e)),
    };

    match services.stock.breakdown(product_id) {
        Ok(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
