use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use stockroom_infra::services::ServiceError;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_alerts(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.alerts.alerts() {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.alerts.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn acknowledge(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AcknowledgeRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services
        .alerts
        .acknowledge(body.product_id, body.acknowledged_by.as_deref())
    {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({
                "message": "Alert acknowledged",
                "alert": record,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn unacknowledge(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductQuery>,
) -> axum::response::Response {
    let product_id = match query.product_id() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(ServiceError::from(e)),
    };

    match services.alerts.unacknowledge(product_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Alert acknowledgment removed" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
