use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_infra::services::{ErrorKind, ServiceError};

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err.kind() {
        ErrorKind::Validation => json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
        ErrorKind::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        ErrorKind::Conflict => json_error(StatusCode::BAD_REQUEST, "insufficient_stock", err.to_string()),
        ErrorKind::Persistence => {
            tracing::error!(error = %err, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", err.to_string())
        }
    }
}

/// Malformed JSON bodies are client errors like any other validation failure.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("Invalid request body: {}", rejection.body_text()),
    )
}

/// `{ "error": <message>, "code": <machine code> }`
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
