use serde::Deserialize;

use stockroom_core::{DomainError, ProductId};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /alerts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    pub product_id: Option<ProductId>,
    pub acknowledged_by: Option<String>,
}

/// `?productId=` query parameter, kept raw so a bad value maps to a validation error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub product_id: Option<String>,
}

impl ProductQuery {
    /// `Ok(None)` when absent or blank.
    pub fn product_id(&self) -> Result<Option<ProductId>, DomainError> {
        match self.product_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}
