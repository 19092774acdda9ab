//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, stock conflicts). Storage failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller input was malformed or semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist. Carries the entity kind.
    #[error("{0} not found")]
    NotFound(String),

    /// The request is well-formed but the source warehouse cannot cover it.
    #[error("Insufficient stock in {warehouse}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        warehouse: String,
        available: i64,
        requested: i64,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn insufficient_stock(warehouse: impl Into<String>, available: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            warehouse: warehouse.into(),
            available,
            requested,
        }
    }
}
