use thiserror::Error;

use stockroom_core::DomainError;

use crate::store::StoreError;

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Coarse error class, used to pick a boundary response.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Persistence,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(DomainError::Validation(_) | DomainError::InvalidId(_)) => {
                ErrorKind::Validation
            }
            ServiceError::Domain(DomainError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Domain(DomainError::InsufficientStock { .. }) => ErrorKind::Conflict,
            ServiceError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}
