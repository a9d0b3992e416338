// Error types for collaboration services

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for service and repository operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by services, repositories and the membership oracle
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entity absent for the given id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// Caller lacks the required relationship (creator mismatch or non-membership)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Store-layer failure or inconsistency (write with no effect, rejected row, driver error)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Create a not found error for the named entity kind
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        ServiceError::Persistence(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ServiceError::Forbidden(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, ServiceError::Persistence(_))
    }
}
