/// Core error types for Mixtape
use thiserror::Error;

/// Result type alias using `MixtapeError`
pub type Result<T> = std::result::Result<T, MixtapeError>;

/// Core error type for Mixtape
#[derive(Error, Debug)]
pub enum MixtapeError {
    /// Malformed or missing input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Authenticated but not authorized
    #[error("Permission denied")]
    PermissionDenied,

    /// Permission denied with context
    #[error("Permission denied: {0}")]
    PermissionDeniedWithContext(String),

    /// Referenced entity absent
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MixtapeError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a permission denied error with context
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDeniedWithContext(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for MixtapeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
