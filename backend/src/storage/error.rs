use thiserror::Error;

use crate::domain::validation::ValidationError;

/// Errors surfaced by every `ClienteStorage` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creation input refused by local validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cliente not found")]
    NotFound,

    /// Operation the backend deliberately does not provide
    #[error("{0} method not implemented")]
    NotImplemented(&'static str),

    /// Write refused by a uniqueness constraint of the store
    #[error("duplicate value rejected by the store: {0}")]
    Conflict(String),

    /// Write refused by a type, NOT NULL or CHECK constraint of the store
    #[error("write rejected by the store: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_error) = &error {
            match db_error.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::Conflict(db_error.message().to_string())
                }
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    return StoreError::Rejected(db_error.message().to_string())
                }
                _ => {}
            }
        }
        StoreError::Database(error)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
