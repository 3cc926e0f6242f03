use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for obligation-related operations
#[derive(Debug, Error)]
pub enum ObligationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

impl From<DieselError> for ObligationError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ObligationError::NotFound("Record not found".to_string()),
            _ => ObligationError::DatabaseError(err.to_string()),
        }
    }
}

impl From<ObligationError> for String {
    fn from(error: ObligationError) -> Self {
        error.to_string()
    }
}
