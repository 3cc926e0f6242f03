use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for budget-item operations
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Budget item {0} is already converted to an obligation")]
    AlreadyConverted(String),
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

impl From<DieselError> for BudgetError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => BudgetError::NotFound("Record not found".to_string()),
            _ => BudgetError::DatabaseError(err.to_string()),
        }
    }
}

impl From<BudgetError> for String {
    fn from(error: BudgetError) -> Self {
        error.to_string()
    }
}
