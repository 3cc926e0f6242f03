use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Custom error type for payment-recording operations
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Overpayment rejected: maximum acceptable amount is {max_acceptable}")]
    OverpaymentRejected { max_acceptable: Decimal },
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

impl From<DieselError> for PaymentError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PaymentError::NotFound("Record not found".to_string()),
            _ => PaymentError::DatabaseError(err.to_string()),
        }
    }
}

impl From<PaymentError> for String {
    fn from(error: PaymentError) -> Self {
        error.to_string()
    }
}
