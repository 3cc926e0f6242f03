use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for schedule-tracking operations
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

impl From<DieselError> for ScheduleError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ScheduleError::NotFound("Record not found".to_string()),
            _ => ScheduleError::DatabaseError(err.to_string()),
        }
    }
}

impl From<ScheduleError> for String {
    fn from(error: ScheduleError) -> Self {
        error.to_string()
    }
}
