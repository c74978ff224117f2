use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Error type shared by the storage, config and processing layers.
#[derive(Debug, Error)]
pub enum CashflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Schedule conflict for recurring item {item_id}: expected cursor {expected}, found {found}")]
    ScheduleConflict {
        item_id: Uuid,
        expected: NaiveDate,
        found: NaiveDate,
    },
    #[error("Recurring item {0} was already processed today")]
    AlreadyProcessed(Uuid),
}

pub type Result<T> = std::result::Result<T, CashflowError>;
