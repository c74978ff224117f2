pub mod budget_service;
pub mod forecast_service;
pub mod recurring_service;

pub use budget_service::BudgetService;
pub use forecast_service::{ForecastRequest, ForecastService};
pub use recurring_service::{ProcessingReport, ProcessingSession, RecurringService};

use crate::errors::CashflowError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CashflowError),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
