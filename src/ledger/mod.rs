//! Ledger domain models, persistence-friendly types, and calendar helpers.

pub mod account;
pub mod budget;
pub mod calendar;
pub mod context;
pub mod frequency;
pub mod history;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod recurring;
pub mod transaction;

pub use account::BankAccount;
pub use budget::{Budget, BudgetPeriod};
pub use calendar::MonthKey;
pub use context::{Context, ContextFilter};
pub use frequency::{to_monthly_equivalent, Frequency};
pub use history::{HistoryEntry, HistoryStatus};
pub use ledger::Ledger;
pub use recurring::{ItemType, RecurringItem, ScheduleAdvance};
pub use transaction::{FinancialTransaction, TransactionStatus, TransactionType};
