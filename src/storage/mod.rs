//! Collaborator seams the engine reads from and writes to.
//!
//! [`Ledger`](crate::ledger::Ledger) implements every store in memory;
//! [`json_backend`] persists whole ledger snapshots for the CLI.

pub mod json_backend;
mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::Result,
    ledger::{
        BankAccount, Budget, FinancialTransaction, HistoryEntry, RecurringItem, ScheduleAdvance,
    },
};

/// Source of posted transactions plus the append used by the processor.
pub trait TransactionStore {
    fn transactions(&self) -> &[FinancialTransaction];
    fn append_transaction(&mut self, transaction: FinancialTransaction) -> Result<Uuid>;

    /// Compensates an append made earlier in a commit that later failed.
    fn retract_transaction(&mut self, id: Uuid) -> Result<()>;
}

/// Recurring items and the schedule writes the processor performs on them.
pub trait RecurringItemStore {
    fn recurring_items(&self) -> &[RecurringItem];

    /// Marks the item as processed `today`, provided its cursor still equals
    /// `expected_cursor` and nobody claimed it today. Returns the previous marker.
    fn claim_cycle(
        &mut self,
        item_id: Uuid,
        expected_cursor: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<NaiveDate>>;

    /// Restores the processed marker after a failed commit.
    fn release_claim(&mut self, item_id: Uuid, previous: Option<NaiveDate>) -> Result<()>;

    /// Moves the cursor forward. Non-forward moves are rejected.
    fn advance_schedule(&mut self, item_id: Uuid, advance: &ScheduleAdvance) -> Result<()>;
}

/// Append-only sink for due-cycle outcomes.
pub trait HistoryStore {
    fn history(&self) -> &[HistoryEntry];
    fn append_history(&mut self, entry: HistoryEntry) -> Result<()>;

    /// Compensates an append made earlier in a commit that later failed.
    fn retract_history(&mut self, id: Uuid) -> Result<()>;
}

pub trait AccountStore {
    fn bank_accounts(&self) -> &[BankAccount];
}

pub trait BudgetStore {
    fn budgets(&self) -> &[Budget];
}

pub use json_backend::{load_ledger_from_path, save_ledger_to_path, JsonStorage};
