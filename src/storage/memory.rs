use chrono::NaiveDate;
use uuid::Uuid;

use super::{AccountStore, BudgetStore, HistoryStore, RecurringItemStore, TransactionStore};
use crate::{
    errors::{CashflowError, Result},
    ledger::{
        BankAccount, Budget, FinancialTransaction, HistoryEntry, Ledger, RecurringItem,
        ScheduleAdvance,
    },
};

impl TransactionStore for Ledger {
    fn transactions(&self) -> &[FinancialTransaction] {
        &self.transactions
    }

    fn append_transaction(&mut self, transaction: FinancialTransaction) -> Result<Uuid> {
        if self.transactions.iter().any(|txn| txn.id == transaction.id) {
            return Err(CashflowError::Storage(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }
        Ok(self.add_transaction(transaction))
    }

    fn retract_transaction(&mut self, id: Uuid) -> Result<()> {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        if self.transactions.len() == before {
            return Err(CashflowError::NotFound(format!("transaction {id}")));
        }
        self.touch();
        Ok(())
    }
}

impl RecurringItemStore for Ledger {
    fn recurring_items(&self) -> &[RecurringItem] {
        &self.recurring_items
    }

    fn claim_cycle(
        &mut self,
        item_id: Uuid,
        expected_cursor: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        let item = self
            .recurring_item_mut(item_id)
            .ok_or_else(|| CashflowError::NotFound(format!("recurring item {item_id}")))?;
        if item.next_due_date != expected_cursor {
            return Err(CashflowError::ScheduleConflict {
                item_id,
                expected: expected_cursor,
                found: item.next_due_date,
            });
        }
        if item.last_processed_date == Some(today) {
            return Err(CashflowError::AlreadyProcessed(item_id));
        }
        let previous = item.last_processed_date.replace(today);
        self.touch();
        Ok(previous)
    }

    fn release_claim(&mut self, item_id: Uuid, previous: Option<NaiveDate>) -> Result<()> {
        let item = self
            .recurring_item_mut(item_id)
            .ok_or_else(|| CashflowError::NotFound(format!("recurring item {item_id}")))?;
        item.last_processed_date = previous;
        self.touch();
        Ok(())
    }

    fn advance_schedule(&mut self, item_id: Uuid, advance: &ScheduleAdvance) -> Result<()> {
        let item = self
            .recurring_item_mut(item_id)
            .ok_or_else(|| CashflowError::NotFound(format!("recurring item {item_id}")))?;
        if advance.next_due_date <= item.next_due_date {
            return Err(CashflowError::Validation(format!(
                "schedule for {} must move forward (current {}, proposed {})",
                item_id, item.next_due_date, advance.next_due_date
            )));
        }
        item.next_due_date = advance.next_due_date;
        item.last_generated_at = Some(advance.last_generated_at);
        self.touch();
        Ok(())
    }
}

impl HistoryStore for Ledger {
    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn append_history(&mut self, entry: HistoryEntry) -> Result<()> {
        self.history.push(entry);
        self.touch();
        Ok(())
    }

    fn retract_history(&mut self, id: Uuid) -> Result<()> {
        let before = self.history.len();
        self.history.retain(|entry| entry.id != id);
        if self.history.len() == before {
            return Err(CashflowError::NotFound(format!("history entry {id}")));
        }
        self.touch();
        Ok(())
    }
}

impl AccountStore for Ledger {
    fn bank_accounts(&self) -> &[BankAccount] {
        &self.accounts
    }
}

impl BudgetStore for Ledger {
    fn budgets(&self) -> &[Budget] {
        &self.budgets
    }
}
