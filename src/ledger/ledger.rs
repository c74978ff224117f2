use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    account::BankAccount, budget::Budget, history::HistoryEntry, recurring::RecurringItem,
    transaction::FinancialTransaction,
};

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory snapshot of everything the cash-flow engine reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "Ledger::default_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub accounts: Vec<BankAccount>,
    #[serde(default)]
    pub transactions: Vec<FinancialTransaction>,
    #[serde(default)]
    pub recurring_items: Vec<RecurringItem>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_currency: Self::default_currency(),
            accounts: Vec::new(),
            transactions: Vec::new(),
            recurring_items: Vec::new(),
            history: Vec::new(),
            budgets: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: BankAccount) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_transaction(&mut self, transaction: FinancialTransaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn add_recurring_item(&mut self, item: RecurringItem) -> Uuid {
        let id = item.id;
        self.recurring_items.push(item);
        self.touch();
        id
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn recurring_item(&self, id: Uuid) -> Option<&RecurringItem> {
        self.recurring_items.iter().find(|item| item.id == id)
    }

    pub fn recurring_item_mut(&mut self, id: Uuid) -> Option<&mut RecurringItem> {
        self.recurring_items.iter_mut().find(|item| item.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&FinancialTransaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// History entries recorded for `item_id`, oldest first.
    pub fn history_for(&self, item_id: Uuid) -> Vec<&HistoryEntry> {
        let mut entries: Vec<&HistoryEntry> = self
            .history
            .iter()
            .filter(|entry| entry.recurring_item_id == item_id)
            .collect();
        entries.sort_by_key(|entry| entry.expected_date);
        entries
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn default_currency() -> String {
        "USD".into()
    }
}
