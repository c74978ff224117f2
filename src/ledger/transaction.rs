use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::Context;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Posted,
    Pending,
    Void,
}

/// A posted ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialTransaction {
    pub id: Uuid,
    pub amount: f64,
    #[serde(default = "FinancialTransaction::default_currency")]
    pub currency: String,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_item_id: Option<Uuid>,
}

impl FinancialTransaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: f64,
        transaction_date: NaiveDate,
        context: Context,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            currency: Self::default_currency(),
            transaction_type,
            transaction_date,
            context,
            category_id: None,
            bank_account_id: None,
            status: TransactionStatus::Posted,
            description: None,
            recurring_item_id: None,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_void(&self) -> bool {
        self.status == TransactionStatus::Void
    }

    pub fn void(&mut self) {
        self.status = TransactionStatus::Void;
    }

    fn default_currency() -> String {
        "USD".into()
    }
}
