use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    currency::{round_cents, round_pct},
    ledger::{Budget, FinancialTransaction, TransactionType},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    OverBudget,
    UnderBudget,
    /// Nothing budgeted and nothing spent.
    Empty,
}

/// Spent-versus-budgeted figures for one budget period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetUtilization {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub period_start: NaiveDate,
    /// Exclusive.
    pub period_end: NaiveDate,
    pub effective_amount: f64,
    pub spent: f64,
    pub utilization_pct: f64,
    pub variance: f64,
    pub status: BudgetStatus,
}

/// Sums the budget's category expenses inside `[period_start, period_end)`.
pub fn budget_utilization(budget: &Budget, transactions: &[FinancialTransaction]) -> BudgetUtilization {
    let period_end = budget.period_end();
    let spent: f64 = transactions
        .iter()
        .filter(|txn| {
            !txn.is_void()
                && txn.transaction_type == TransactionType::Expense
                && txn.category_id == Some(budget.category_id)
                && txn.context == budget.context
                && budget.covers(txn.transaction_date)
        })
        .map(|txn| if txn.amount.is_finite() { txn.amount } else { 0.0 })
        .sum();

    let effective_amount = round_cents(budget.effective_amount());
    let spent = round_cents(spent);

    BudgetUtilization {
        budget_id: budget.id,
        category_id: budget.category_id,
        period_start: budget.period_start,
        period_end,
        effective_amount,
        spent,
        utilization_pct: utilization_pct(spent, effective_amount),
        variance: round_cents(effective_amount - spent),
        status: status_for(effective_amount, spent),
    }
}

/// `100 × spent / effective`, or 0 when nothing positive is budgeted.
pub fn utilization_pct(spent: f64, effective_amount: f64) -> f64 {
    if effective_amount <= 0.0 {
        return 0.0;
    }
    round_pct(100.0 * spent / effective_amount)
}

fn status_for(effective_amount: f64, spent: f64) -> BudgetStatus {
    if effective_amount.abs() < f64::EPSILON && spent.abs() < f64::EPSILON {
        return BudgetStatus::Empty;
    }
    match spent.partial_cmp(&effective_amount).unwrap_or(Ordering::Equal) {
        Ordering::Greater => BudgetStatus::OverBudget,
        Ordering::Less => BudgetStatus::UnderBudget,
        Ordering::Equal => BudgetStatus::OnTrack,
    }
}
