//! Six-month historical income/expense baselines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    currency::round_cents,
    ledger::{calendar::shift_month, ContextFilter, FinancialTransaction, TransactionType},
};

/// Months of history averaged into the baseline. Also the fixed divisor.
pub const LOOKBACK_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoricalAverages {
    pub avg_monthly_income: f64,
    pub avg_monthly_expenses: f64,
}

impl HistoricalAverages {
    pub fn new(avg_monthly_income: f64, avg_monthly_expenses: f64) -> Self {
        Self {
            avg_monthly_income,
            avg_monthly_expenses,
        }
    }
}

/// Inclusive `(start, end)` of the lookback window ending on `today`.
pub fn lookback_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (shift_month(today, -(LOOKBACK_MONTHS as i32)), today)
}

/// Averages non-void income and expense transactions over the lookback window.
///
/// The sum is always divided by [`LOOKBACK_MONTHS`], even when the ledger holds
/// less history, so sparse data underestimates rather than extrapolates.
pub fn historical_averages(
    transactions: &[FinancialTransaction],
    filter: ContextFilter,
    today: NaiveDate,
) -> HistoricalAverages {
    let (start, end) = lookback_window(today);
    let mut income = 0.0;
    let mut expenses = 0.0;

    for txn in transactions {
        if txn.is_void() || !filter.matches(txn.context) {
            continue;
        }
        if txn.transaction_date < start || txn.transaction_date > end {
            continue;
        }
        let amount = if txn.amount.is_finite() { txn.amount } else { 0.0 };
        match txn.transaction_type {
            TransactionType::Income => income += amount,
            TransactionType::Expense => expenses += amount,
            TransactionType::Transfer => {}
        }
    }

    let months = LOOKBACK_MONTHS as f64;
    HistoricalAverages {
        avg_monthly_income: round_cents(income / months),
        avg_monthly_expenses: round_cents(expenses / months),
    }
}
