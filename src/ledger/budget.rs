use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    calendar::{shift_month, shift_year},
    context::Context,
};

/// A spending guardrail for a specific category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub period_type: BudgetPeriod,
    pub period_start: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub rollover_amount: f64,
    #[serde(default)]
    pub context: Context,
}

impl Budget {
    pub fn new(
        category_id: Uuid,
        period_type: BudgetPeriod,
        period_start: NaiveDate,
        amount: f64,
        context: Context,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            period_type,
            period_start,
            amount,
            rollover_amount: 0.0,
            context,
        }
    }

    pub fn with_rollover(mut self, rollover_amount: f64) -> Self {
        self.rollover_amount = rollover_amount;
        self
    }

    /// Budgeted amount plus anything carried over from the previous period.
    pub fn effective_amount(&self) -> f64 {
        self.amount + self.rollover_amount
    }

    /// Exclusive end of the budget period.
    pub fn period_end(&self) -> NaiveDate {
        self.period_type.advance(self.period_start)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date < self.period_end()
    }
}

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn advance(&self, from: NaiveDate) -> NaiveDate {
        match self {
            BudgetPeriod::Monthly => shift_month(from, 1),
            BudgetPeriod::Quarterly => shift_month(from, 3),
            BudgetPeriod::Yearly => shift_year(from, 1),
        }
    }
}
