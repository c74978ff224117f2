//! Multi-month cash-flow projection with scenario sensitivity.
//!
//! Projections are pure: identical inputs always yield an identical series.
//! Every month combines the monthly-equivalent value of the recurring items in
//! force that month, a damped historical gap-fill when few items are tracked,
//! and the scenario multipliers, then rolls the net into a running balance
//! seeded with the current cash position.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{active_window::is_active_for_month, baseline::HistoricalAverages};
use crate::{
    currency::round_cents,
    errors::CashflowError,
    ledger::{ContextFilter, ItemType, MonthKey, RecurringItem},
};

pub const DEFAULT_FORECAST_MONTHS: u32 = 6;
/// With fewer active items than this, history is blended in.
pub const GAP_FILL_ITEM_THRESHOLD: usize = 3;
/// Share of the uncovered historical average added as gap-fill.
pub const GAP_FILL_DAMPING: f64 = 0.5;

/// Named multiplier profile applied to projected totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Optimistic,
    #[default]
    Realistic,
    Pessimistic,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Optimistic,
        Scenario::Realistic,
        Scenario::Pessimistic,
    ];

    pub fn income_multiplier(&self) -> f64 {
        match self {
            Scenario::Optimistic => 1.15,
            Scenario::Realistic => 1.0,
            Scenario::Pessimistic => 0.85,
        }
    }

    pub fn expense_multiplier(&self) -> f64 {
        match self {
            Scenario::Optimistic => 0.90,
            Scenario::Realistic => 1.0,
            Scenario::Pessimistic => 1.10,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Scenario::Optimistic => "optimistic",
            Scenario::Realistic => "realistic",
            Scenario::Pessimistic => "pessimistic",
        };
        f.write_str(label)
    }
}

impl FromStr for Scenario {
    type Err = CashflowError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Scenario::Optimistic),
            "realistic" => Ok(Scenario::Realistic),
            "pessimistic" => Ok(Scenario::Pessimistic),
            other => Err(CashflowError::Validation(format!(
                "unknown scenario `{other}` (expected optimistic, realistic or pessimistic)"
            ))),
        }
    }
}

/// Everything a projection needs, already loaded in memory.
#[derive(Debug, Clone)]
pub struct ForecastInputs<'a> {
    pub items: &'a [RecurringItem],
    pub context: ContextFilter,
    pub averages: HistoricalAverages,
    pub starting_cash: f64,
    pub start_month: MonthKey,
    pub months: u32,
    pub scenario: Scenario,
}

/// One projected month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastMonth {
    pub index: u32,
    pub month: MonthKey,
    pub recurring_income: f64,
    pub retainer_income: f64,
    pub recurring_expenses: f64,
    pub additional_income: f64,
    pub additional_expenses: f64,
    /// Scenario-adjusted income.
    pub total_income: f64,
    /// Scenario-adjusted expenses.
    pub total_expenses: f64,
    pub net: f64,
    pub cumulative_balance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ForecastSummary {
    pub starting_cash: f64,
    pub end_balance: f64,
    pub lowest_balance: f64,
    /// 1-based month in which the balance first drops below zero.
    pub months_until_negative: Option<u32>,
    pub runway_months: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CashflowForecast {
    pub scenario: Scenario,
    pub months: Vec<ForecastMonth>,
    pub summary: ForecastSummary,
}

impl CashflowForecast {
    /// Cumulative balances including the starting cash position as the first element.
    pub fn balance_series(&self) -> Vec<f64> {
        std::iter::once(self.summary.starting_cash)
            .chain(self.months.iter().map(|month| month.cumulative_balance))
            .collect()
    }
}

/// Monthly-equivalent totals of recurring items, split by kind.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct CommitmentTotals {
    pub income: f64,
    pub retainer: f64,
    pub expenses: f64,
}

impl CommitmentTotals {
    pub fn net(&self) -> f64 {
        self.income + self.retainer - self.expenses
    }

    fn add(&mut self, item: &RecurringItem) {
        let monthly = monthly_value(item);
        match item.item_type {
            ItemType::Income => self.income += monthly,
            ItemType::Retainer => self.retainer += monthly,
            ItemType::Expense => self.expenses += monthly,
        }
    }

    fn rounded(self) -> Self {
        Self {
            income: round_cents(self.income),
            retainer: round_cents(self.retainer),
            expenses: round_cents(self.expenses),
        }
    }
}

/// Monthly burn of every active item in scope, regardless of date windows.
pub fn monthly_commitment_totals(items: &[RecurringItem], context: ContextFilter) -> CommitmentTotals {
    let mut totals = CommitmentTotals::default();
    for item in in_scope(items, context) {
        totals.add(item);
    }
    totals.rounded()
}

/// Projects `inputs.months` months starting at `inputs.start_month`.
pub fn project(inputs: &ForecastInputs<'_>) -> CashflowForecast {
    let scoped: Vec<&RecurringItem> = in_scope(inputs.items, inputs.context).collect();
    let gap_fill = scoped.len() < GAP_FILL_ITEM_THRESHOLD;
    let starting_cash = round_cents(finite_or_zero(inputs.starting_cash));
    let avg_income = finite_or_zero(inputs.averages.avg_monthly_income);
    let avg_expenses = finite_or_zero(inputs.averages.avg_monthly_expenses);

    let mut months = Vec::with_capacity(inputs.months as usize);
    let mut balance = starting_cash;

    for index in 0..inputs.months {
        let month = inputs.start_month.offset(index as i32);
        let mut recurring = CommitmentTotals::default();
        for item in scoped.iter().filter(|item| is_active_for_month(item, month)) {
            recurring.add(item);
        }

        let (additional_income, additional_expenses) = if gap_fill {
            (
                (avg_income - recurring.income - recurring.retainer).max(0.0) * GAP_FILL_DAMPING,
                (avg_expenses - recurring.expenses).max(0.0) * GAP_FILL_DAMPING,
            )
        } else {
            (0.0, 0.0)
        };

        let total_income = round_cents(
            (recurring.income + recurring.retainer + additional_income)
                * inputs.scenario.income_multiplier(),
        );
        let total_expenses = round_cents(
            (recurring.expenses + additional_expenses) * inputs.scenario.expense_multiplier(),
        );
        let net = round_cents(total_income - total_expenses);
        balance = round_cents(balance + net);

        months.push(ForecastMonth {
            index,
            month,
            recurring_income: round_cents(recurring.income),
            retainer_income: round_cents(recurring.retainer),
            recurring_expenses: round_cents(recurring.expenses),
            additional_income: round_cents(additional_income),
            additional_expenses: round_cents(additional_expenses),
            total_income,
            total_expenses,
            net,
            cumulative_balance: balance,
        });
    }

    let summary = summarize(starting_cash, &months);
    CashflowForecast {
        scenario: inputs.scenario,
        months,
        summary,
    }
}

/// Derives the headline KPIs from a projected series.
pub fn summarize(starting_cash: f64, months: &[ForecastMonth]) -> ForecastSummary {
    let end_balance = months
        .last()
        .map(|month| month.cumulative_balance)
        .unwrap_or(starting_cash);
    let lowest_balance = months
        .iter()
        .map(|month| month.cumulative_balance)
        .fold(starting_cash, f64::min);
    let months_until_negative = months
        .iter()
        .position(|month| month.cumulative_balance < 0.0)
        .map(|position| position as u32 + 1);
    let runway_months = months_until_negative.unwrap_or(months.len() as u32);

    ForecastSummary {
        starting_cash,
        end_balance,
        lowest_balance,
        months_until_negative,
        runway_months,
    }
}

fn in_scope(items: &[RecurringItem], context: ContextFilter) -> impl Iterator<Item = &RecurringItem> {
    items
        .iter()
        .filter(move |item| item.is_active && context.matches(item.context))
}

/// Monthly-equivalent amount, with malformed amounts contributing nothing.
fn monthly_value(item: &RecurringItem) -> f64 {
    if !item.amount.is_finite() || item.amount <= 0.0 {
        return 0.0;
    }
    item.frequency.monthly_equivalent(item.amount)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
