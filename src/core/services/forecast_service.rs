use chrono::NaiveDate;
use tracing::debug;

use super::{ServiceError, ServiceResult};
use crate::{
    config::{Config, MAX_FORECAST_MONTHS},
    core::{
        baseline::historical_averages,
        forecast::{
            monthly_commitment_totals, project, CashflowForecast, CommitmentTotals, ForecastInputs,
            Scenario, DEFAULT_FORECAST_MONTHS,
        },
    },
    currency::round_cents,
    ledger::{BankAccount, ContextFilter, MonthKey},
    storage::{AccountStore, RecurringItemStore, TransactionStore},
};

/// Horizon, scenario and scope of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRequest {
    pub months: u32,
    pub scenario: Scenario,
    pub context: ContextFilter,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            months: DEFAULT_FORECAST_MONTHS,
            scenario: Scenario::Realistic,
            context: ContextFilter::All,
        }
    }
}

impl ForecastRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            months: config.forecast_months,
            scenario: config.default_scenario,
            context: config.default_context,
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    fn validate(&self) -> ServiceResult<()> {
        if self.months == 0 || self.months > MAX_FORECAST_MONTHS {
            return Err(ServiceError::Invalid(format!(
                "forecast horizon must be between 1 and {MAX_FORECAST_MONTHS} months, got {}",
                self.months
            )));
        }
        Ok(())
    }
}

pub struct ForecastService;

impl ForecastService {
    /// Sum of active account balances in scope.
    pub fn cash_position(accounts: &[BankAccount], context: ContextFilter) -> f64 {
        let total: f64 = accounts
            .iter()
            .filter(|account| account.is_active && context.matches(account.context))
            .map(|account| {
                if account.current_balance.is_finite() {
                    account.current_balance
                } else {
                    0.0
                }
            })
            .sum();
        round_cents(total)
    }

    /// Projects `request.months` months starting with the month containing `today`.
    pub fn forecast<S>(store: &S, request: &ForecastRequest, today: NaiveDate) -> ServiceResult<CashflowForecast>
    where
        S: TransactionStore + RecurringItemStore + AccountStore + ?Sized,
    {
        request.validate()?;
        let inputs = Self::inputs(store, request, today);
        let forecast = project(&inputs);
        debug!(
            scenario = %request.scenario,
            months = request.months,
            end_balance = forecast.summary.end_balance,
            "forecast projected"
        );
        Ok(forecast)
    }

    /// One forecast per scenario over identical inputs, in [`Scenario::ALL`] order.
    pub fn compare_scenarios<S>(
        store: &S,
        request: &ForecastRequest,
        today: NaiveDate,
    ) -> ServiceResult<Vec<CashflowForecast>>
    where
        S: TransactionStore + RecurringItemStore + AccountStore + ?Sized,
    {
        request.validate()?;
        let base = Self::inputs(store, request, today);
        Ok(Scenario::ALL
            .iter()
            .map(|scenario| {
                project(&ForecastInputs {
                    scenario: *scenario,
                    ..base.clone()
                })
            })
            .collect())
    }

    pub fn commitments<S>(store: &S, context: ContextFilter) -> CommitmentTotals
    where
        S: RecurringItemStore + ?Sized,
    {
        monthly_commitment_totals(store.recurring_items(), context)
    }

    fn inputs<'a, S>(store: &'a S, request: &ForecastRequest, today: NaiveDate) -> ForecastInputs<'a>
    where
        S: TransactionStore + RecurringItemStore + AccountStore + ?Sized,
    {
        ForecastInputs {
            items: store.recurring_items(),
            context: request.context,
            averages: historical_averages(store.transactions(), request.context, today),
            starting_cash: Self::cash_position(store.bank_accounts(), request.context),
            start_month: MonthKey::containing(today),
            months: request.months,
            scenario: request.scenario,
        }
    }
}
