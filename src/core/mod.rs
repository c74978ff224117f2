pub mod active_window;
pub mod baseline;
pub mod budget;
pub mod clock;
pub mod forecast;
pub mod notifications;
pub mod processor;
pub mod schedule;
pub mod services;

pub use active_window::{active_items_for_month, is_active_for_month, is_active_for_month_key};
pub use baseline::{historical_averages, HistoricalAverages, LOOKBACK_MONTHS};
pub use budget::{budget_utilization, BudgetStatus, BudgetUtilization};
pub use clock::{Clock, FixedClock, SystemClock};
pub use forecast::{
    monthly_commitment_totals, project, CashflowForecast, CommitmentTotals, ForecastInputs,
    ForecastMonth, ForecastSummary, Scenario, DEFAULT_FORECAST_MONTHS,
};
pub use notifications::{NotificationRequest, NotificationSink, Severity};
pub use processor::{plan_due_cycles, ItemOutcome, ProcessingPlan};
pub use schedule::{upcoming_obligations, ScheduledStatus, UpcomingObligation};
