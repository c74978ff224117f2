use std::path::PathBuf;

use chrono::NaiveDate;

use super::{
    output::{self, ConsoleSink},
    CliError,
};
use crate::{
    config::Config,
    core::{
        clock::{Clock, FixedClock, SystemClock},
        forecast::{CashflowForecast, Scenario},
        notifications::{NotificationSink, NullSink},
        schedule::{upcoming_obligations, ScheduledStatus},
        services::{BudgetService, ForecastRequest, ForecastService, ProcessingSession, RecurringService},
    },
    currency::format_amount,
    ledger::{ContextFilter, Ledger},
    storage::{load_ledger_from_path, save_ledger_to_path, JsonStorage},
    utils::build_info,
};

/// Where the ledger snapshot is read from and written back to.
pub(super) enum LedgerSource {
    File(PathBuf),
    Stored { storage: JsonStorage, name: String },
}

impl LedgerSource {
    pub(super) fn resolve(path: Option<PathBuf>, name: &str) -> Result<Self, CliError> {
        match path {
            Some(path) => Ok(LedgerSource::File(path)),
            None => Ok(LedgerSource::Stored {
                storage: JsonStorage::new_default()?,
                name: name.to_string(),
            }),
        }
    }

    fn load(&self) -> Result<Ledger, CliError> {
        let ledger = match self {
            LedgerSource::File(path) => load_ledger_from_path(path)?,
            LedgerSource::Stored { storage, name } => storage.load(name)?,
        };
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), CliError> {
        match self {
            LedgerSource::File(path) => save_ledger_to_path(ledger, path)?,
            LedgerSource::Stored { storage, name } => {
                storage.save(ledger, name)?;
            }
        }
        Ok(())
    }
}

fn clock_for(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock::on(date)),
        None => Box::new(SystemClock),
    }
}

pub(super) fn version() {
    println!("{}", build_info::current().summary());
}

pub(super) fn forecast(
    source: &LedgerSource,
    config: &Config,
    months: Option<u32>,
    scenario: Option<Scenario>,
    context: Option<ContextFilter>,
    compare: bool,
    today: Option<NaiveDate>,
) -> Result<(), CliError> {
    let ledger = source.load()?;
    let today = clock_for(today).today();
    let defaults = ForecastRequest::from_config(config);
    let request = ForecastRequest {
        months: months.unwrap_or(defaults.months),
        scenario: scenario.unwrap_or(defaults.scenario),
        context: context.unwrap_or(defaults.context),
    };

    if compare {
        let forecasts = ForecastService::compare_scenarios(&ledger, &request, today)?;
        output::section(format!("Scenario comparison ({} months, {})", request.months, request.context));
        for forecast in &forecasts {
            print_summary(forecast, &config.currency);
        }
        return Ok(());
    }

    let forecast = ForecastService::forecast(&ledger, &request, today)?;
    output::section(format!(
        "Forecast: {} scenario, {} months, {}",
        forecast.scenario, request.months, request.context
    ));
    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Income", "Expenses", "Net", "Balance"
    );
    for month in &forecast.months {
        println!(
            "{:<8} {:>14} {:>14} {:>14} {:>14}",
            month.month.to_string(),
            format_amount(month.total_income, &config.currency),
            format_amount(month.total_expenses, &config.currency),
            output::signed(format_amount(month.net, &config.currency), month.net),
            output::signed(
                format_amount(month.cumulative_balance, &config.currency),
                month.cumulative_balance
            ),
        );
    }
    print_summary(&forecast, &config.currency);
    Ok(())
}

fn print_summary(forecast: &CashflowForecast, currency: &str) {
    let summary = &forecast.summary;
    let negative = summary
        .months_until_negative
        .map(|month| format!("month {month}"))
        .unwrap_or_else(|| "never".into());
    println!(
        "{:<12} start {}  end {}  lowest {}  negative {}  runway {} months",
        forecast.scenario.to_string(),
        format_amount(summary.starting_cash, currency),
        output::signed(format_amount(summary.end_balance, currency), summary.end_balance),
        output::signed(format_amount(summary.lowest_balance, currency), summary.lowest_balance),
        negative,
        summary.runway_months,
    );
}

pub(super) fn process(
    source: &LedgerSource,
    config: &Config,
    today: Option<NaiveDate>,
    dry_run: bool,
) -> Result<(), CliError> {
    let mut ledger = source.load()?;
    let clock = clock_for(today);

    if dry_run {
        let plan = RecurringService::plan(&ledger, clock.as_ref());
        output::section("Processing plan");
        for outcome in &plan.outcomes {
            output::info(format!(
                "{}: {} cycle(s), next due {}",
                outcome.item_name,
                outcome.cycles.len(),
                outcome.advance.next_due_date
            ));
        }
        for failure in &plan.failures {
            output::warning(format!("{}: {}", failure.item_name, failure.reason));
        }
        if plan.is_empty() {
            output::info("Nothing is due.");
        }
        return Ok(());
    }

    let mut sink: Box<dyn NotificationSink> = if config.notifications_enabled {
        Box::new(ConsoleSink)
    } else {
        Box::new(NullSink)
    };
    let session = ProcessingSession::new();
    let report = session
        .run(&mut ledger, clock.as_ref(), sink.as_mut())
        .unwrap_or_default();

    if report.processed_items > 0 {
        source.save(&ledger)?;
    }
    for failure in &report.failures {
        output::error(format!("{}: {}", failure.item_name, failure.reason));
    }
    output::success(format!(
        "Processed {} item(s): {} cycle(s), {} transaction(s) posted, {} failed, {} skipped.",
        report.processed_items,
        report.cycles,
        report.transactions_created,
        report.failed_items(),
        report.skipped.len()
    ));
    Ok(())
}

pub(super) fn budgets(
    source: &LedgerSource,
    config: &Config,
    today: Option<NaiveDate>,
    context: Option<ContextFilter>,
) -> Result<(), CliError> {
    let ledger = source.load()?;
    let today = clock_for(today).today();
    let context = context.unwrap_or(config.default_context);
    let report = BudgetService::active_period(&ledger, today, context);

    output::section(format!("Budgets active on {today}"));
    if report.is_empty() {
        output::info("No budgets cover this date.");
        return Ok(());
    }
    for row in &report {
        println!(
            "{} .. {}  budget {}  spent {}  {:>7.2}%  remaining {}  {:?}",
            row.period_start,
            row.period_end,
            format_amount(row.effective_amount, &config.currency),
            format_amount(row.spent, &config.currency),
            row.utilization_pct,
            output::signed(format_amount(row.variance, &config.currency), row.variance),
            row.status,
        );
    }
    Ok(())
}

pub(super) fn upcoming(
    source: &LedgerSource,
    config: &Config,
    days: u32,
    today: Option<NaiveDate>,
) -> Result<(), CliError> {
    let ledger = source.load()?;
    let today = clock_for(today).today();
    let obligations: Vec<_> = upcoming_obligations(&ledger.recurring_items, today, days)
        .into_iter()
        .filter(|obligation| config.default_context.matches(obligation.context))
        .collect();

    output::section(format!("Upcoming obligations (next {days} days)"));
    if obligations.is_empty() {
        output::info("Nothing scheduled.");
        return Ok(());
    }
    for obligation in &obligations {
        let line = format!(
            "{}  {:<24} {:>14}",
            obligation.due_date,
            obligation.name,
            format_amount(obligation.amount, &obligation.currency)
        );
        match obligation.status {
            ScheduledStatus::Overdue => output::warning(format!("{line}  overdue")),
            ScheduledStatus::Pending => output::info(format!("{line}  pending")),
            ScheduledStatus::Future => println!("{line}"),
        }
    }
    Ok(())
}
