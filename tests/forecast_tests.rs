mod common;

use cashflow_core::{
    core::{
        forecast::{project, ForecastInputs, Scenario},
        services::{ForecastRequest, ForecastService},
        HistoricalAverages,
    },
    ledger::{to_monthly_equivalent, ContextFilter, Frequency, ItemType, MonthKey, RecurringItem},
};
use common::{date, studio_ledger};

#[test]
fn studio_business_forecast_accumulates_monthly_net() {
    let ledger = studio_ledger();
    let request = ForecastRequest {
        context: ContextFilter::Business,
        ..ForecastRequest::default()
    };
    let forecast = ForecastService::forecast(&ledger, &request, date(2024, 1, 20)).unwrap();

    assert_eq!(forecast.summary.starting_cash, 12_000.0);
    for month in &forecast.months {
        assert_eq!(month.retainer_income, 4_000.0);
        assert_eq!(month.recurring_expenses, 2_250.0);
        assert_eq!(month.additional_income, 0.0);
        assert_eq!(month.net, 1_750.0);
    }
    assert_eq!(forecast.summary.end_balance, 22_500.0);
    assert_eq!(forecast.summary.lowest_balance, 12_000.0);
    assert_eq!(forecast.summary.months_until_negative, None);
    assert_eq!(forecast.summary.runway_months, 6);
}

#[test]
fn scenarios_bracket_the_realistic_projection() {
    let ledger = studio_ledger();
    let request = ForecastRequest {
        months: 12,
        context: ContextFilter::Business,
        ..ForecastRequest::default()
    };
    let forecasts = ForecastService::compare_scenarios(&ledger, &request, date(2024, 1, 20)).unwrap();
    let pessimistic = forecasts
        .iter()
        .find(|f| f.scenario == Scenario::Pessimistic)
        .unwrap();
    assert_eq!(pessimistic.months[0].total_income, 3_400.0);
    assert_eq!(pessimistic.months[0].total_expenses, 2_475.0);
    assert!(forecasts[0].summary.end_balance > forecasts[1].summary.end_balance);
    assert!(forecasts[1].summary.end_balance > forecasts[2].summary.end_balance);
}

#[test]
fn burn_down_example_turns_negative_in_month_six() {
    let items = vec![RecurringItem::new(
        "Payroll",
        ItemType::Expense,
        1_000.0,
        Frequency::Monthly,
        date(2024, 1, 1),
    )];
    let forecast = project(&ForecastInputs {
        items: &items,
        context: ContextFilter::All,
        averages: HistoricalAverages::default(),
        starting_cash: 5_000.0,
        start_month: MonthKey::containing(date(2024, 1, 1)),
        months: 6,
        scenario: Scenario::Realistic,
    });
    let balances: Vec<f64> = forecast.months.iter().map(|m| m.cumulative_balance).collect();
    assert_eq!(balances, vec![4_000.0, 3_000.0, 2_000.0, 1_000.0, 0.0, -1_000.0]);
    assert_eq!(forecast.summary.months_until_negative, Some(6));
}

#[test]
fn monthly_equivalents_match_reference_figures() {
    assert_eq!(to_monthly_equivalent(1_200.0, Frequency::Yearly), 100.0);
    assert_eq!(to_monthly_equivalent(300.0, Frequency::Quarterly), 100.0);
    assert!((to_monthly_equivalent(100.0, Frequency::Weekly) - 433.0).abs() < 1e-9);
    assert!((to_monthly_equivalent(100.0, Frequency::Biweekly) - 217.0).abs() < 1e-9);
    for frequency in Frequency::ALL {
        let single = to_monthly_equivalent(37.5, frequency);
        assert!((to_monthly_equivalent(75.0, frequency) - 2.0 * single).abs() < 1e-9);
    }
}

#[test]
fn empty_ledger_projects_flat_cash() {
    let ledger = cashflow_core::ledger::Ledger::new("Empty");
    let forecast =
        ForecastService::forecast(&ledger, &ForecastRequest::default(), date(2024, 1, 1)).unwrap();
    assert_eq!(forecast.months.len(), 6);
    assert!(forecast.months.iter().all(|m| m.cumulative_balance == 0.0));
    assert_eq!(forecast.summary.runway_months, 6);
}
