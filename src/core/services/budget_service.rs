use chrono::NaiveDate;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::{
    core::budget::{budget_utilization, BudgetUtilization},
    ledger::{Budget, ContextFilter},
    storage::{BudgetStore, TransactionStore},
};

pub struct BudgetService;

impl BudgetService {
    /// Budgets whose period contains `today`.
    pub fn active_budgets<S>(store: &S, today: NaiveDate, context: ContextFilter) -> Vec<&Budget>
    where
        S: BudgetStore + ?Sized,
    {
        store
            .budgets()
            .iter()
            .filter(|budget| budget.covers(today) && context.matches(budget.context))
            .collect()
    }

    /// Utilization of every budget active on `today`, ordered by period start.
    pub fn active_period<S>(store: &S, today: NaiveDate, context: ContextFilter) -> Vec<BudgetUtilization>
    where
        S: BudgetStore + TransactionStore + ?Sized,
    {
        let mut report: Vec<BudgetUtilization> = Self::active_budgets(store, today, context)
            .into_iter()
            .map(|budget| budget_utilization(budget, store.transactions()))
            .collect();
        report.sort_by(|a, b| {
            a.period_start
                .cmp(&b.period_start)
                .then_with(|| a.category_id.cmp(&b.category_id))
        });
        report
    }

    pub fn utilization<S>(store: &S, budget_id: Uuid) -> ServiceResult<BudgetUtilization>
    where
        S: BudgetStore + TransactionStore + ?Sized,
    {
        let budget = store
            .budgets()
            .iter()
            .find(|budget| budget.id == budget_id)
            .ok_or_else(|| ServiceError::Invalid(format!("budget {budget_id} not found")))?;
        Ok(budget_utilization(budget, store.transactions()))
    }
}
