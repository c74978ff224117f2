//! Due-cycle planning for recurring items.
//!
//! Planning is a pure function of `(items, today, now)`: it decides which
//! cycles fell due, builds the history entries, transactions and notification
//! requests for them, and computes the new schedule cursor. Nothing is written
//! here; [`RecurringService`](crate::core::services::RecurringService) applies
//! each [`ItemOutcome`] against the stores.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::notifications::{NotificationRequest, Severity};
use crate::{
    currency::{format_amount, round_cents},
    errors::{CashflowError, Result},
    ledger::{
        FinancialTransaction, HistoryEntry, ItemType, RecurringItem, ScheduleAdvance,
        TransactionType,
    },
};

/// Upper bound on missed cycles replayed for one item in one run.
pub const MAX_CATCH_UP_CYCLES: usize = 1024;

/// Everything produced for one due cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub due_date: NaiveDate,
    pub history_entry: HistoryEntry,
    pub transaction: Option<FinancialTransaction>,
    pub notification: NotificationRequest,
}

/// All cycles handled for one item plus the schedule state to commit with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub item_id: Uuid,
    pub item_name: String,
    /// Cursor the plan was computed from; the commit only succeeds if it is unchanged.
    pub previous_cursor: NaiveDate,
    pub cycles: Vec<CycleOutcome>,
    pub advance: ScheduleAdvance,
}

impl ItemOutcome {
    pub fn transactions(&self) -> impl Iterator<Item = &FinancialTransaction> {
        self.cycles.iter().filter_map(|cycle| cycle.transaction.as_ref())
    }

    pub fn notifications(&self) -> impl Iterator<Item = &NotificationRequest> {
        self.cycles.iter().map(|cycle| &cycle.notification)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `last_processed_date` already equals today.
    AlreadyProcessedToday,
    /// The cursor is past the item's end date.
    Ended,
    /// Another session moved the cursor or claimed the item between planning and commit.
    ClaimedElsewhere,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedItem {
    pub item_id: Uuid,
    pub item_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemFailure {
    pub item_id: Uuid,
    pub item_name: String,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(item_id: Uuid, item_name: impl Into<String>, error: &CashflowError) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            reason: error.to_string(),
        }
    }
}

/// Result of planning one processing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingPlan {
    pub today: Option<NaiveDate>,
    pub outcomes: Vec<ItemOutcome>,
    pub failures: Vec<ItemFailure>,
    pub skipped: Vec<SkippedItem>,
}

impl ProcessingPlan {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty() && self.failures.is_empty()
    }

    pub fn cycle_count(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.cycles.len()).sum()
    }

    pub fn notifications(&self) -> impl Iterator<Item = &NotificationRequest> {
        self.outcomes.iter().flat_map(ItemOutcome::notifications)
    }
}

enum Decision {
    NotDue,
    Skip(SkipReason),
    Due(ItemOutcome),
}

/// Plans every cycle due on or before `today` across `items`.
///
/// Items are independent: a malformed item becomes an [`ItemFailure`] and the
/// remaining items are still planned.
pub fn plan_due_cycles(
    items: &[RecurringItem],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> ProcessingPlan {
    let mut plan = ProcessingPlan {
        today: Some(today),
        ..ProcessingPlan::default()
    };

    for item in items.iter().filter(|item| item.is_active) {
        match plan_item(item, today, now) {
            Ok(Decision::NotDue) => {}
            Ok(Decision::Skip(reason)) => plan.skipped.push(SkippedItem {
                item_id: item.id,
                item_name: item.name.clone(),
                reason,
            }),
            Ok(Decision::Due(outcome)) => plan.outcomes.push(outcome),
            Err(err) => plan.failures.push(ItemFailure::new(item.id, &item.name, &err)),
        }
    }

    plan
}

/// Plans a single item. `Ok(None)` means nothing is due today.
pub fn plan_item_cycles(
    item: &RecurringItem,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Option<ItemOutcome>> {
    match plan_item(item, today, now)? {
        Decision::Due(outcome) => Ok(Some(outcome)),
        Decision::NotDue | Decision::Skip(_) => Ok(None),
    }
}

fn plan_item(item: &RecurringItem, today: NaiveDate, now: DateTime<Utc>) -> Result<Decision> {
    if item.next_due_date > today {
        return Ok(Decision::NotDue);
    }
    if item.has_ended_by(item.next_due_date) {
        return Ok(Decision::Skip(SkipReason::Ended));
    }
    if item.last_processed_date == Some(today) {
        return Ok(Decision::Skip(SkipReason::AlreadyProcessedToday));
    }
    validate(item)?;

    let mut cycles = Vec::new();
    let mut cursor = item.next_due_date;
    while cursor <= today && !item.has_ended_by(cursor) && cycles.len() < MAX_CATCH_UP_CYCLES {
        cycles.push(build_cycle(item, cursor, now));
        cursor = item
            .frequency
            .advance(cursor)
            .filter(|next| *next > cursor)
            .ok_or_else(|| {
                CashflowError::Validation(format!(
                    "cannot advance `{}` past {cursor}",
                    item.name
                ))
            })?;
    }

    if cycles.len() == MAX_CATCH_UP_CYCLES && cursor <= today {
        tracing::warn!(
            item = %item.id,
            cursor = %cursor,
            "catch-up limit reached; remaining cycles roll over to the next run"
        );
    }

    Ok(Decision::Due(ItemOutcome {
        item_id: item.id,
        item_name: item.name.clone(),
        previous_cursor: item.next_due_date,
        cycles,
        advance: ScheduleAdvance {
            next_due_date: cursor,
            last_generated_at: now,
        },
    }))
}

fn validate(item: &RecurringItem) -> Result<()> {
    if !item.amount.is_finite() || round_cents(item.amount) <= 0.0 {
        return Err(CashflowError::Validation(format!(
            "`{}` has a non-positive amount ({})",
            item.name, item.amount
        )));
    }
    if item.frequency.advance(item.next_due_date).is_none() {
        return Err(CashflowError::Validation(format!(
            "`{}` has an unsupported frequency",
            item.name
        )));
    }
    Ok(())
}

fn build_cycle(item: &RecurringItem, due_date: NaiveDate, now: DateTime<Utc>) -> CycleOutcome {
    let cents = round_cents(item.amount);
    let amount = format_amount(cents, &item.currency);
    if item.auto_create_transaction {
        let transaction = auto_transaction(item, cents, due_date);
        let history_entry = HistoryEntry::matched(item.id, due_date, cents, transaction.id, now);
        let notification = NotificationRequest {
            title: "Recurring transaction recorded".into(),
            body: format!("{} for {amount} was posted on {due_date}.", item.name),
            severity: Severity::Info,
            recurring_item_id: Some(item.id),
        };
        CycleOutcome {
            due_date,
            history_entry,
            transaction: Some(transaction),
            notification,
        }
    } else {
        let (title, verb) = if item.item_type.is_inflow() {
            ("Recurring income expected", "expected")
        } else {
            ("Recurring payment due", "due")
        };
        let notification = NotificationRequest {
            title: title.into(),
            body: format!(
                "{} for {amount} was {verb} on {due_date}. Record the transaction once it settles.",
                item.name
            ),
            severity: Severity::Warning,
            recurring_item_id: Some(item.id),
        };
        CycleOutcome {
            due_date,
            history_entry: HistoryEntry::expected(item.id, due_date, cents, now),
            transaction: None,
            notification,
        }
    }
}

fn auto_transaction(item: &RecurringItem, amount: f64, due_date: NaiveDate) -> FinancialTransaction {
    let kind = match item.item_type {
        ItemType::Expense => TransactionType::Expense,
        ItemType::Income | ItemType::Retainer => TransactionType::Income,
    };
    let mut txn = FinancialTransaction::new(kind, amount, due_date, item.context);
    txn.currency = item.currency.clone();
    txn.category_id = item.category_id;
    txn.bank_account_id = item.bank_account_id;
    txn.description = Some(format!("Recurring: {}", item.name));
    txn.recurring_item_id = Some(item.id);
    txn
}
