use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::{
    core::{
        clock::Clock,
        notifications::NotificationSink,
        processor::{plan_due_cycles, ItemFailure, ItemOutcome, ProcessingPlan, SkipReason, SkippedItem},
    },
    errors::CashflowError,
    storage::{HistoryStore, RecurringItemStore, TransactionStore},
};

/// Counts and details of one processing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingReport {
    pub today: Option<NaiveDate>,
    pub processed_items: usize,
    pub cycles: usize,
    pub transactions_created: usize,
    pub history_entries: usize,
    pub notifications_delivered: usize,
    pub failures: Vec<ItemFailure>,
    pub skipped: Vec<SkippedItem>,
}

impl ProcessingReport {
    fn new(today: NaiveDate) -> Self {
        Self {
            today: Some(today),
            ..Self::default()
        }
    }

    fn record_committed(&mut self, outcome: &ItemOutcome) {
        self.processed_items += 1;
        self.cycles += outcome.cycles.len();
        self.transactions_created += outcome.transactions().count();
        self.history_entries += outcome.cycles.len();
    }

    pub fn failed_items(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RecurringService;

impl RecurringService {
    /// Plans the run without touching the store.
    pub fn plan<S>(store: &S, clock: &dyn Clock) -> ProcessingPlan
    where
        S: RecurringItemStore + ?Sized,
    {
        plan_due_cycles(store.recurring_items(), clock.today(), clock.now())
    }

    /// Processes every due item, isolating failures per item.
    ///
    /// Notifications go to `sink` only for items whose writes were committed.
    pub fn process_due<S>(
        store: &mut S,
        clock: &dyn Clock,
        sink: &mut dyn NotificationSink,
    ) -> ProcessingReport
    where
        S: RecurringItemStore + TransactionStore + HistoryStore + ?Sized,
    {
        let today = clock.today();
        let plan = Self::plan(&*store, clock);
        let mut report = ProcessingReport::new(today);
        report.skipped = plan.skipped;

        for failure in plan.failures {
            warn!(
                item = %failure.item_id,
                name = %failure.item_name,
                reason = %failure.reason,
                "recurring item could not be planned"
            );
            report.failures.push(failure);
        }

        for outcome in &plan.outcomes {
            match Self::apply_outcome(store, outcome, today) {
                Ok(()) => {
                    debug!(
                        item = %outcome.item_id,
                        cycles = outcome.cycles.len(),
                        next_due = %outcome.advance.next_due_date,
                        "recurring item processed"
                    );
                    report.record_committed(outcome);
                    for notification in outcome.notifications() {
                        sink.notify(notification);
                        report.notifications_delivered += 1;
                    }
                }
                Err(ServiceError::Core(
                    CashflowError::AlreadyProcessed(_) | CashflowError::ScheduleConflict { .. },
                )) => {
                    debug!(item = %outcome.item_id, "recurring item claimed by another session");
                    report.skipped.push(SkippedItem {
                        item_id: outcome.item_id,
                        item_name: outcome.item_name.clone(),
                        reason: SkipReason::ClaimedElsewhere,
                    });
                }
                Err(err) => {
                    warn!(
                        item = %outcome.item_id,
                        name = %outcome.item_name,
                        error = %err,
                        "recurring item failed; schedule left unchanged"
                    );
                    report.failures.push(ItemFailure {
                        item_id: outcome.item_id,
                        item_name: outcome.item_name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            processed = report.processed_items,
            cycles = report.cycles,
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "recurring processing finished"
        );
        report
    }

    /// Commits one item: claim, transactions, history entries, schedule advance.
    ///
    /// Any failure after the claim retracts what was written and releases the
    /// claim, so the item is retried on the next run.
    pub fn apply_outcome<S>(store: &mut S, outcome: &ItemOutcome, today: NaiveDate) -> ServiceResult<()>
    where
        S: RecurringItemStore + TransactionStore + HistoryStore + ?Sized,
    {
        if outcome.cycles.is_empty() {
            return Err(ServiceError::Invalid(format!(
                "no due cycles planned for `{}`",
                outcome.item_name
            )));
        }

        let previous = store.claim_cycle(outcome.item_id, outcome.previous_cursor, today)?;

        let mut posted = Vec::new();
        let mut recorded = Vec::new();
        let result = Self::write_cycles(store, outcome, &mut posted, &mut recorded);
        if let Err(err) = result {
            Self::roll_back(store, outcome.item_id, previous, &posted, &recorded);
            return Err(err.into());
        }
        Ok(())
    }

    fn write_cycles<S>(
        store: &mut S,
        outcome: &ItemOutcome,
        posted: &mut Vec<Uuid>,
        recorded: &mut Vec<Uuid>,
    ) -> Result<(), CashflowError>
    where
        S: RecurringItemStore + TransactionStore + HistoryStore + ?Sized,
    {
        for cycle in &outcome.cycles {
            if let Some(transaction) = &cycle.transaction {
                posted.push(store.append_transaction(transaction.clone())?);
            }
            store.append_history(cycle.history_entry.clone())?;
            recorded.push(cycle.history_entry.id);
        }
        store.advance_schedule(outcome.item_id, &outcome.advance)
    }

    fn roll_back<S>(
        store: &mut S,
        item_id: Uuid,
        previous: Option<NaiveDate>,
        posted: &[Uuid],
        recorded: &[Uuid],
    ) where
        S: RecurringItemStore + TransactionStore + HistoryStore + ?Sized,
    {
        for entry_id in recorded.iter().rev() {
            if let Err(err) = store.retract_history(*entry_id) {
                warn!(item = %item_id, entry = %entry_id, error = %err, "history rollback failed");
            }
        }
        for txn_id in posted.iter().rev() {
            if let Err(err) = store.retract_transaction(*txn_id) {
                warn!(item = %item_id, transaction = %txn_id, error = %err, "transaction rollback failed");
            }
        }
        if let Err(err) = store.release_claim(item_id, previous) {
            warn!(item = %item_id, error = %err, "claim release failed");
        }
    }
}

/// Runs the processor at most once for the lifetime of the session.
#[derive(Debug, Default)]
pub struct ProcessingSession {
    started: AtomicBool,
}

impl ProcessingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when this session already ran.
    pub fn run<S>(
        &self,
        store: &mut S,
        clock: &dyn Clock,
        sink: &mut dyn NotificationSink,
    ) -> Option<ProcessingReport>
    where
        S: RecurringItemStore + TransactionStore + HistoryStore + ?Sized,
    {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("recurring processing already ran in this session");
            return None;
        }
        Some(RecurringService::process_due(store, clock, sink))
    }

    pub fn has_run(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}
