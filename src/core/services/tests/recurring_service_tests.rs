use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::{
    clock::FixedClock,
    notifications::{RecordingSink, Severity},
    processor::SkipReason,
    services::{ProcessingSession, RecurringService},
};
use crate::errors::{CashflowError, Result};
use crate::ledger::{
    FinancialTransaction, Frequency, HistoryEntry, HistoryStatus, ItemType, Ledger, RecurringItem,
    ScheduleAdvance,
};
use crate::storage::{HistoryStore, RecurringItemStore, TransactionStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ledger_with(items: Vec<RecurringItem>) -> Ledger {
    let mut ledger = Ledger::new("Recurring");
    for item in items {
        ledger.add_recurring_item(item);
    }
    ledger
}

#[test]
fn notify_item_is_advanced_and_reminded() {
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Monthly, date(2024, 1, 1));
    let id = rent.id;
    let mut ledger = ledger_with(vec![rent]);
    let mut sink = RecordingSink::default();

    let report = RecurringService::process_due(&mut ledger, &FixedClock::on(date(2024, 1, 1)), &mut sink);

    assert_eq!(report.processed_items, 1);
    assert_eq!(report.transactions_created, 0);
    assert!(ledger.transactions.is_empty());
    let item = ledger.recurring_item(id).unwrap();
    assert_eq!(item.next_due_date, date(2024, 2, 1));
    assert_eq!(item.last_processed_date, Some(date(2024, 1, 1)));
    assert!(item.last_generated_at.is_some());
    let history = ledger.history_for(id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, HistoryStatus::Expected);
    assert_eq!(sink.delivered.len(), 1);
    assert_eq!(sink.delivered[0].severity, Severity::Warning);
}

#[test]
fn auto_create_item_posts_transaction_and_links_history() {
    let retainer = RecurringItem::new("Retainer", ItemType::Retainer, 4000.0, Frequency::Monthly, date(2024, 2, 1))
        .with_auto_create(true);
    let id = retainer.id;
    let mut ledger = ledger_with(vec![retainer]);
    let mut sink = RecordingSink::default();

    let report = RecurringService::process_due(&mut ledger, &FixedClock::on(date(2024, 2, 1)), &mut sink);

    assert_eq!(report.transactions_created, 1);
    let txn = &ledger.transactions[0];
    assert_eq!(txn.recurring_item_id, Some(id));
    let history = ledger.history_for(id);
    assert_eq!(history[0].transaction_id, Some(txn.id));
    assert_eq!(history[0].status, HistoryStatus::Matched);
    assert_eq!(sink.delivered[0].severity, Severity::Info);
}

#[test]
fn second_run_on_same_day_does_nothing() {
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Weekly, date(2024, 1, 1));
    let mut ledger = ledger_with(vec![rent]);
    let clock = FixedClock::on(date(2024, 1, 1));
    let mut sink = RecordingSink::default();

    RecurringService::process_due(&mut ledger, &clock, &mut sink);
    let again = RecurringService::process_due(&mut ledger, &clock, &mut sink);

    assert_eq!(again.processed_items, 0);
    assert_eq!(ledger.history.len(), 1);
    assert_eq!(sink.delivered.len(), 1);
}

#[test]
fn posted_amounts_are_rounded_to_cents() {
    let hosting = RecurringItem::new("Hosting", ItemType::Expense, 33.333, Frequency::Monthly, date(2024, 1, 1))
        .with_auto_create(true);
    let mut ledger = ledger_with(vec![hosting]);

    RecurringService::process_due(&mut ledger, &FixedClock::on(date(2024, 1, 1)), &mut RecordingSink::default());

    assert_eq!(ledger.transactions[0].amount, 33.33);
    assert_eq!(ledger.history[0].expected_amount, 33.33);
    assert_eq!(ledger.history[0].actual_amount, Some(33.33));
}

#[test]
fn catch_up_writes_one_entry_per_missed_cycle() {
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Monthly, date(2024, 1, 1))
        .with_auto_create(true);
    let mut ledger = ledger_with(vec![rent]);
    let mut sink = RecordingSink::default();

    let report = RecurringService::process_due(&mut ledger, &FixedClock::on(date(2024, 3, 15)), &mut sink);

    assert_eq!(report.cycles, 3);
    assert_eq!(ledger.history.len(), 3);
    assert_eq!(ledger.transactions.len(), 3);
    assert_eq!(ledger.recurring_items[0].next_due_date, date(2024, 4, 1));
}

#[test]
fn malformed_item_does_not_block_batch() {
    let broken = RecurringItem::new("Broken", ItemType::Expense, -5.0, Frequency::Monthly, date(2024, 1, 1));
    let broken_id = broken.id;
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Monthly, date(2024, 1, 1));
    let mut ledger = ledger_with(vec![broken, rent]);
    let mut sink = RecordingSink::default();

    let report = RecurringService::process_due(&mut ledger, &FixedClock::on(date(2024, 1, 1)), &mut sink);

    assert_eq!(report.failed_items(), 1);
    assert_eq!(report.processed_items, 1);
    assert_eq!(ledger.recurring_item(broken_id).unwrap().next_due_date, date(2024, 1, 1));
}

#[test]
fn session_runs_only_once() {
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Weekly, date(2024, 1, 1));
    let mut ledger = ledger_with(vec![rent]);
    let session = ProcessingSession::new();
    let mut sink = RecordingSink::default();

    assert!(session.run(&mut ledger, &FixedClock::on(date(2024, 1, 1)), &mut sink).is_some());
    assert!(session.has_run());
    assert!(session.run(&mut ledger, &FixedClock::on(date(2024, 1, 8)), &mut sink).is_none());
    assert_eq!(ledger.history.len(), 1);
}

#[test]
fn stale_plan_is_skipped_as_claimed_elsewhere() {
    let rent = RecurringItem::new("Rent", ItemType::Expense, 1500.0, Frequency::Monthly, date(2024, 1, 1));
    let mut ledger = ledger_with(vec![rent]);
    let clock = FixedClock::on(date(2024, 1, 1));
    let plan = RecurringService::plan(&ledger, &clock);

    // Another session commits first.
    let mut sink = RecordingSink::default();
    RecurringService::process_due(&mut ledger, &clock, &mut sink);

    let err = RecurringService::apply_outcome(&mut ledger, &plan.outcomes[0], date(2024, 1, 1))
        .expect_err("stale plan must not commit");
    assert!(err.to_string().contains("already processed") || err.to_string().contains("conflict"));
    assert_eq!(ledger.history.len(), 1);
}

/// Ledger wrapper whose history writes fail for one item.
struct FlakyStore {
    inner: Ledger,
    fail_history_for: Uuid,
}

impl TransactionStore for FlakyStore {
    fn transactions(&self) -> &[FinancialTransaction] {
        self.inner.transactions()
    }

    fn append_transaction(&mut self, transaction: FinancialTransaction) -> Result<Uuid> {
        self.inner.append_transaction(transaction)
    }

    fn retract_transaction(&mut self, id: Uuid) -> Result<()> {
        self.inner.retract_transaction(id)
    }
}

impl HistoryStore for FlakyStore {
    fn history(&self) -> &[HistoryEntry] {
        self.inner.history()
    }

    fn append_history(&mut self, entry: HistoryEntry) -> Result<()> {
        if entry.recurring_item_id == self.fail_history_for {
            return Err(CashflowError::Storage("disk full".into()));
        }
        self.inner.append_history(entry)
    }

    fn retract_history(&mut self, id: Uuid) -> Result<()> {
        self.inner.retract_history(id)
    }
}

impl RecurringItemStore for FlakyStore {
    fn recurring_items(&self) -> &[RecurringItem] {
        self.inner.recurring_items()
    }

    fn claim_cycle(&mut self, item_id: Uuid, expected_cursor: NaiveDate, today: NaiveDate) -> Result<Option<NaiveDate>> {
        self.inner.claim_cycle(item_id, expected_cursor, today)
    }

    fn release_claim(&mut self, item_id: Uuid, previous: Option<NaiveDate>) -> Result<()> {
        self.inner.release_claim(item_id, previous)
    }

    fn advance_schedule(&mut self, item_id: Uuid, advance: &ScheduleAdvance) -> Result<()> {
        self.inner.advance_schedule(item_id, advance)
    }
}

#[test]
fn failed_write_rolls_back_and_leaves_schedule_untouched() {
    let flaky = RecurringItem::new("Payroll", ItemType::Expense, 9000.0, Frequency::Monthly, date(2024, 1, 1))
        .with_auto_create(true);
    let flaky_id = flaky.id;
    let healthy = RecurringItem::new("Hosting", ItemType::Expense, 49.0, Frequency::Monthly, date(2024, 1, 1))
        .with_auto_create(true);
    let healthy_id = healthy.id;
    let mut store = FlakyStore {
        inner: ledger_with(vec![flaky, healthy]),
        fail_history_for: flaky_id,
    };
    let mut sink = RecordingSink::default();

    let report = RecurringService::process_due(&mut store, &FixedClock::on(date(2024, 1, 1)), &mut sink);

    assert_eq!(report.failed_items(), 1);
    assert_eq!(report.processed_items, 1);
    assert!(report.failures[0].reason.contains("disk full"));

    let failed = store.inner.recurring_item(flaky_id).unwrap();
    assert_eq!(failed.next_due_date, date(2024, 1, 1));
    assert_eq!(failed.last_processed_date, None);
    assert!(store
        .inner
        .transactions
        .iter()
        .all(|txn| txn.recurring_item_id == Some(healthy_id)));
    assert_eq!(store.inner.transactions.len(), 1);
    assert_eq!(sink.delivered.len(), 1);
    assert_eq!(sink.delivered[0].recurring_item_id, Some(healthy_id));

    // Once storage recovers the item is picked up again.
    store.fail_history_for = Uuid::nil();
    let retry = RecurringService::process_due(&mut store, &FixedClock::on(date(2024, 1, 2)), &mut sink);
    assert_eq!(retry.processed_items, 1);
    assert_eq!(store.inner.recurring_item(flaky_id).unwrap().next_due_date, date(2024, 2, 1));
}

#[test]
fn ended_items_are_reported_as_skipped() {
    let mut ended = RecurringItem::new("Old lease", ItemType::Expense, 100.0, Frequency::Monthly, date(2023, 1, 1))
        .with_end_date(date(2023, 6, 30));
    ended.next_due_date = date(2023, 7, 1);
    let mut ledger = ledger_with(vec![ended]);
    let report = RecurringService::process_due(
        &mut ledger,
        &FixedClock::on(date(2024, 1, 1)),
        &mut RecordingSink::default(),
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::Ended);
    assert!(ledger.history.is_empty());
}
