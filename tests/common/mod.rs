#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use cashflow_core::{
    config::ConfigManager,
    ledger::{
        BankAccount, Budget, BudgetPeriod, Context, FinancialTransaction, Frequency, ItemType,
        Ledger, RecurringItem, TransactionType,
    },
    storage::JsonStorage,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and config managers backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    let config =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (storage, config, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub const SOFTWARE_CATEGORY: Uuid = Uuid::from_u128(0x5f7e_1c2a_0000_4000_8000_0000_0000_0001);

/// A small design studio: two accounts, a retainer, rent, a yearly subscription and a budget.
pub fn studio_ledger() -> Ledger {
    let mut ledger = Ledger::new("Studio");
    let operating = ledger.add_account(BankAccount::new("Operating", 12_000.0, Context::Business));
    ledger.add_account(BankAccount::new("Household", 2_500.0, Context::Personal));

    let mut retainer = RecurringItem::new(
        "Acme retainer",
        ItemType::Retainer,
        4_000.0,
        Frequency::Monthly,
        date(2024, 1, 1),
    )
    .with_auto_create(true);
    retainer.bank_account_id = Some(operating);
    ledger.add_recurring_item(retainer);

    ledger.add_recurring_item(RecurringItem::new(
        "Studio rent",
        ItemType::Expense,
        2_200.0,
        Frequency::Monthly,
        date(2024, 1, 5),
    ));

    let mut design_suite = RecurringItem::new(
        "Design suite",
        ItemType::Expense,
        600.0,
        Frequency::Yearly,
        date(2024, 1, 15),
    )
    .with_auto_create(true);
    design_suite.category_id = Some(SOFTWARE_CATEGORY);
    ledger.add_recurring_item(design_suite);

    ledger.add_transaction(FinancialTransaction::new(
        TransactionType::Income,
        3_000.0,
        date(2023, 12, 10),
        Context::Business,
    ));
    ledger.add_budget(Budget::new(
        SOFTWARE_CATEGORY,
        BudgetPeriod::Monthly,
        date(2024, 1, 1),
        500.0,
        Context::Business,
    ));
    ledger
}
