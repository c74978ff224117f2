use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{CashflowError, Result},
    ledger::{ledger::CURRENT_SCHEMA_VERSION, Ledger},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

const LEDGER_EXTENSION: &str = "json";

/// Stores named ledger snapshots as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        Ok(Self {
            root: app_root,
            ledgers_dir,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    pub fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf> {
        let path = self.ledger_path(name);
        save_ledger_to_path(ledger, &path)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(CashflowError::NotFound(format!("ledger `{name}`")));
        }
        load_ledger_from_path(&path)
    }

    /// Names of stored ledgers, sorted alphabetically.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Writes the ledger to `path` atomically by staging to a temporary file.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)?;
    Ok(())
}

/// Loads a ledger snapshot, refusing schema versions newer than this build.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CashflowError::Storage(format!(
            "ledger schema v{} is newer than supported v{}",
            ledger.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    for warning in ledger_warnings(&ledger) {
        tracing::warn!(path = %path.display(), "{warning}");
    }
    Ok(ledger)
}

/// Detects dangling references within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let account_ids: HashSet<_> = ledger.accounts.iter().map(|a| a.id).collect();
    let item_ids: HashSet<_> = ledger.recurring_items.iter().map(|i| i.id).collect();
    let txn_ids: HashSet<_> = ledger.transactions.iter().map(|t| t.id).collect();
    let mut warnings = Vec::new();

    for item in &ledger.recurring_items {
        if let Some(account) = item.bank_account_id {
            if !account_ids.contains(&account) {
                warnings.push(format!(
                    "recurring item {} references unknown bank account {}",
                    item.id, account
                ));
            }
        }
        if item.next_due_date < item.start_date {
            warnings.push(format!(
                "recurring item {} is due before its start date",
                item.id
            ));
        }
    }
    for entry in &ledger.history {
        if !item_ids.contains(&entry.recurring_item_id) {
            warnings.push(format!(
                "history entry {} references missing recurring item {}",
                entry.id, entry.recurring_item_id
            ));
        }
        if let Some(txn) = entry.transaction_id {
            if !txn_ids.contains(&txn) {
                warnings.push(format!(
                    "history entry {} references missing transaction {}",
                    entry.id, txn
                ));
            }
        }
    }
    warnings
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Context, HistoryEntry};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = Ledger::new("Studio");
        ledger.add_account(crate::ledger::BankAccount::new("Ops", 2500.0, Context::Business));
        storage.save(&ledger, "Studio Books").expect("save ledger");
        let loaded = storage.load("Studio Books").expect("load ledger");
        assert_eq!(loaded.name, "Studio");
        assert_eq!(loaded.accounts.len(), 1);
        assert_eq!(storage.list().unwrap(), vec!["studio_books".to_string()]);
    }

    #[test]
    fn load_missing_ledger_is_not_found() {
        let (storage, _guard) = storage_with_temp_dir();
        let err = storage.load("absent").expect_err("missing ledger");
        assert!(matches!(err, CashflowError::NotFound(_)));
    }

    #[test]
    fn newer_schema_is_rejected() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = Ledger::new("Future");
        ledger.schema_version = CURRENT_SCHEMA_VERSION + 1;
        let path = storage.save(&ledger, "future").unwrap();
        let err = load_ledger_from_path(&path).expect_err("schema too new");
        assert!(matches!(err, CashflowError::Storage(_)));
    }

    #[test]
    fn warnings_flag_orphaned_history() {
        let mut ledger = Ledger::new("Orphans");
        ledger.history.push(HistoryEntry::expected(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            10.0,
            Utc::now(),
        ));
        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing recurring item"));
    }
}
