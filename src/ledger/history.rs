use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    /// Cycle fell due but no transaction has been recorded against it yet.
    Expected,
    /// Cycle is backed by a posted transaction.
    Matched,
}

/// Append-only record of one processed due-cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recurring_item_id: Uuid,
    pub expected_date: NaiveDate,
    pub expected_amount: f64,
    pub actual_amount: Option<f64>,
    pub transaction_id: Option<Uuid>,
    pub status: HistoryStatus,
    pub variance_amount_pct: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry for a cycle that still needs a manually recorded transaction.
    pub fn expected(
        recurring_item_id: Uuid,
        expected_date: NaiveDate,
        expected_amount: f64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recurring_item_id,
            expected_date,
            expected_amount,
            actual_amount: None,
            transaction_id: None,
            status: HistoryStatus::Expected,
            variance_amount_pct: None,
            recorded_at,
        }
    }

    /// Entry for a cycle settled by an auto-posted transaction of the expected amount.
    pub fn matched(
        recurring_item_id: Uuid,
        expected_date: NaiveDate,
        expected_amount: f64,
        transaction_id: Uuid,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recurring_item_id,
            expected_date,
            expected_amount,
            actual_amount: Some(expected_amount),
            transaction_id: Some(transaction_id),
            status: HistoryStatus::Matched,
            variance_amount_pct: Some(0.0),
            recorded_at,
        }
    }
}
