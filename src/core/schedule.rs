//! Upcoming due dates of recurring items, classified for display.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::{Context, ItemType, RecurringItem};

const PENDING_WINDOW_DAYS: i64 = 7;
const MAX_LISTED_OCCURRENCES: usize = 1024;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledStatus {
    Overdue,
    Pending,
    Future,
}

impl ScheduledStatus {
    pub fn classify(scheduled: NaiveDate, reference: NaiveDate) -> ScheduledStatus {
        if scheduled < reference {
            return ScheduledStatus::Overdue;
        }
        let pending_cutoff = reference + Duration::days(PENDING_WINDOW_DAYS);
        if scheduled <= pending_cutoff {
            ScheduledStatus::Pending
        } else {
            ScheduledStatus::Future
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpcomingObligation {
    pub item_id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    pub amount: f64,
    pub currency: String,
    pub context: Context,
    pub due_date: NaiveDate,
    pub status: ScheduledStatus,
}

/// Lists every due date from each item's cursor through `today + horizon_days`.
///
/// Unprocessed past cycles show up as [`ScheduledStatus::Overdue`]. The result is
/// ordered by due date, then name.
pub fn upcoming_obligations(
    items: &[RecurringItem],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<UpcomingObligation> {
    let horizon_end = today
        .checked_add_signed(Duration::days(i64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);
    let mut upcoming = Vec::new();

    for item in items.iter().filter(|item| item.is_active) {
        let mut cursor = item.next_due_date;
        let mut listed = 0;
        while cursor <= horizon_end && !item.has_ended_by(cursor) && listed < MAX_LISTED_OCCURRENCES {
            upcoming.push(UpcomingObligation {
                item_id: item.id,
                name: item.name.clone(),
                item_type: item.item_type,
                amount: item.amount,
                currency: item.currency.clone(),
                context: item.context,
                due_date: cursor,
                status: ScheduledStatus::classify(cursor, today),
            });
            listed += 1;
            match item.frequency.advance(cursor) {
                Some(next) if next > cursor => cursor = next,
                _ => break,
            }
        }
    }

    upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.name.cmp(&b.name)));
    upcoming
}
