//! Decides whether a recurring item is in force during a calendar month.

use crate::{
    errors::Result,
    ledger::{MonthKey, RecurringItem},
};

/// True when the item's `[start_date, end_date]` range overlaps `month`.
///
/// Only dates are considered; the `is_active` soft-delete flag is the caller's concern.
pub fn is_active_for_month(item: &RecurringItem, month: MonthKey) -> bool {
    let month_start = month.first_day();
    let month_end = month.last_day();
    item.start_date <= month_end && item.end_date.map_or(true, |end| end >= month_start)
}

/// Same as [`is_active_for_month`] for a raw `YYYY-MM` token.
pub fn is_active_for_month_key(item: &RecurringItem, month_key: &str) -> Result<bool> {
    let month: MonthKey = month_key.parse()?;
    Ok(is_active_for_month(item, month))
}

/// Items that are not soft-deleted and in force during `month`.
pub fn active_items_for_month(
    items: &[RecurringItem],
    month: MonthKey,
) -> impl Iterator<Item = &RecurringItem> {
    items
        .iter()
        .filter(move |item| item.is_active && is_active_for_month(item, month))
}
