use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{context::Context, frequency::Frequency};

/// Kind of obligation a recurring item represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Expense,
    Income,
    Retainer,
}

impl ItemType {
    pub fn is_inflow(&self) -> bool {
        matches!(self, ItemType::Income | ItemType::Retainer)
    }
}

/// A scheduled financial obligation (rent, retainer, subscription).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringItem {
    pub id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    pub amount: f64,
    pub currency: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Schedule cursor. Only ever moves forward.
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub auto_create_transaction: bool,
    #[serde(default = "RecurringItem::default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub last_generated_at: Option<DateTime<Utc>>,
    /// Day on which the processor last claimed this item.
    #[serde(default)]
    pub last_processed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecurringItem {
    /// Creates an active item whose first due date is its start date.
    pub fn new(
        name: impl Into<String>,
        item_type: ItemType,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            item_type,
            amount,
            currency: "USD".into(),
            frequency,
            start_date,
            end_date: None,
            next_due_date: start_date,
            context: Context::Business,
            auto_create_transaction: false,
            is_active: true,
            category_id: None,
            bank_account_id: None,
            last_generated_at: None,
            last_processed_date: None,
            notes: None,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create_transaction = auto_create;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Soft delete. History entries keep referencing the item.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Whether `date` falls after the item's end date.
    pub fn has_ended_by(&self, date: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| date > end)
    }

    fn default_active() -> bool {
        true
    }
}

/// New schedule state for an item after its due cycles were handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleAdvance {
    pub next_due_date: NaiveDate,
    pub last_generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_starts_due_on_start_date() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let item = RecurringItem::new("Rent", ItemType::Expense, 1800.0, Frequency::Monthly, start);
        assert_eq!(item.next_due_date, start);
        assert!(item.is_active);
        assert!(!item.auto_create_transaction);
    }

    #[test]
    fn has_ended_by_respects_end_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let item = RecurringItem::new("Retainer", ItemType::Retainer, 900.0, Frequency::Monthly, start)
            .with_end_date(end);
        assert!(!item.has_ended_by(end));
        assert!(item.has_ended_by(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "id": "6f1c9c3e-0d4b-4c55-9a39-5b7f5b8f3f11",
            "name": "Hosting",
            "item_type": "expense",
            "amount": 49.0,
            "currency": "USD",
            "frequency": "monthly",
            "start_date": "2024-01-05",
            "next_due_date": "2024-02-05"
        }"#;
        let item: RecurringItem = serde_json::from_str(json).unwrap();
        assert!(item.is_active);
        assert_eq!(item.context, Context::Business);
        assert_eq!(item.end_date, None);
        assert_eq!(item.last_processed_date, None);
    }
}
