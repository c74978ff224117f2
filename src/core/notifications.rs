//! Notification requests emitted by the recurring processor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_item_id: Option<Uuid>,
}

/// Fire-and-forget receiver for notification requests.
pub trait NotificationSink {
    fn notify(&mut self, request: &NotificationRequest);
}

/// Keeps every delivered request in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub delivered: Vec<NotificationRequest>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, request: &NotificationRequest) {
        self.delivered.push(request.clone());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _request: &NotificationRequest) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder() -> NotificationRequest {
        NotificationRequest {
            title: "Recurring payment due".into(),
            body: "Rent for $1,500.00 was due on 2024-01-01.".into(),
            severity: Severity::Warning,
            recurring_item_id: None,
        }
    }

    #[test]
    fn recording_sink_keeps_requests_in_order() {
        let mut sink = RecordingSink::default();
        sink.notify(&reminder());
        NullSink.notify(&reminder());
        assert_eq!(sink.delivered, vec![reminder()]);
    }

    #[test]
    fn severity_serializes_in_snake_case() {
        let json = serde_json::to_string(&reminder()).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(!json.contains("recurring_item_id"));
    }
}
