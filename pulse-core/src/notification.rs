//! Notification records - the entries of the append-only event log.

use crate::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Coarse notification category used for UI grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Work-related notification (programme, session, payment, offer).
    Job,
    /// Informational notification.
    Info,
}

/// A stored notification event.
///
/// Events are immutable once appended, except for the `read` flag which the
/// mark-read operations flip in place. The `payload` is free-form; the stats
/// aggregator only trusts a string `payload.event` discriminator plus the
/// named fields documented per discriminator value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Timestamp,
    pub read: bool,
    /// Optional deep link, opaque to the core.
    pub action_url: Option<String>,
    pub payload: Option<serde_json::Value>,
}

/// Input for appending a notification; `id` and `created_at` are assigned by
/// the log at append time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationInput {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub action_url: Option<String>,
    pub payload: Option<serde_json::Value>,
}

impl NotificationInput {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            action_url: None,
            payload: None,
        }
    }

    /// Set the deep link.
    pub fn action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Attach a free-form payload (aggregation reads `payload.event`).
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Mark the event as already read at append time.
    pub fn already_read(mut self) -> Self {
        self.read = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Job).unwrap(),
            "\"job\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationKind::Info).unwrap(),
            "\"info\""
        );
    }

    #[test]
    fn input_builder_defaults_unread() {
        let input = NotificationInput::new("Payment", "Payment recorded", NotificationKind::Job)
            .payload(serde_json::json!({"event": "payment_recorded"}));
        assert!(!input.read);
        assert!(input.action_url.is_none());
        assert_eq!(input.payload.unwrap()["event"], "payment_recorded");
    }
}
