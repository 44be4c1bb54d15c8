//! Chat-style message records.

use crate::{Attachment, EntityId, Priority, Timestamp};
use serde::{Deserialize, Serialize};

/// Message author.
///
/// Serialized as the wire strings `"self"` and `"counterparty"`; any other
/// string round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The portal user's own outbound message.
    SelfSide,
    /// The simulated remote party (partner/admin desk).
    Counterparty,
    Other(String),
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "self" => Sender::SelfSide,
            "counterparty" => Sender::Counterparty,
            _ => Sender::Other(value),
        }
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        match value {
            Sender::SelfSide => "self".to_string(),
            Sender::Counterparty => "counterparty".to_string(),
            Sender::Other(other) => other,
        }
    }
}

impl Serialize for Sender {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        String::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sender {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Sender::from(String::deserialize(deserializer)?))
    }
}

/// Row discriminator within the shared message store.
///
/// Chat entries, inline notifications, and support confirmations live in one
/// persisted collection; `delete_by_type` clears one slice without touching
/// the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Message,
    Notification,
    Support,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: EntityId,
    pub sender: Sender,
    pub timestamp: Timestamp,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub message_type: MessageType,
    pub read: bool,
    pub priority: Priority,
}

/// Partial update for a message. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageUpdate {
    pub content: Option<String>,
    pub read: Option<bool>,
    pub priority: Option<Priority>,
    pub attachments: Option<Vec<Attachment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_round_trips_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Sender::SelfSide).unwrap(),
            "\"self\""
        );
        assert_eq!(
            serde_json::to_string(&Sender::Counterparty).unwrap(),
            "\"counterparty\""
        );
        let other: Sender = serde_json::from_str("\"support_bot\"").unwrap();
        assert_eq!(other, Sender::Other("support_bot".to_string()));
    }
}
