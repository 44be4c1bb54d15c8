//! Pulse Events - Append-Only Notification Log
//!
//! The [`EventLog`] is the system of record that decouples feature modules
//! from the dashboards reacting to them: features append typed notification
//! events with a free-form payload, dashboards read the log back (directly
//! or through the stats aggregator) and never talk to features.
//!
//! ```text
//! programmes ─┐
//! payments  ──┼─ append ──▶ EventLog ──▶ list / subscribe ──▶ dashboards
//! tickets   ──┘
//! ```
//!
//! The log is strictly insertion-ordered and never reordered. Events are
//! immutable once appended except for their `read` flag.

mod log;

pub use log::{EventLog, EventLogConfig, NOTIFICATIONS_KEY};

// Re-export the record types for convenience
pub use pulse_core::{Notification, NotificationInput, NotificationKind};
pub use pulse_storage::Subscription;
