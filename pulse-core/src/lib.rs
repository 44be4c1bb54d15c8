//! Pulse Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types plus the small normalization helpers
//! the store boundaries apply - no business logic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

mod error;
mod kpi;
mod message;
mod notification;
mod revenue;
mod ticket;

pub use error::{PulseResult, StoreError};
pub use kpi::KpiRecord;
pub use message::{Message, MessageType, MessageUpdate, Sender};
pub use notification::{Notification, NotificationInput, NotificationKind};
pub use revenue::{normalize_amount, RevenueEntry, LEGACY_TOTAL_ID};
pub use ticket::{Attachment, Priority, SupportTicket, TicketStatus, TicketUpdate};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Current wall-clock timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}
