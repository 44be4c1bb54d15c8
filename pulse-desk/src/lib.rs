//! Pulse Desk - Support Tickets and Partner Chat
//!
//! Two peer feature stores:
//!
//! - [`SupportTicketStore`]: ticket CRUD with a deliberately permissive
//!   status model. Creating a ticket cross-posts one confirmation event into
//!   the shared notification log - the only edge between this crate and the
//!   rest of the system, and it points in one direction only
//!   (features -> EventLog, never back).
//! - [`MessageChannel`]: the chat-style message store. Outbound sends are
//!   synchronous; a simulated counterparty acknowledgment is scheduled on a
//!   randomized timer, guarded by a store generation counter so a reply can
//!   never revive a conversation that was cleared while it was in flight.

mod channel;
mod tickets;

pub use channel::{MessageChannel, ReplyConfig, ReplyHandle, SendReceipt, MESSAGES_KEY};
pub use tickets::{SupportTicketStore, EVENT_SUPPORT_TICKET_CREATED, TICKETS_KEY};

// Re-export the record types for convenience
pub use pulse_core::{
    Attachment, Message, MessageType, MessageUpdate, Priority, Sender, SupportTicket,
    TicketStatus, TicketUpdate,
};
