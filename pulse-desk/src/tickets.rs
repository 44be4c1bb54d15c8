//! Support ticket CRUD.

use pulse_core::{
    new_entity_id, now, EntityId, NotificationInput, NotificationKind, Priority, PulseResult,
    SupportTicket, TicketStatus, TicketUpdate,
};
use pulse_events::EventLog;
use pulse_storage::{Collection, StateStore};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Document key the ticket store persists under.
pub const TICKETS_KEY: &str = "pulse.tickets";

/// Discriminator carried by the confirmation event a ticket create posts
/// into the notification log.
pub const EVENT_SUPPORT_TICKET_CREATED: &str = "support_ticket_created";

/// CRUD store for support tickets.
///
/// Status transitions are unconstrained by design: support agents reopen
/// resolved tickets and back out of mistaken status moves, so any status may
/// change to any other. The one thing every mutation does is bump
/// `updated_at`.
pub struct SupportTicketStore {
    tickets: Collection<SupportTicket>,
    log: EventLog,
}

impl SupportTicketStore {
    pub fn new(store: Arc<dyn StateStore>, log: EventLog) -> Self {
        Self {
            tickets: Collection::new(store, TICKETS_KEY),
            log,
        }
    }

    /// Open a new ticket and cross-post a confirmation notification.
    ///
    /// The ticket write is authoritative: a failed confirmation append is
    /// logged but does not roll the ticket back.
    pub fn create(
        &self,
        subject: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> PulseResult<SupportTicket> {
        let created_at = now();
        let ticket = SupportTicket {
            id: new_entity_id(),
            subject: subject.into(),
            description: description.into(),
            status: TicketStatus::Open,
            priority,
            created_at,
            updated_at: created_at,
            attachments: Vec::new(),
        };

        let mut tickets = self.tickets.load()?;
        tickets.push(ticket.clone());
        self.tickets.save(&tickets)?;

        let confirmation = NotificationInput::new(
            "Support ticket received",
            format!("Ticket \"{}\" was opened. We will get back to you.", ticket.subject),
            NotificationKind::Info,
        )
        .action_url(format!("/support/{}", ticket.id))
        .payload(json!({
            "event": EVENT_SUPPORT_TICKET_CREATED,
            "ticket_id": ticket.id,
        }));
        if let Err(err) = self.log.append(confirmation) {
            warn!(ticket_id = %ticket.id, error = %err, "ticket confirmation event not appended");
        }

        Ok(ticket)
    }

    /// Merge a partial update into a ticket. Always bumps `updated_at`.
    /// Returns `None` for an unknown id so callers can branch without
    /// try/catch.
    pub fn update(&self, id: &EntityId, update: TicketUpdate) -> PulseResult<Option<SupportTicket>> {
        let mut tickets = self.tickets.load()?;
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == *id) else {
            return Ok(None);
        };

        if let Some(subject) = update.subject {
            ticket.subject = subject;
        }
        if let Some(description) = update.description {
            ticket.description = description;
        }
        if let Some(status) = update.status {
            ticket.status = status;
        }
        if let Some(priority) = update.priority {
            ticket.priority = priority;
        }
        if let Some(attachments) = update.attachments {
            ticket.attachments = attachments;
        }
        ticket.updated_at = now();

        let updated = ticket.clone();
        self.tickets.save(&tickets)?;
        Ok(Some(updated))
    }

    /// Remove a ticket. Returns whether it existed.
    pub fn delete(&self, id: &EntityId) -> PulseResult<bool> {
        let mut tickets = self.tickets.load()?;
        let before = tickets.len();
        tickets.retain(|t| t.id != *id);
        let removed = tickets.len() != before;
        if removed {
            self.tickets.save(&tickets)?;
        }
        Ok(removed)
    }

    /// All tickets in creation order.
    pub fn list(&self) -> PulseResult<Vec<SupportTicket>> {
        self.tickets.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_test_utils::pulse_env;

    fn ticket_store() -> (SupportTicketStore, EventLog) {
        let env = pulse_env();
        let store = SupportTicketStore::new(env.store.clone(), env.log.clone());
        (store, env.log)
    }

    #[test]
    fn create_opens_the_ticket_and_posts_one_confirmation() {
        let (store, log) = ticket_store();
        let ticket = store.create("Broken export", "CSV export times out", Priority::High).unwrap();

        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(store.list().unwrap(), vec![ticket.clone()]);

        let events = log.list().unwrap();
        assert_eq!(events.len(), 1);
        let payload = events[0].payload.as_ref().unwrap();
        assert_eq!(payload["event"], EVENT_SUPPORT_TICKET_CREATED);
        assert_eq!(payload["ticket_id"], serde_json::json!(ticket.id));
        assert_eq!(events[0].action_url.as_deref(), Some(format!("/support/{}", ticket.id).as_str()));
    }

    #[test]
    fn any_status_may_move_to_any_other() {
        let (store, _) = ticket_store();
        let ticket = store.create("s", "d", Priority::Normal).unwrap();

        for status in [
            TicketStatus::Closed,
            TicketStatus::Open,
            TicketStatus::Resolved,
            TicketStatus::InProgress,
        ] {
            let updated = store
                .update(&ticket.id, TicketUpdate { status: Some(status), ..Default::default() })
                .unwrap()
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[test]
    fn update_bumps_updated_at_and_merges_partials() {
        let (store, _) = ticket_store();
        let ticket = store.create("subject", "description", Priority::Low).unwrap();

        let updated = store
            .update(
                &ticket.id,
                TicketUpdate { priority: Some(Priority::High), ..Default::default() },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.subject, "subject");
        assert_eq!(updated.priority, Priority::High);
        assert!(updated.updated_at >= ticket.updated_at);
    }

    #[test]
    fn unknown_ids_return_none_or_false_without_error() {
        let (store, _) = ticket_store();
        let ghost = pulse_core::new_entity_id();
        assert!(store.update(&ghost, TicketUpdate::default()).unwrap().is_none());
        assert!(!store.delete(&ghost).unwrap());
    }

    #[test]
    fn delete_removes_the_ticket() {
        let (store, _) = ticket_store();
        let ticket = store.create("s", "d", Priority::Normal).unwrap();
        assert!(store.delete(&ticket.id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }
}
