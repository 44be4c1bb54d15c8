//! The append-only notification log.

use pulse_core::{new_entity_id, now, EntityId, Notification, NotificationInput, PulseResult};
use pulse_storage::{Collection, StateStore, SubscriberSet, Subscription};
use std::sync::Arc;

/// Document key the notification log persists under.
pub const NOTIFICATIONS_KEY: &str = "pulse.notifications";

/// Event log configuration.
#[derive(Debug, Clone, Default)]
pub struct EventLogConfig {
    /// Retention cap: when set, appending past this many entries drops the
    /// oldest ones before persisting. `None` keeps the log unbounded.
    pub max_entries: Option<usize>,
}

/// Append-only log of notification events.
///
/// `Clone` shares the same persisted document and the same subscriber set,
/// so feature modules and dashboards can each hold a handle to one logical
/// log.
///
/// # Example
///
/// ```rust,ignore
/// let log = EventLog::new(Arc::new(MemoryStore::new()));
/// log.append(
///     NotificationInput::new("Offer accepted", "Partner accepted your offer", NotificationKind::Job)
///         .payload(serde_json::json!({"event": "offer_accepted"})),
/// )?;
/// ```
pub struct EventLog {
    records: Collection<Notification>,
    subscribers: Arc<SubscriberSet<Notification>>,
    config: EventLogConfig,
}

impl EventLog {
    /// Create a log over the given backend with default (unbounded) config.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_config(store, EventLogConfig::default())
    }

    pub fn with_config(store: Arc<dyn StateStore>, config: EventLogConfig) -> Self {
        Self {
            records: Collection::new(store, NOTIFICATIONS_KEY),
            subscribers: Arc::new(SubscriberSet::new()),
            config,
        }
    }

    /// Append an event: assigns `id` and `created_at`, persists the list,
    /// then delivers the stored record to subscribers.
    ///
    /// Subscriber delivery happens after the write, so a callback that reads
    /// the log back observes the event it was notified about.
    pub fn append(&self, input: NotificationInput) -> PulseResult<Notification> {
        let event = Notification {
            id: new_entity_id(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            created_at: now(),
            read: input.read,
            action_url: input.action_url,
            payload: input.payload,
        };

        let mut events = self.records.load()?;
        events.push(event.clone());
        if let Some(cap) = self.config.max_entries {
            if events.len() > cap {
                let excess = events.len() - cap;
                events.drain(..excess);
            }
        }
        self.records.save(&events)?;

        self.subscribers.emit(&event)?;
        Ok(event)
    }

    /// All events in insertion order. Corrupt storage reads as empty.
    pub fn list(&self) -> PulseResult<Vec<Notification>> {
        self.records.load()
    }

    /// Flip one event's `read` flag. Returns whether the id was found;
    /// unknown ids and already-read events are no-ops, not errors.
    pub fn mark_read(&self, id: &EntityId) -> PulseResult<bool> {
        let mut events = self.records.load()?;
        let Some(event) = events.iter_mut().find(|e| e.id == *id) else {
            return Ok(false);
        };
        if !event.read {
            event.read = true;
            self.records.save(&events)?;
        }
        Ok(true)
    }

    /// Mark every event read. Returns how many were newly marked.
    pub fn mark_all_read(&self) -> PulseResult<usize> {
        let mut events = self.records.load()?;
        let mut marked = 0;
        for event in events.iter_mut().filter(|e| !e.read) {
            event.read = true;
            marked += 1;
        }
        if marked > 0 {
            self.records.save(&events)?;
        }
        Ok(marked)
    }

    /// Empty the log.
    pub fn clear(&self) -> PulseResult<()> {
        self.records.save(&[])
    }

    /// Register a callback invoked synchronously for every appended event.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<Notification>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            subscribers: Arc::clone(&self.subscribers),
            config: self.config.clone(),
        }
    }
}
