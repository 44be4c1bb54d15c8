//! The partner message channel with simulated counterparty replies.

use pulse_core::{
    new_entity_id, now, Attachment, EntityId, Message, MessageType, MessageUpdate, Priority,
    PulseResult, Sender,
};
use pulse_storage::{Collection, StateStore};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Document key the message store persists under.
pub const MESSAGES_KEY: &str = "pulse.messages";

const REPLY_CONTENT: &str =
    "Thanks for your message. A partner manager will get back to you shortly.";

/// Auto-reply scheduling configuration.
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    pub enabled: bool,
    /// Lower bound of the randomized reply delay.
    pub min_delay: Duration,
    /// Upper bound (inclusive) of the randomized reply delay.
    pub max_delay: Duration,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(6),
        }
    }
}

/// Handle to a scheduled counterparty reply.
pub struct ReplyHandle {
    task: JoinHandle<()>,
}

impl ReplyHandle {
    /// Abort the pending reply. A reply that already fired stays appended.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Wait until the reply task finishes (fires or drops itself).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Result of [`MessageChannel::send`].
pub struct SendReceipt {
    /// The outbound message, already persisted.
    pub message: Message,
    /// Handle to the scheduled acknowledgment, when one was scheduled.
    pub reply: Option<ReplyHandle>,
}

/// Append-only store of chat messages, inline notifications, and support
/// confirmations, sharing one persisted collection.
///
/// Each `send` schedules exactly one independent reply timer; concurrent
/// sends interleave freely. The deferred reply re-reads the live list at
/// fire time, so it tolerates interleaved mutations - and a generation
/// counter, bumped by the conversation-clearing operations, makes it drop
/// itself instead of reviving a cleared conversation.
pub struct MessageChannel {
    messages: Collection<Message>,
    reply: ReplyConfig,
    generation: Arc<AtomicU64>,
}

impl MessageChannel {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_config(store, ReplyConfig::default())
    }

    pub fn with_config(store: Arc<dyn StateStore>, reply: ReplyConfig) -> Self {
        Self {
            messages: Collection::new(store, MESSAGES_KEY),
            reply,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Append an outbound message and schedule the counterparty
    /// acknowledgment.
    ///
    /// The outbound append is synchronous; the acknowledgment fires after a
    /// uniform random delay in `[min_delay, max_delay]` and is fire-and-forget
    /// (this returns before it lands). No reply is scheduled when replies are
    /// disabled or no async runtime is running; the returned handle can
    /// cancel one that was.
    pub fn send(
        &self,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> PulseResult<SendReceipt> {
        let message = Message {
            id: new_entity_id(),
            sender: Sender::SelfSide,
            timestamp: now(),
            content: content.into(),
            attachments,
            message_type: MessageType::Message,
            read: true,
            priority: Priority::Normal,
        };

        let mut messages = self.messages.load()?;
        messages.push(message.clone());
        self.messages.save(&messages)?;

        Ok(SendReceipt {
            message,
            reply: self.schedule_reply(),
        })
    }

    /// Append a non-chat entry (inline notification or support
    /// confirmation) from the counterparty side. Never schedules a reply.
    pub fn post(
        &self,
        message_type: MessageType,
        content: impl Into<String>,
        priority: Priority,
    ) -> PulseResult<Message> {
        let message = Message {
            id: new_entity_id(),
            sender: Sender::Counterparty,
            timestamp: now(),
            content: content.into(),
            attachments: Vec::new(),
            message_type,
            read: false,
            priority,
        };

        let mut messages = self.messages.load()?;
        messages.push(message.clone());
        self.messages.save(&messages)?;
        Ok(message)
    }

    /// All messages in insertion order.
    pub fn list(&self) -> PulseResult<Vec<Message>> {
        self.messages.load()
    }

    /// Flip one message's `read` flag. Unknown ids are a no-op.
    pub fn mark_read(&self, id: &EntityId) -> PulseResult<bool> {
        let mut messages = self.messages.load()?;
        let Some(message) = messages.iter_mut().find(|m| m.id == *id) else {
            return Ok(false);
        };
        if !message.read {
            message.read = true;
            self.messages.save(&messages)?;
        }
        Ok(true)
    }

    /// Mark every message read. Returns how many were newly marked.
    pub fn mark_all_read(&self) -> PulseResult<usize> {
        let mut messages = self.messages.load()?;
        let mut marked = 0;
        for message in messages.iter_mut().filter(|m| !m.read) {
            message.read = true;
            marked += 1;
        }
        if marked > 0 {
            self.messages.save(&messages)?;
        }
        Ok(marked)
    }

    /// Merge a partial update into one message.
    pub fn update(&self, id: &EntityId, update: MessageUpdate) -> PulseResult<Option<Message>> {
        let mut messages = self.messages.load()?;
        let Some(message) = messages.iter_mut().find(|m| m.id == *id) else {
            return Ok(None);
        };

        if let Some(content) = update.content {
            message.content = content;
        }
        if let Some(read) = update.read {
            message.read = read;
        }
        if let Some(priority) = update.priority {
            message.priority = priority;
        }
        if let Some(attachments) = update.attachments {
            message.attachments = attachments;
        }

        let updated = message.clone();
        self.messages.save(&messages)?;
        Ok(Some(updated))
    }

    /// Remove one message, independent of its type.
    pub fn delete(&self, id: &EntityId) -> PulseResult<bool> {
        let mut messages = self.messages.load()?;
        let before = messages.len();
        messages.retain(|m| m.id != *id);
        let removed = messages.len() != before;
        if removed {
            self.messages.save(&messages)?;
        }
        Ok(removed)
    }

    /// Bulk-remove every message of one type, leaving the other types in the
    /// shared store untouched. Clearing the chat slice invalidates pending
    /// replies.
    pub fn delete_by_type(&self, message_type: MessageType) -> PulseResult<usize> {
        let mut messages = self.messages.load()?;
        let before = messages.len();
        messages.retain(|m| m.message_type != message_type);
        let removed = before - messages.len();
        if removed > 0 {
            self.messages.save(&messages)?;
        }
        if message_type == MessageType::Message {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }

    /// Empty the store entirely. Invalidates pending replies.
    pub fn clear(&self) -> PulseResult<()> {
        self.messages.save(&[])?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn schedule_reply(&self) -> Option<ReplyHandle> {
        if !self.reply.enabled {
            return None;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                debug!("no async runtime, auto-reply skipped");
                return None;
            }
        };

        let min = self.reply.min_delay.as_millis() as u64;
        let max = self.reply.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(rand::thread_rng().gen_range(min..=max.max(min)));

        let generation = Arc::clone(&self.generation);
        let scheduled_at = generation.load(Ordering::SeqCst);
        let records = self.messages.clone();

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The conversation was cleared while we slept; drop the reply.
            if generation.load(Ordering::SeqCst) != scheduled_at {
                return;
            }
            let reply = Message {
                id: new_entity_id(),
                sender: Sender::Counterparty,
                timestamp: now(),
                content: REPLY_CONTENT.to_string(),
                attachments: Vec::new(),
                message_type: MessageType::Message,
                read: false,
                priority: Priority::Normal,
            };
            // Re-read the live list at fire time rather than using a
            // snapshot captured at send time.
            let append = records.load().and_then(|mut messages| {
                messages.push(reply);
                records.save(&messages)
            });
            if let Err(err) = append {
                warn!(error = %err, "auto-reply not appended");
            }
        });
        Some(ReplyHandle { task })
    }
}

impl Clone for MessageChannel {
    fn clone(&self) -> Self {
        Self {
            messages: self.messages.clone(),
            reply: self.reply.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}
