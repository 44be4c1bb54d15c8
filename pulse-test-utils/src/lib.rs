//! Pulse Test Utilities
//!
//! Centralized test infrastructure for the Pulse workspace:
//! - a ready-made in-memory environment (shared store, event log, ledger)
//! - fixture constructors for common records
//! - proptest strategies for payload discriminators and revenue entries

use proptest::prelude::*;
use pulse_core::{NotificationInput, NotificationKind, RevenueEntry};
use pulse_events::EventLog;
use pulse_ledger::RevenueLedger;
use pulse_storage::MemoryStore;
use std::sync::Arc;

/// In-memory environment: one shared backend, one log, one ledger.
pub struct PulseEnv {
    pub store: Arc<MemoryStore>,
    pub log: EventLog,
    pub ledger: RevenueLedger,
}

/// Build a fresh environment over a single [`MemoryStore`], the way the
/// host wires all stores over one persisted storage.
pub fn pulse_env() -> PulseEnv {
    let store = Arc::new(MemoryStore::new());
    let log = EventLog::new(store.clone());
    let ledger = RevenueLedger::new(store.clone());
    PulseEnv { store, log, ledger }
}

/// Notification input carrying a `payload.event` discriminator, the shape
/// feature modules append for the stats fold.
pub fn stat_event(tag: &str) -> NotificationInput {
    NotificationInput::new(tag, format!("event: {tag}"), NotificationKind::Job)
        .payload(serde_json::json!({ "event": tag }))
}

/// Strategy over discriminator tags: the known ones plus unrelated noise.
pub fn arb_stat_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("offer_accepted"),
        Just("project_removed"),
        Just("deliverable_submitted"),
        Just("unrelated_tag"),
        Just("payment_recorded"),
    ]
    .prop_map(str::to_string)
}

/// Strategy over revenue entries, including amounts the ledger must clamp.
pub fn arb_revenue_entry() -> impl Strategy<Value = RevenueEntry> {
    (
        "[a-z]{1,8}",
        "[A-Za-z ]{1,16}",
        prop_oneof![
            -500.0..500.0f64,
            Just(f64::NAN),
            Just(f64::INFINITY),
        ],
    )
        .prop_map(|(id, name, amount)| RevenueEntry::new(id, name, amount))
}
