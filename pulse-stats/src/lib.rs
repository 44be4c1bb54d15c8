//! Pulse Stats - KPI Aggregation
//!
//! A pure fold of the notification event log into a [`KpiRecord`]. Counts
//! are derived from the append-only log rather than mutable counters: the
//! same event sequence always yields the same record, no event can be
//! double counted, and there is nothing to invalidate - every call is a
//! full rescan.
//!
//! Revenue is the one figure *not* folded from events. The ledger is
//! authoritative for money so totals can be corrected manually without
//! rewriting event history.

mod aggregate;

pub use aggregate::{
    compute_stats, EVENT_DELIVERABLE_SUBMITTED, EVENT_OFFER_ACCEPTED, EVENT_PROJECT_REMOVED,
};

pub use pulse_core::KpiRecord;
