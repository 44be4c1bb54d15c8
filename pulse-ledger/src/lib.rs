//! Pulse Ledger - Revenue Sources and Derived Total
//!
//! The ledger is the authoritative home of monetary figures: revenue is
//! never folded out of the event log, so totals can be corrected manually
//! without rewriting event history. It holds one named entry per revenue
//! source and derives the total fresh on every read.
//!
//! Two independent pub/sub channels fire synchronously on every mutation,
//! total first, then the full list, so dashboards can bind to whichever
//! granularity they render.

mod ledger;

pub use ledger::{RevenueLedger, REVENUE_KEY};

// Re-export the record types for convenience
pub use pulse_core::{normalize_amount, RevenueEntry, LEGACY_TOTAL_ID};
pub use pulse_storage::Subscription;
