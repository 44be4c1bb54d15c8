//! Revenue ledger entries.

use serde::{Deserialize, Serialize};

/// Sentinel id used by the deprecated whole-ledger `set_total` operation.
pub const LEGACY_TOTAL_ID: &str = "__legacy_total";

/// One named revenue source.
///
/// Invariant (enforced by the ledger): at most one entry per `id`; `id` is
/// trimmed and non-empty; `amount` is finite and >= 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueEntry {
    pub id: String,
    pub name: String,
    pub amount: f64,
}

impl RevenueEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
        }
    }
}

/// Clamp an amount to the valid range: non-finite values become 0,
/// negatives become 0. Applied on write and defensively re-applied on read
/// so persisted garbage can never poison a total.
pub fn normalize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}
