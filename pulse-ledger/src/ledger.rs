//! The keyed revenue ledger.

use pulse_core::{normalize_amount, PulseResult, RevenueEntry, LEGACY_TOTAL_ID};
use pulse_storage::{Collection, StateStore, SubscriberSet, Subscription};
use std::sync::Arc;

/// Document key the ledger persists under.
pub const REVENUE_KEY: &str = "pulse.revenue";

/// Keyed collection of revenue entries with a derived total.
///
/// Invariants:
/// - at most one entry per `id` (upsert replaces),
/// - entry ids are trimmed and non-empty,
/// - amounts are finite and >= 0 (clamped on write, re-clamped on read),
/// - `total()` always equals the sum of the current entries' amounts.
///
/// `Clone` shares the persisted document and both subscriber channels.
pub struct RevenueLedger {
    entries: Collection<RevenueEntry>,
    total_channel: Arc<SubscriberSet<f64>>,
    list_channel: Arc<SubscriberSet<Vec<RevenueEntry>>>,
}

impl RevenueLedger {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            entries: Collection::new(store, REVENUE_KEY),
            total_channel: Arc::new(SubscriberSet::new()),
            list_channel: Arc::new(SubscriberSet::new()),
        }
    }

    /// Insert or replace an entry by id.
    ///
    /// The id is trimmed; an id that is empty after trimming is an accepted
    /// no-op (returns `false`, no persistence, no notifications). The amount
    /// is clamped to a finite value >= 0. On success both channels are
    /// notified synchronously, total first, before this returns.
    pub fn upsert(&self, entry: RevenueEntry) -> PulseResult<bool> {
        let id = entry.id.trim().to_string();
        if id.is_empty() {
            return Ok(false);
        }
        let entry = RevenueEntry {
            id: id.clone(),
            name: entry.name,
            amount: normalize_amount(entry.amount),
        };

        let mut entries = self.entries.load()?;
        match entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        self.entries.save(&entries)?;
        self.notify(&entries)?;
        Ok(true)
    }

    /// Remove an entry by id. Removing an unknown id is a valid no-op that
    /// still notifies both channels with the unchanged total.
    pub fn remove(&self, id: &str) -> PulseResult<bool> {
        let mut entries = self.entries.load()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.entries.save(&entries)?;
        }
        self.notify(&entries)?;
        Ok(removed)
    }

    /// Sum of all entry amounts, computed fresh on every call.
    pub fn total(&self) -> PulseResult<f64> {
        Ok(Self::sum(&self.entries.load()?))
    }

    /// All entries in first-insertion order, amounts re-clamped on read.
    pub fn list(&self) -> PulseResult<Vec<RevenueEntry>> {
        let mut entries = self.entries.load()?;
        for entry in &mut entries {
            entry.amount = normalize_amount(entry.amount);
        }
        Ok(entries)
    }

    /// Subscribe to the derived total. Fires before the list channel.
    pub fn subscribe_total<F>(&self, callback: F) -> Subscription<f64>
    where
        F: Fn(&f64) + Send + Sync + 'static,
    {
        self.total_channel.subscribe(callback)
    }

    /// Subscribe to the full entry list.
    pub fn subscribe_list<F>(&self, callback: F) -> Subscription<Vec<RevenueEntry>>
    where
        F: Fn(&Vec<RevenueEntry>) + Send + Sync + 'static,
    {
        self.list_channel.subscribe(callback)
    }

    /// Replace the whole ledger with a single synthetic entry holding
    /// `value` under the sentinel id.
    ///
    /// Kept for older persisted data that stored the total as one scalar.
    #[deprecated(note = "track revenue per source with upsert; this collapses the ledger")]
    pub fn set_total(&self, value: f64) -> PulseResult<()> {
        let entries = vec![RevenueEntry::new(
            LEGACY_TOTAL_ID,
            "Legacy total",
            normalize_amount(value),
        )];
        self.entries.save(&entries)?;
        self.notify(&entries)
    }

    fn sum(entries: &[RevenueEntry]) -> f64 {
        entries.iter().map(|e| normalize_amount(e.amount)).sum()
    }

    fn notify(&self, entries: &[RevenueEntry]) -> PulseResult<()> {
        self.total_channel.emit(&Self::sum(entries))?;
        self.list_channel.emit(&entries.to_vec())
    }
}

impl Clone for RevenueLedger {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            total_channel: Arc::clone(&self.total_channel),
            list_channel: Arc::clone(&self.list_channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use pulse_storage::MemoryStore;
    use std::sync::Mutex;

    fn ledger() -> RevenueLedger {
        RevenueLedger::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn upsert_replaces_by_id_and_total_follows() {
        let ledger = ledger();
        ledger.upsert(RevenueEntry::new("a", "Workshops", 100.0)).unwrap();
        ledger.upsert(RevenueEntry::new("a", "Workshops", 50.0)).unwrap();
        ledger.upsert(RevenueEntry::new("b", "Coaching", 25.0)).unwrap();

        assert_eq!(ledger.list().unwrap().len(), 2);
        assert_eq!(ledger.total().unwrap(), 75.0);
    }

    #[test]
    fn upsert_trims_ids_and_rejects_empty_ones() {
        let ledger = ledger();
        assert!(!ledger.upsert(RevenueEntry::new("   ", "Blank", 10.0)).unwrap());
        assert!(ledger.upsert(RevenueEntry::new(" a ", "Padded", 10.0)).unwrap());

        let entries = ledger.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "a");
    }

    #[test]
    fn rejected_upsert_does_not_notify() {
        let ledger = ledger();
        let fired = Arc::new(Mutex::new(0));
        let fired_cb = Arc::clone(&fired);
        let _sub = ledger.subscribe_total(move |_| *fired_cb.lock().unwrap() += 1);

        ledger.upsert(RevenueEntry::new("", "Blank", 10.0)).unwrap();
        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[test]
    fn amounts_are_clamped_on_write() {
        let ledger = ledger();
        ledger.upsert(RevenueEntry::new("neg", "Refund", -40.0)).unwrap();
        ledger.upsert(RevenueEntry::new("nan", "Broken", f64::NAN)).unwrap();
        ledger.upsert(RevenueEntry::new("ok", "Sales", 30.0)).unwrap();

        assert_eq!(ledger.total().unwrap(), 30.0);
        assert!(ledger.list().unwrap().iter().all(|e| e.amount >= 0.0));
    }

    #[test]
    fn remove_unknown_id_notifies_with_unchanged_total() {
        let ledger = ledger();
        ledger.upsert(RevenueEntry::new("a", "Sales", 80.0)).unwrap();

        let totals = Arc::new(Mutex::new(Vec::new()));
        let totals_cb = Arc::clone(&totals);
        let _sub = ledger.subscribe_total(move |t| totals_cb.lock().unwrap().push(*t));

        assert!(!ledger.remove("ghost").unwrap());
        assert_eq!(*totals.lock().unwrap(), vec![80.0]);
    }

    #[test]
    fn total_channel_fires_before_list_channel() {
        let ledger = ledger();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_total = Arc::clone(&order);
        let _t = ledger.subscribe_total(move |_| order_total.lock().unwrap().push("total"));
        let order_list = Arc::clone(&order);
        let _l = ledger.subscribe_list(move |_| order_list.lock().unwrap().push("list"));

        ledger.upsert(RevenueEntry::new("a", "Sales", 1.0)).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["total", "list"]);
    }

    #[test]
    fn set_total_collapses_to_the_sentinel_row() {
        let ledger = ledger();
        ledger.upsert(RevenueEntry::new("a", "Sales", 10.0)).unwrap();
        ledger.upsert(RevenueEntry::new("b", "Coaching", 20.0)).unwrap();

        #[allow(deprecated)]
        ledger.set_total(500.0).unwrap();

        let entries = ledger.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, LEGACY_TOTAL_ID);
        assert_eq!(ledger.total().unwrap(), 500.0);
    }

    #[test]
    fn corrupt_document_reads_as_empty_ledger() {
        let store = MemoryStore::new();
        store.set(REVENUE_KEY, "not json at all").unwrap();
        let ledger = RevenueLedger::new(Arc::new(store));
        assert_eq!(ledger.total().unwrap(), 0.0);
        assert!(ledger.list().unwrap().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Upsert(String, f64),
        Remove(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let id = prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")]
            .prop_map(str::to_string);
        prop_oneof![
            (id.clone(), -1000.0..1000.0f64).prop_map(|(id, amt)| Op::Upsert(id, amt)),
            id.prop_map(Op::Remove),
        ]
    }

    proptest! {
        /// Ledger additivity: after any op sequence, total() equals the sum
        /// of the surviving entries' amounts.
        #[test]
        fn total_always_equals_sum_of_entries(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let ledger = ledger();
            for op in ops {
                match op {
                    Op::Upsert(id, amount) => {
                        ledger.upsert(RevenueEntry::new(id, "src", amount)).unwrap();
                    }
                    Op::Remove(id) => {
                        ledger.remove(&id).unwrap();
                    }
                }
            }
            let entries = ledger.list().unwrap();
            let sum: f64 = entries.iter().map(|e| e.amount).sum();
            prop_assert!((ledger.total().unwrap() - sum).abs() < 1e-9);
            prop_assert!(ledger.total().unwrap() >= 0.0);
        }
    }
}
