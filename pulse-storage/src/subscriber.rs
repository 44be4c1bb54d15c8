//! Ordered synchronous callback registry.

use pulse_core::{PulseResult, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Registry<T> = RwLock<Vec<(u64, Callback<T>)>>;

/// A set of subscriber callbacks invoked synchronously, in subscription
/// order, on every emit.
///
/// Subscribers are independent: unsubscribing one never affects the others,
/// and dropping a [`Subscription`] handle without calling `unsubscribe`
/// leaves the callback registered.
pub struct SubscriberSet<T> {
    registry: Arc<Registry<T>>,
    next_id: AtomicU64,
}

impl<T> SubscriberSet<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a callback. The returned handle removes it again.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subscribers) = self.registry.write() {
            subscribers.push((id, Arc::new(callback)));
        }
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every live callback with `value`, in subscription order.
    pub fn emit(&self, value: &T) -> PulseResult<()> {
        // Snapshot under the lock, call outside it, so a callback may
        // subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback<T>> = {
            let subscribers = self.registry.read().map_err(|_| StoreError::LockPoisoned)?;
            subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback(value);
        }
        Ok(())
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.registry.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for SubscriberSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`SubscriberSet::subscribe`].
pub struct Subscription<T> {
    id: u64,
    registry: Weak<Registry<T>>,
}

impl<T> Subscription<T> {
    /// Remove the callback. Idempotent; a handle whose set is gone is a no-op.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut subscribers) = registry.write() {
                subscribers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn subscribers_fire_in_subscription_order() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_a = Arc::clone(&seen);
        let _a = set.subscribe(move |v| seen_a.lock().unwrap().push(("a", *v)));
        let seen_b = Arc::clone(&seen);
        let _b = set.subscribe(move |v| seen_b.lock().unwrap().push(("b", *v)));

        set.emit(&1).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn unsubscribed_callback_never_fires_again() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let count = Arc::new(Mutex::new(0));

        let count_cb = Arc::clone(&count);
        let sub = set.subscribe(move |_| *count_cb.lock().unwrap() += 1);

        set.emit(&1).unwrap();
        sub.unsubscribe();
        set.emit(&2).unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn dropping_the_handle_keeps_the_subscription() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let count = Arc::new(Mutex::new(0));

        let count_cb = Arc::clone(&count);
        drop(set.subscribe(move |_| *count_cb.lock().unwrap() += 1));

        set.emit(&1).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
