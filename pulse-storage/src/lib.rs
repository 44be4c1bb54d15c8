//! Pulse Storage - Key-Value Seam and Collection Helpers
//!
//! Defines the storage abstraction every Pulse store persists through:
//!
//! - [`StateStore`]: a synchronous get/set/remove string store, the shape of
//!   the host's key-value storage. Embedders provide the real backend; tests
//!   and tooling use [`MemoryStore`].
//! - [`Collection`]: one logical JSON document per store key, loaded and
//!   saved whole (read-modify-write). Missing or corrupt documents load as
//!   empty - corruption is recovered locally, never propagated.
//! - [`SubscriberSet`]: ordered synchronous callback registry backing the
//!   notification and ledger subscribe channels.

mod collection;
mod state_store;
mod subscriber;

pub use collection::Collection;
pub use state_store::{MemoryStore, StateStore};
pub use subscriber::{SubscriberSet, Subscription};
