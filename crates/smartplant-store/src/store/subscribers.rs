//! Listener registry for state-change notifications.

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::PlantStoreState;

/// Callback invoked with the new snapshot after every successful mutation.
pub type Listener = Box<dyn Fn(&PlantStoreState) + Send + Sync>;

/// Handle returned by `PlantStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Call every listener in registration order.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    pub(crate) fn notify(&self, state: &PlantStoreState) {
        for (id, listener) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(state))).is_err() {
                tracing::error!(subscription = id.0, "store listener panicked; continuing");
            }
        }
    }
}
