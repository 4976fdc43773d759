//! Listener registration (observer mechanics only).
//!
//! A [`Subscription`] is the handle returned by `StateStore::subscribe`. The
//! listener stays registered for as long as the handle lives: call
//! [`Subscription::unsubscribe`] or simply drop it.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::state::AppState;

/// Callback invoked synchronously after every committed state change.
///
/// Listeners only ever see `&AppState`; they cannot reach the store, so they
/// cannot re-enter `dispatch`.
pub type Listener = Arc<dyn Fn(&AppState) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Registry {
    fn insert(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }
}

/// Shared listener registry owned by a store.
#[derive(Debug, Default)]
pub(crate) struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(listener);

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Snapshot of the listeners, in registration order.
    ///
    /// Taken before a notification pass so listeners may (un)subscribe while
    /// being notified without deadlocking the registry.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Registration handle. Dropping it unsubscribes the listener.
#[derive(Debug)]
#[must_use = "dropping a Subscription immediately unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
        }
    }
}
