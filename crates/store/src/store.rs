//! The state store.

use std::sync::Arc;

use crate::state::{AppAction, AppState, reduce};
use crate::subscription::{Listener, Listeners, Subscription};

/// Single-writer state container.
///
/// Constructed explicitly and handed to whoever needs it; there is no global
/// instance.
///
/// ## Dispatch contract
///
/// `dispatch` runs to completion before returning: reduce, compare by value,
/// commit, then notify every listener in registration order. Re-entrant
/// dispatch is not possible through this API: `dispatch` needs `&mut self`,
/// while listeners only receive `&AppState`.
#[derive(Debug, Default)]
pub struct StateStore {
    state: AppState,
    listeners: Listeners,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply `action`. Returns `true` if the state changed (and listeners ran).
    pub fn dispatch(&mut self, action: impl Into<AppAction>) -> bool {
        let action = action.into();
        let next = reduce(&self.state, &action);

        if next == self.state {
            tracing::trace!(action = action.action_type(), "dispatch produced no change");
            return false;
        }

        tracing::debug!(
            action = action.action_type(),
            products = next.product_count(),
            "state committed"
        );
        self.state = next;

        for listener in self.listeners.snapshot() {
            listener(&self.state);
        }
        true
    }

    /// Register a listener called after each committed change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use yip_catalog::{CatalogAction, Price, Product, ProductId};
    use yip_notifications::{Notification, NotificationAction};

    fn product(id: &str) -> Product {
        Product::new(ProductId::from(id), "Phone", Price::new(500.0).unwrap(), "u1")
    }

    #[test]
    fn dispatch_commits_and_notifies() {
        let mut store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |s| sink.lock().unwrap().push(s.product_count()));

        assert!(store.dispatch(CatalogAction::AddProduct(product("a"))));
        assert!(store.dispatch(CatalogAction::AddProduct(product("b"))));

        assert_eq!(store.state().product_count(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn no_op_dispatch_does_not_notify() {
        let mut store = StateStore::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        let before = store.state().clone();
        assert!(!store.dispatch(CatalogAction::RemoveProduct(ProductId::from("nonexistent-id"))));
        assert!(!store.dispatch(NotificationAction::Hide));

        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(store.state().ptr_eq(&before));
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store_order = Arc::new(Mutex::new(Vec::new()));
        let mut store = StateStore::new();

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let order = Arc::clone(&store_order);
                store.subscribe(move |_| order.lock().unwrap().push(i))
            })
            .collect();

        store.dispatch(NotificationAction::Show(Notification::info("x")));
        assert_eq!(*store_order.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut store = StateStore::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        store.dispatch(CatalogAction::AddProduct(product("a")));
        sub.unsubscribe();
        store.dispatch(CatalogAction::AddProduct(product("b")));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn listener_may_drop_its_own_subscription_mid_notification() {
        let mut store = StateStore::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let sub = store.subscribe(move |_| {
            inner.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(sub);

        store.dispatch(CatalogAction::AddProduct(product("a")));
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn listeners_can_skip_work_by_partition_identity() {
        let mut store = StateStore::new();
        let last = Arc::new(Mutex::new(store.state().catalog.clone()));
        let catalog_changes = Arc::new(Mutex::new(0));

        let (l, c) = (Arc::clone(&last), Arc::clone(&catalog_changes));
        let _sub = store.subscribe(move |s| {
            let mut last = l.lock().unwrap();
            if !Arc::ptr_eq(&last, &s.catalog) {
                *c.lock().unwrap() += 1;
                *last = s.catalog.clone();
            }
        });

        store.dispatch(NotificationAction::Show(Notification::info("a")));
        store.dispatch(CatalogAction::AddProduct(product("a")));
        store.dispatch(NotificationAction::Show(Notification::info("b")));

        assert_eq!(*catalog_changes.lock().unwrap(), 1);
    }
}
