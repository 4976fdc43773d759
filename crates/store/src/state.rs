//! Composed application state and the root reducer.

use std::sync::Arc;

use yip_catalog::{Catalog, CatalogAction, CatalogReducer, Product};
use yip_core::Reducer;
use yip_notifications::{
    ActiveNotification, NotificationAction, NotificationReducer, NotificationState,
};

/// Immutable snapshot of the whole client state.
///
/// Cloning is cheap (two `Arc` bumps). Partition identity is meaningful: a
/// dispatch that only touches one partition leaves the other's `Arc` as is.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub notification: Arc<NotificationState>,
}

impl AppState {
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn active_notification(&self) -> Option<&ActiveNotification> {
        self.notification.active()
    }

    /// True when both partitions are the very same allocations.
    pub fn ptr_eq(&self, other: &AppState) -> bool {
        Arc::ptr_eq(&self.catalog, &other.catalog)
            && Arc::ptr_eq(&self.notification, &other.notification)
    }
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (*self.catalog == *other.catalog && *self.notification == *other.notification)
    }
}

/// Any action the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Catalog(CatalogAction),
    Notification(NotificationAction),
}

impl AppAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            AppAction::Catalog(a) => a.action_type(),
            AppAction::Notification(a) => a.action_type(),
        }
    }
}

impl From<CatalogAction> for AppAction {
    fn from(value: CatalogAction) -> Self {
        AppAction::Catalog(value)
    }
}

impl From<NotificationAction> for AppAction {
    fn from(value: NotificationAction) -> Self {
        AppAction::Notification(value)
    }
}

/// Root reducer: routes the action to the partition that owns it.
///
/// The other partition is carried over by `Arc::clone`, never rebuilt.
pub fn reduce(state: &AppState, action: &AppAction) -> AppState {
    match action {
        AppAction::Catalog(action) => AppState {
            catalog: CatalogReducer::reduce(&state.catalog, action),
            notification: Arc::clone(&state.notification),
        },
        AppAction::Notification(action) => AppState {
            catalog: Arc::clone(&state.catalog),
            notification: NotificationReducer::reduce(&state.notification, action),
        },
    }
}
