//! Client bootstrap: one store, wired to persistence, commands and the
//! notification presenter.

use std::sync::Arc;

use tokio::runtime::Handle;

use yip_catalog::ProductId;
use yip_core::ValidationResult;
use yip_notifications::NotificationAction;
use yip_store::{AppState, StateStore};

use crate::alerts::SystemAlerter;
use crate::commands::{CommandLayer, ProductFields};
use crate::config::ClientConfig;
use crate::persistence::{PersistenceGateway, RehydrateOutcome};
use crate::presenter::{NotificationPresenter, NotificationRenderer};
use crate::storage::KeyValueStorage;

#[derive(Debug)]
pub struct App {
    store: StateStore,
    commands: CommandLayer,
    persistence: PersistenceGateway,
    presenter: NotificationPresenter,
    rehydration: RehydrateOutcome,
}

impl App {
    /// Build the client and restore the persisted catalog.
    ///
    /// Rehydration completes before persistence and the presenter subscribe,
    /// so restoring state neither re-writes the blob nor shows anything.
    /// Must be called from within a tokio runtime.
    pub async fn boot(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        renderer: Arc<dyn NotificationRenderer>,
        alerter: Arc<dyn SystemAlerter>,
    ) -> Self {
        let runtime = Handle::current();
        let mut store = StateStore::new();

        let mut persistence = PersistenceGateway::new(storage, config.storage_key.clone());
        let rehydration = persistence.rehydrate(&mut store).await;
        persistence.attach(&store);

        let presenter = NotificationPresenter::attach(
            &store,
            renderer,
            config.notification_duration_ms,
            runtime.clone(),
        );
        let commands = CommandLayer::new(config, alerter, runtime);

        tracing::info!(
            products = store.state().product_count(),
            rehydration = ?rehydration,
            "client ready"
        );

        Self {
            store,
            commands,
            persistence,
            presenter,
            rehydration,
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    /// What boot-time rehydration found.
    pub fn rehydration(&self) -> RehydrateOutcome {
        self.rehydration
    }

    pub fn add_product(&mut self, fields: ProductFields) -> ValidationResult<ProductId> {
        self.commands.add_product(&mut self.store, fields)
    }

    pub fn remove_product(&mut self, id: &ProductId) -> bool {
        self.commands.remove_product(&mut self.store, id)
    }

    /// Explicit user dismissal of the active notification.
    pub fn dismiss_notification(&mut self) -> bool {
        self.store.dispatch(NotificationAction::Hide)
    }

    /// Wait for the next dismiss timer and dispatch its expiry.
    ///
    /// Returns whether the expiry cleared a notification; a stale one (the
    /// slot has moved on) changes nothing.
    pub async fn run_next_expiry(&mut self) -> bool {
        match self.presenter.next_expiry().await {
            Some(action) => self.store.dispatch(action),
            None => false,
        }
    }

    /// Wait until all catalog writes so far have been attempted.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    /// Tear down: the presenter disarms, queued writes drain, the writer stops.
    pub async fn shutdown(self) {
        let Self {
            store,
            persistence,
            presenter,
            ..
        } = self;

        drop(presenter);
        persistence.shutdown().await;
        tracing::debug!(listeners = store.listener_count(), "client shut down");
    }
}
