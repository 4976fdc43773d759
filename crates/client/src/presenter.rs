//! Notification presenter: renders the active notification and owns its
//! auto-dismiss timer.
//!
//! The timer lives here, not in the store. When it fires, the presenter emits
//! `Expire { generation }` for the owner to dispatch; the reducer ignores it if
//! a newer notification has been shown in the meantime. The presenter also
//! aborts the armed timer on preemption and on teardown.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use yip_notifications::{ActiveNotification, Generation, NotificationAction, NotificationState};
use yip_store::{StateStore, Subscription};

/// Visual surface for notifications (external collaborator).
pub trait NotificationRenderer: Send + Sync {
    fn show(&self, active: &ActiveNotification);

    fn clear(&self);
}

/// Renderer that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderer;

impl NotificationRenderer for TracingRenderer {
    fn show(&self, active: &ActiveNotification) {
        let n = &active.notification;
        tracing::info!(
            generation = %active.generation,
            severity = ?n.severity,
            position = ?n.position,
            message = %n.message,
            "notification shown"
        );
    }

    fn clear(&self) {
        tracing::debug!("notification cleared");
    }
}

struct ArmedTimer {
    generation: Generation,
    handle: JoinHandle<()>,
}

struct PresenterState {
    last_seen: Arc<NotificationState>,
    armed: Option<ArmedTimer>,
}

impl PresenterState {
    fn cancel(&mut self) {
        if let Some(timer) = self.armed.take() {
            timer.handle.abort();
            tracing::trace!(generation = %timer.generation, "dismiss timer cancelled");
        }
    }
}

pub struct NotificationPresenter {
    state: Arc<Mutex<PresenterState>>,
    expiries: mpsc::UnboundedReceiver<Generation>,
    subscription: Option<Subscription>,
}

impl core::fmt::Debug for NotificationPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationPresenter")
            .field("armed", &self.armed_generation())
            .finish()
    }
}

impl NotificationPresenter {
    /// Subscribe to `store` and start presenting.
    ///
    /// Timers are spawned on `runtime`; `default_duration_ms` applies to
    /// notifications without their own duration.
    pub fn attach(
        store: &StateStore,
        renderer: Arc<dyn NotificationRenderer>,
        default_duration_ms: u64,
        runtime: Handle,
    ) -> Self {
        let (sender, expiries) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(PresenterState {
            last_seen: Arc::clone(&store.state().notification),
            armed: None,
        }));

        let shared = Arc::clone(&state);
        let subscription = store.subscribe(move |app| {
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if Arc::ptr_eq(&state.last_seen, &app.notification) {
                return;
            }
            state.last_seen = Arc::clone(&app.notification);

            match app.notification.active() {
                Some(active) => {
                    if state.armed.as_ref().map(|t| t.generation) == Some(active.generation) {
                        return;
                    }
                    state.cancel();
                    renderer.show(active);

                    let generation = active.generation;
                    let delay = active.notification.display_duration(default_duration_ms);
                    let sender = sender.clone();
                    let handle = runtime.spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = sender.send(generation);
                    });
                    state.armed = Some(ArmedTimer { generation, handle });
                }
                None => {
                    state.cancel();
                    renderer.clear();
                }
            }
        });

        Self {
            state,
            expiries,
            subscription: Some(subscription),
        }
    }

    /// Generation the dismiss timer is currently armed for.
    pub fn armed_generation(&self) -> Option<Generation> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .armed
            .as_ref()
            .map(|t| t.generation)
    }

    /// Wait for the next timer expiry and return the action to dispatch.
    ///
    /// Returns `None` once the store holding the listener has been dropped.
    pub async fn next_expiry(&mut self) -> Option<NotificationAction> {
        self.expiries
            .recv()
            .await
            .map(|generation| NotificationAction::Expire { generation })
    }
}

impl Drop for NotificationPresenter {
    fn drop(&mut self) {
        self.subscription.take();
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::Instant;
    use yip_notifications::Notification;

    #[derive(Default)]
    struct RecordingRenderer {
        events: Mutex<Vec<String>>,
    }

    impl NotificationRenderer for RecordingRenderer {
        fn show(&self, active: &ActiveNotification) {
            self.events
                .lock()
                .unwrap()
                .push(format!("show {} {}", active.generation, active.notification.message));
        }

        fn clear(&self) {
            self.events.lock().unwrap().push("clear".to_string());
        }
    }

    fn attach(store: &StateStore, renderer: Arc<RecordingRenderer>) -> NotificationPresenter {
        NotificationPresenter::attach(store, renderer, 3000, Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_fires_after_default_duration() {
        let mut store = StateStore::new();
        let renderer = Arc::new(RecordingRenderer::default());
        let mut presenter = attach(&store, renderer.clone());

        let start = Instant::now();
        store.dispatch(NotificationAction::Show(Notification::info("hello")));
        let generation = store.state().notification.generation();
        assert_eq!(presenter.armed_generation(), Some(generation));

        let action = presenter.next_expiry().await.unwrap();
        assert_eq!(action, NotificationAction::Expire { generation });
        assert!(start.elapsed() >= Duration::from_millis(3000));

        assert!(store.dispatch(action));
        assert!(store.state().active_notification().is_none());
        assert_eq!(presenter.armed_generation(), None);
        assert_eq!(
            *renderer.events.lock().unwrap(),
            vec!["show #1 hello".to_string(), "clear".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn preemption_cancels_the_previous_timer() {
        let mut store = StateStore::new();
        let mut presenter = attach(&store, Arc::new(RecordingRenderer::default()));

        let start = Instant::now();
        let first = Notification::info("first").with_duration_ms(1000);
        let second = Notification::error("second").with_duration_ms(5000);
        store.dispatch(NotificationAction::Show(first));
        store.dispatch(NotificationAction::Show(second));
        let current = store.state().notification.generation();

        let action = presenter.next_expiry().await.unwrap();
        assert_eq!(action, NotificationAction::Expire { generation: current });
        assert!(start.elapsed() >= Duration::from_millis(5000));

        store.dispatch(action);
        assert!(store.state().active_notification().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_leaves_newer_notification_visible() {
        let mut store = StateStore::new();
        let _presenter = attach(&store, Arc::new(RecordingRenderer::default()));

        store.dispatch(NotificationAction::Show(Notification::info("old")));
        let stale = store.state().notification.generation();
        store.dispatch(NotificationAction::Show(Notification::info("new")));

        assert!(!store.dispatch(NotificationAction::Expire { generation: stale }));
        assert_eq!(
            store.state().active_notification().map(|a| a.notification.message.as_str()),
            Some("new")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn manual_hide_cancels_timer_and_clears_renderer() {
        let mut store = StateStore::new();
        let renderer = Arc::new(RecordingRenderer::default());
        let presenter = attach(&store, renderer.clone());

        store.dispatch(NotificationAction::Show(Notification::info("x")));
        store.dispatch(NotificationAction::Hide);

        assert_eq!(presenter.armed_generation(), None);
        assert_eq!(renderer.events.lock().unwrap().last().map(String::as_str), Some("clear"));
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_unsubscribes_and_disarms() {
        let mut store = StateStore::new();
        let presenter = attach(&store, Arc::new(RecordingRenderer::default()));
        store.dispatch(NotificationAction::Show(Notification::info("x")));
        assert_eq!(store.listener_count(), 1);

        drop(presenter);
        assert_eq!(store.listener_count(), 0);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(store.state().active_notification().is_some());
    }
}
