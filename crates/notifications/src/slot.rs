//! The single active-notification slot and its reducer.

use std::sync::Arc;

use yip_core::Reducer;

use crate::notification::Notification;

/// Monotonically increasing stamp assigned to each shown notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for Generation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A notification together with the generation it was shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub notification: Notification,
    pub generation: Generation,
}

/// Notification partition.
///
/// `generation` is the stamp of the most recent `Show`; it keeps advancing
/// after the slot is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    active: Option<ActiveNotification>,
    generation: Generation,
}

impl NotificationState {
    pub fn active(&self) -> Option<&ActiveNotification> {
        self.active.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.active.as_ref().map(|a| &a.notification)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    /// Replace whatever is active, unconditionally.
    Show(Notification),
    /// Clear the slot (explicit user dismissal).
    Hide,
    /// Clear the slot only if `generation` is still the active one.
    Expire { generation: Generation },
}

impl NotificationAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            NotificationAction::Show(_) => "toast/showToast",
            NotificationAction::Hide => "toast/hideToast",
            NotificationAction::Expire { .. } => "toast/expireToast",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationReducer;

impl Reducer for NotificationReducer {
    type State = NotificationState;
    type Action = NotificationAction;

    fn reduce(
        state: &Arc<NotificationState>,
        action: &NotificationAction,
    ) -> Arc<NotificationState> {
        match action {
            NotificationAction::Show(notification) => {
                let generation = state.generation.next();
                Arc::new(NotificationState {
                    active: Some(ActiveNotification {
                        notification: notification.clone(),
                        generation,
                    }),
                    generation,
                })
            }
            NotificationAction::Hide => clear(state),
            NotificationAction::Expire { generation } => match &state.active {
                Some(active) if active.generation == *generation => clear(state),
                _ => Arc::clone(state),
            },
        }
    }
}

fn clear(state: &Arc<NotificationState>) -> Arc<NotificationState> {
    if state.active.is_none() {
        return Arc::clone(state);
    }
    Arc::new(NotificationState {
        active: None,
        generation: state.generation,
    })
}
