//! Transient notification ("toast") partition.
//!
//! One slot, at most one active notification. Every `Show` advances a
//! generation counter; timer-driven dismissal names the generation it was armed
//! for, so a stale timer can never clear a newer notification.

pub mod notification;
pub mod slot;

pub use notification::{DEFAULT_DURATION_MS, Notification, Position, Severity};
pub use slot::{
    ActiveNotification, Generation, NotificationAction, NotificationReducer, NotificationState,
};
