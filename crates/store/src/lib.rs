//! Synchronous, reducer-driven state container.
//!
//! The store owns one [`AppState`] made of two `Arc`-shared partitions (catalog
//! and notification). [`StateStore::dispatch`] runs the root reducer, commits
//! the result only if it differs by value, and then notifies listeners in
//! registration order before returning.

pub mod state;
pub mod store;
pub mod subscription;

pub use state::{AppAction, AppState, reduce};
pub use store::StateStore;
pub use subscription::{Listener, Subscription};
