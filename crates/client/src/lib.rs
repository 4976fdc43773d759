//! `yip-client`
//!
//! **Responsibility:** the catalog client core around the state store.
//!
//! This crate provides:
//! - Durable key-value storage (SQLite or in-memory)
//! - Catalog persistence and boot-time rehydration
//! - The command layer that validates intents before they become actions
//! - The notification presenter with generation-aware auto-dismiss
//! - [`App`], which wires all of the above around one `StateStore`
//!
//! Rendering, navigation, and OS alert delivery stay outside, behind the
//! [`NotificationRenderer`] and [`SystemAlerter`] traits.

pub mod alerts;
pub mod app;
pub mod commands;
pub mod config;
pub mod persistence;
pub mod presenter;
pub mod storage;

pub use alerts::{LogAlerter, SystemAlert, SystemAlerter};
pub use app::App;
pub use commands::{CommandLayer, ProductFields, plan_add};
pub use config::ClientConfig;
pub use persistence::{
    LogWriteObserver, PersistenceError, PersistenceGateway, RehydrateOutcome, WriteObserver,
    WriteReport,
};
pub use presenter::{NotificationPresenter, NotificationRenderer, TracingRenderer};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
