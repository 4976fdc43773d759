//! `yip-core`: building blocks shared by the catalog client crates.
//!
//! This crate contains **pure** primitives only (no IO, no async, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod reducer;
pub mod value_object;

pub use entity::Entity;
pub use error::{Field, ValidationError, ValidationResult};
pub use id::EntityId;
pub use reducer::Reducer;
pub use value_object::ValueObject;
