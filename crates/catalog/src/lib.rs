//! Product catalog partition.
//!
//! Business data for the catalog, implemented purely as deterministic logic (no
//! IO, no storage). Capacity is a caller-side contract; see [`MAX_PRODUCTS`].

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogAction, CatalogReducer, MAX_PRODUCTS};
pub use product::{Price, Product, ProductId};
