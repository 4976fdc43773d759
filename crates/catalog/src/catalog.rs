//! Catalog partition and its reducer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use yip_core::{Entity, Reducer};

use crate::product::{Product, ProductId};

/// Maximum number of products the command layer admits into the catalog.
///
/// The reducer does not enforce this; it is a contract on callers.
pub const MAX_PRODUCTS: usize = 5;

/// Ordered product collection, most-recently-added first.
///
/// Serializes as `{ "products": [...] }`, which is also the shape of the
/// persisted `product` partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| p.has_id(id))
    }
}

/// Transitions over the catalog partition.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    /// Prepend a product. The caller guarantees validity and id uniqueness.
    AddProduct(Product),
    /// Remove every product with this id (no-op if absent).
    RemoveProduct(ProductId),
    /// Replace the whole sequence. Used by rehydration only.
    ReplaceAll(Vec<Product>),
}

impl CatalogAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            CatalogAction::AddProduct(_) => "product/addProduct",
            CatalogAction::RemoveProduct(_) => "product/removeProduct",
            CatalogAction::ReplaceAll(_) => "product/setProducts",
        }
    }
}

/// Pure reducer over [`Catalog`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = Catalog;
    type Action = CatalogAction;

    fn reduce(state: &Arc<Catalog>, action: &CatalogAction) -> Arc<Catalog> {
        match action {
            CatalogAction::AddProduct(product) => {
                let mut products = Vec::with_capacity(state.len() + 1);
                products.push(product.clone());
                products.extend(state.products.iter().cloned());
                Arc::new(Catalog { products })
            }
            CatalogAction::RemoveProduct(id) => {
                if !state.contains(id) {
                    return Arc::clone(state);
                }
                let products = state
                    .products
                    .iter()
                    .filter(|p| !p.has_id(id))
                    .cloned()
                    .collect();
                Arc::new(Catalog { products })
            }
            CatalogAction::ReplaceAll(products) => {
                yip_core::reducer::keep_if_unchanged(state, Catalog::new(products.clone()))
            }
        }
    }
}
