//! Storefront view state.
//!
//! [`ViewState`] holds everything the home page renders: the catalog, the
//! selected category, the cart and the purchase history. The catalog is
//! refetched on every page load and is never persisted; the other three
//! fields are session-scoped and round-trip through serde.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::{self, Product};
use crate::purchase::Purchase;
use crate::types::{Category, ProductId};

/// Errors raised by [`ViewState`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The product is not in the loaded catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// Everything the storefront page is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(skip)]
    products: Vec<Product>,
    #[serde(default)]
    selected_category: Option<Category>,
    #[serde(default)]
    cart: Cart,
    #[serde(default)]
    purchases: Vec<Purchase>,
}

impl ViewState {
    /// Create an empty view state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replace the catalog.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// The full catalog.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product in the catalog.
    #[must_use]
    pub fn find_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct category labels of the catalog.
    #[must_use]
    pub fn categories(&self) -> Vec<&Category> {
        catalog::categories(&self.products)
    }

    // =========================================================================
    // Category filter
    // =========================================================================

    /// Set or clear the active category filter.
    pub fn select_category(&mut self, category: Option<Category>) {
        self.selected_category = category;
    }

    /// The active category filter.
    #[must_use]
    pub const fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    /// Catalog narrowed by the active filter.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        catalog::filter_by_category(&self.products, self.selected_category.as_ref()).collect()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Add the catalog product with `id` to the cart.
    ///
    /// Returns the product as it was added.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownProduct`] if `id` is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<Product, ViewError> {
        let product = self
            .find_product(id)
            .cloned()
            .ok_or_else(|| ViewError::UnknownProduct(id.clone()))?;
        self.cart.add(&product);
        Ok(product)
    }

    // =========================================================================
    // Purchase history
    // =========================================================================

    /// Purchase history as last fetched.
    #[must_use]
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Replace the purchase history.
    pub fn set_purchases(&mut self, purchases: Vec<Purchase>) {
        self.purchases = purchases;
    }
}
