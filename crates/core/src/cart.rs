//! Shopping cart.
//!
//! A cart is an ordered list of product copies. There is no quantity
//! field: adding the same product twice yields two entries, and removing
//! a product by id removes every entry for it.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// A copy of a [`Product`] taken when it was added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItem {
    product: Product,
}

impl CartItem {
    /// Product id.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.name
    }

    /// Price at the time the item was added.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.product.price
    }

    /// The full product snapshot.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
        }
    }
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        Self { product }
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a copy of `product`. Duplicates are kept as separate entries.
    pub fn add(&mut self, product: &Product) {
        self.items.push(CartItem::from(product));
    }

    /// Remove every entry whose id matches `id`.
    ///
    /// Returns the number of entries removed.
    pub fn remove(&mut self, id: &ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        before - self.items.len()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the entry prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, cents: i64) -> Product {
        Product::new(id, format!("Producto {id}"), Price::from_cents(cents))
    }

    #[test]
    fn test_add_to_empty_cart() {
        let p = product(1, 1000);
        let mut cart = Cart::new();
        cart.add(&p);
        assert_eq!(cart.items(), &[CartItem::from(&p)]);
    }

    #[test]
    fn test_duplicate_adds_are_separate_entries() {
        let p = product(1, 1000);
        let mut cart = Cart::new();
        cart.add(&p);
        cart.add(&p);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_remove_by_id_removes_all_duplicates() {
        let p = product(1, 1000);
        let other = product(2, 500);
        let mut cart = Cart::new();
        cart.add(&p);
        cart.add(&other);
        cart.add(&p);

        assert_eq!(cart.remove(&ProductId::from_number(1)), 2);
        assert_eq!(cart.items(), &[CartItem::from(&other)]);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        assert_eq!(cart.remove(&ProductId::from_number(9)), 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_is_sum_of_prices() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);

        cart.add(&product(1, 1000));
        cart.add(&product(2, 1500));
        assert_eq!(cart.total(), Price::from_cents(2500));

        cart.remove(&ProductId::from_number(1));
        assert_eq!(cart.total(), Price::from_cents(1500));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_item_is_a_snapshot() {
        let mut p = product(1, 1000);
        let mut cart = Cart::new();
        cart.add(&p);
        p.price = Price::from_cents(9999);
        assert_eq!(cart.total(), Price::from_cents(1000));
    }
}
