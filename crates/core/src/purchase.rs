//! Purchases: the submission body and the historical records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::types::{Price, PurchaseId};

/// Body of `POST /purchases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub items: Vec<CartItem>,
    pub total: Price,
}

impl NewPurchase {
    /// Snapshot the cart's items and total.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }
}

/// A purchase recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PurchaseId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Purchase {
    /// Number of items in the purchase.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
