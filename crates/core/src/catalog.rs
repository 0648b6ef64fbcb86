//! Product catalog as served by the backend API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Category, Price, ProductId};

/// A product in the pharmacy catalog.
///
/// Fields the storefront does not use are kept in `extra` so that a
/// product copied into the cart and submitted with a purchase carries
/// everything the backend originally sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra fields.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            category: None,
            extra: Map::new(),
        }
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether this product belongs to `category` (exact label match).
    #[must_use]
    pub fn in_category(&self, category: &Category) -> bool {
        self.category.as_ref() == Some(category)
    }
}

/// Products visible under an optional category filter.
///
/// With no filter the whole catalog is returned, in catalog order.
pub fn filter_by_category<'a>(
    products: &'a [Product],
    category: Option<&'a Category>,
) -> impl Iterator<Item = &'a Product> + 'a {
    products
        .iter()
        .filter(move |product| category.is_none_or(|c| product.in_category(c)))
}

/// Distinct category labels of the catalog, in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&Category> {
    let mut seen: Vec<&Category> = Vec::new();
    for category in products.iter().filter_map(|p| p.category.as_ref()) {
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}
