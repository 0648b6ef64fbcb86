//! Home page route handler.
//!
//! The home page shows the category bar, the products of the selected
//! category, the cart panel and the purchase history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use farmacare_core::{Category, CategoryError, Product, ViewState};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::models::Notice;
use crate::routes::cart::CartView;
use crate::routes::purchases::PurchaseView;
use crate::services::{load_catalog, refresh_purchases};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

/// Category button display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub label: String,
    pub selected: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryView>,
    pub all_selected: bool,
    pub products: Vec<ProductView>,
    pub cart: CartView,
    pub count: usize,
    pub purchases: Vec<PurchaseView>,
    pub notice: Option<Notice>,
}

impl HomeTemplate {
    /// Build the page from the visitor's view state.
    #[must_use]
    pub fn new(view: &ViewState, notice: Option<Notice>) -> Self {
        let selected = view.selected_category();
        let categories = view
            .categories()
            .into_iter()
            .map(|category| CategoryView {
                label: category.to_string(),
                selected: selected == Some(category),
            })
            .collect();

        Self {
            categories,
            all_selected: selected.is_none(),
            products: view
                .visible_products()
                .into_iter()
                .map(ProductView::from)
                .collect(),
            cart: CartView::from(view.cart()),
            count: view.cart().len(),
            purchases: view.purchases().iter().map(PurchaseView::from).collect(),
            notice,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page.
///
/// The catalog and the purchase history are fetched independently; a
/// failure of either leaves the other untouched.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, mut visitor: Visitor) -> Result<impl IntoResponse> {
    load_catalog(state.api(), &mut visitor.view).await;
    refresh_purchases(state.api(), &mut visitor.view).await;

    visitor.save().await?;
    let notice = visitor.take_notice().await;

    Ok(HomeTemplate::new(&visitor.view, notice))
}

/// Category selection form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category: String,
}

/// Select a category, or clear the selection with a blank value.
#[instrument(skip(visitor))]
pub async fn select_category(
    mut visitor: Visitor,
    Form(form): Form<CategoryForm>,
) -> Result<impl IntoResponse> {
    let category = match Category::parse(&form.category) {
        Ok(category) => Some(category),
        Err(CategoryError::Blank) => None,
        Err(e) => return Err(AppError::BadRequest(e.to_string())),
    };

    tracing::debug!(category = ?category, "Selected category");
    visitor.view.select_category(category);
    visitor.save().await?;

    Ok(Redirect::to("/"))
}
