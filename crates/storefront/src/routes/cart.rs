//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! HTMX requests get the refreshed cart fragment back; plain form posts are
//! redirected to the home page. The cart itself lives in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use farmacare_core::{Cart, CartItem, Price, ProductId, ViewError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub count: usize,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            price: item.price().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            count: cart.len(),
        }
    }
}

/// Cart form data (add and remove).
#[derive(Debug, Deserialize)]
pub struct CartProductForm {
    pub product_id: String,
}

impl CartProductForm {
    fn product_id(&self) -> Result<ProductId> {
        if self.product_id.trim().is_empty() {
            return Err(AppError::BadRequest("missing product_id".to_string()));
        }
        Ok(ProductId::from(self.product_id.as_str()))
    }
}

/// JSON representation of the cart.
#[derive(Debug, Serialize)]
pub struct CartJson<'a> {
    pub items: &'a [CartItem],
    pub total: Price,
    pub count: usize,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart.html")]
pub struct CartTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Whether the request was issued by HTMX.
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Respond to a cart mutation.
fn cart_updated(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

/// Display the cart panel.
#[instrument(skip_all)]
pub async fn show(visitor: Visitor) -> impl IntoResponse {
    CartTemplate {
        cart: CartView::from(visitor.view.cart()),
    }
}

/// Add a product to the cart.
///
/// The product is copied from a freshly fetched catalog, so the cart holds
/// the price the visitor saw. Adding the same product twice keeps two
/// entries.
#[instrument(skip(state, visitor, headers))]
pub async fn add(
    State(state): State<AppState>,
    mut visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    let id = form.product_id()?;

    let products = state.api().fetch_products().await?;
    visitor.view.set_products(products);

    let name = match visitor.view.add_to_cart(&id) {
        Ok(product) => product.name,
        Err(ViewError::UnknownProduct(id)) => {
            return Err(AppError::NotFound(format!("product {id}")));
        }
    };
    visitor.save().await?;

    let product_id = id.to_string();
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", product_id.as_str()), ("name", name.as_str())]),
    );
    tracing::info!(product_id = %id, cart_len = visitor.view.cart().len(), "Added to cart");

    Ok(cart_updated(&headers, visitor.view.cart()))
}

/// Remove every entry of a product from the cart.
#[instrument(skip(visitor, headers))]
pub async fn remove(
    mut visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    let id = form.product_id()?;

    let removed = visitor.view.cart_mut().remove(&id);
    visitor.save().await?;

    tracing::info!(product_id = %id, removed, "Removed from cart");

    Ok(cart_updated(&headers, visitor.view.cart()))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(mut visitor: Visitor, headers: HeaderMap) -> Result<Response> {
    visitor.view.cart_mut().clear();
    visitor.save().await?;

    tracing::info!("Cleared cart");

    Ok(cart_updated(&headers, visitor.view.cart()))
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(visitor: Visitor) -> impl IntoResponse {
    CartCountTemplate {
        count: visitor.view.cart().len(),
    }
}

/// Cart as JSON.
#[instrument(skip_all)]
pub async fn json(visitor: Visitor) -> Response {
    let cart = visitor.view.cart();
    Json(CartJson {
        items: cart.items(),
        total: cart.total(),
        count: cart.len(),
    })
    .into_response()
}
