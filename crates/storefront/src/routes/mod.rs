//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (categories, products, cart, history)
//! POST /category               - Select a category (blank clears the filter)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel (fragment)
//! POST /cart/add               - Add a product (returns cart fragment, triggers cart-updated)
//! POST /cart/remove            - Remove a product (returns cart fragment)
//! POST /cart/clear             - Empty the cart (returns cart fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Submit the cart as a purchase, redirect home
//!
//! # Purchases
//! GET  /purchases              - Order history (fragment)
//!
//! # JSON
//! GET  /api/cart               - Cart contents and total
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod purchases;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/category", post(home::select_category))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::finalize))
        // Purchase history
        .route("/purchases", get(purchases::index))
        // JSON
        .route("/api/cart", get(cart::json))
}
