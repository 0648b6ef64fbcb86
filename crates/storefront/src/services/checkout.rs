//! Storefront operations that talk to the backend API.
//!
//! Each function takes the visitor's [`ViewState`], performs its API call,
//! and applies the result to the state. None of them notify the visitor:
//! [`finalize_purchase`] returns a [`PurchaseOutcome`] and the caller
//! decides how to present it.

use farmacare_core::{NewPurchase, Price, ViewState};
use tracing::instrument;

use crate::api::{ApiError, PharmacyApiClient};
use crate::models::Notice;

/// Result of [`finalize_purchase`].
#[derive(Debug)]
pub enum PurchaseOutcome {
    /// The API accepted the purchase; the cart has been emptied.
    Completed { items: usize, total: Price },
    /// Nothing to submit; the API was not called.
    EmptyCart,
    /// The API call failed; the cart is untouched so the visitor can retry.
    Failed(ApiError),
}

impl PurchaseOutcome {
    /// Whether the purchase went through.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl From<&PurchaseOutcome> for Notice {
    fn from(outcome: &PurchaseOutcome) -> Self {
        match outcome {
            PurchaseOutcome::Completed { .. } => Self::success("Compra finalizada con éxito"),
            PurchaseOutcome::EmptyCart => Self::info("Tu carrito está vacío."),
            PurchaseOutcome::Failed(_) => {
                Self::error("No se pudo finalizar la compra. Inténtalo de nuevo.")
            }
        }
    }
}

/// Load the product catalog into `view`.
///
/// On failure the error is logged and the catalog is left empty, so the
/// page falls back to its "no products" message. Returns whether the
/// catalog was loaded.
#[instrument(skip_all)]
pub async fn load_catalog(api: &PharmacyApiClient, view: &mut ViewState) -> bool {
    match api.fetch_products().await {
        Ok(products) => {
            view.set_products(products);
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching products");
            view.set_products(Vec::new());
            false
        }
    }
}

/// Refresh the purchase history in `view`.
///
/// On failure the error is logged and the previous history is kept.
/// Returns whether the history was refreshed.
#[instrument(skip_all)]
pub async fn refresh_purchases(api: &PharmacyApiClient, view: &mut ViewState) -> bool {
    match api.fetch_purchases().await {
        Ok(purchases) => {
            view.set_purchases(purchases);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching purchases");
            false
        }
    }
}

/// Submit the cart as a purchase.
///
/// The total sent is the sum of the cart item prices. On success the cart
/// is cleared and the purchase history re-fetched; on failure the cart is
/// left as it was.
#[instrument(skip_all, fields(items = view.cart().len()))]
pub async fn finalize_purchase(api: &PharmacyApiClient, view: &mut ViewState) -> PurchaseOutcome {
    if view.cart().is_empty() {
        return PurchaseOutcome::EmptyCart;
    }

    let purchase = NewPurchase::from_cart(view.cart());

    match api.submit_purchase(&purchase).await {
        Ok(()) => {
            tracing::info!(
                items = purchase.items.len(),
                total = %purchase.total,
                "Purchase finalized"
            );
            view.cart_mut().clear();
            refresh_purchases(api, view).await;
            PurchaseOutcome::Completed {
                items: purchase.items.len(),
                total: purchase.total,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Error finalizing purchase");
            PurchaseOutcome::Failed(e)
        }
    }
}
