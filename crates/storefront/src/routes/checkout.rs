//! Checkout route handler.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::models::Notice;
use crate::services::{PurchaseOutcome, finalize_purchase};
use crate::state::AppState;

/// Finalize the purchase of the visitor's cart.
///
/// The outcome is stored as a notice and shown on the home page after the
/// redirect. A failed submission keeps the cart so the visitor can retry.
#[instrument(skip_all)]
pub async fn finalize(State(state): State<AppState>, mut visitor: Visitor) -> Result<impl IntoResponse> {
    let outcome = finalize_purchase(state.api(), &mut visitor.view).await;

    if let PurchaseOutcome::Completed { items, total } = &outcome {
        let (items, total) = (items.to_string(), total.to_string());
        add_breadcrumb(
            "checkout",
            "Purchase finalized",
            Some(&[("items", items.as_str()), ("total", total.as_str())]),
        );
    }

    // Only a completed purchase changes the cart and the history.
    if outcome.is_completed() {
        visitor.save().await?;
    }
    visitor.notify(&Notice::from(&outcome)).await?;

    Ok(Redirect::to("/"))
}
