//! Purchase history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use farmacare_core::Purchase;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Visitor;
use crate::services::refresh_purchases;
use crate::state::AppState;

/// Purchase display data for templates.
#[derive(Clone)]
pub struct PurchaseView {
    pub id: Option<String>,
    pub date: Option<String>,
    pub items: Vec<String>,
    pub total: String,
}

impl From<&Purchase> for PurchaseView {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id.as_ref().map(ToString::to_string),
            date: purchase
                .created_at
                .map(|at| at.format("%d/%m/%Y %H:%M").to_string()),
            items: purchase
                .items
                .iter()
                .map(|item| item.name().to_string())
                .collect(),
            total: purchase.total.to_string(),
        }
    }
}

/// Order history fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_history.html")]
pub struct OrderHistoryTemplate {
    pub purchases: Vec<PurchaseView>,
}

/// Display the purchase history.
///
/// If the history cannot be fetched the last known one is shown.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, mut visitor: Visitor) -> Result<impl IntoResponse> {
    if refresh_purchases(state.api(), &mut visitor.view).await {
        visitor.save().await?;
    }

    Ok(OrderHistoryTemplate {
        purchases: visitor.view.purchases().iter().map(PurchaseView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmacare_core::{Cart, Price, Product};

    use super::*;

    fn purchase_json() -> serde_json::Value {
        serde_json::json!({
            "id": 41,
            "items": [
                {"id": 1, "name": "Aspirina", "price": 4.5},
                {"id": 2, "name": "Jarabe", "price": 7}
            ],
            "total": 11.5,
            "created_at": "2026-03-14T10:30:00Z"
        })
    }

    #[test]
    fn test_purchase_view() {
        let purchase: Purchase = serde_json::from_value(purchase_json()).unwrap();
        let view = PurchaseView::from(&purchase);

        assert_eq!(view.id.as_deref(), Some("41"));
        assert_eq!(view.date.as_deref(), Some("14/03/2026 10:30"));
        assert_eq!(view.items, ["Aspirina", "Jarabe"]);
        assert_eq!(view.total, "$11.50");
    }

    #[test]
    fn test_purchase_view_without_optional_fields() {
        let mut cart = Cart::new();
        cart.add(&Product::new(1, "Aspirina", Price::from_cents(450)));
        let purchase = Purchase {
            id: None,
            items: cart.items().to_vec(),
            total: cart.total(),
            created_at: None,
        };

        let view = PurchaseView::from(&purchase);
        assert_eq!(view.id, None);
        assert_eq!(view.date, None);
        assert_eq!(view.total, "$4.50");
    }

    #[test]
    fn test_order_history_renders() {
        let purchase: Purchase = serde_json::from_value(purchase_json()).unwrap();
        let html = OrderHistoryTemplate {
            purchases: vec![PurchaseView::from(&purchase)],
        }
        .render()
        .unwrap();
        assert!(html.contains("Compra #41"));
        assert!(html.contains("Jarabe"));

        let html = OrderHistoryTemplate { purchases: vec![] }.render().unwrap();
        assert!(html.contains("Todavía no hay compras."));
    }
}
