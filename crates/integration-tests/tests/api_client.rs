//! Integration tests for the backend API client.

use std::time::Duration;

use farmacare_core::{Cart, NewPurchase, Product, ProductId, ViewState};
use farmacare_integration_tests::{FakeBackend, LogCapture, product, sample_catalog};
use farmacare_storefront::api::ApiError;
use farmacare_storefront::services::{finalize_purchase, load_catalog, refresh_purchases};
use serde_json::json;
use tracing::Level;

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_fetch_products() {
    let backend = FakeBackend::start().await;
    backend.set_products(sample_catalog()).await;

    let products = backend.client().fetch_products().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].id, ProductId::from_number(1));
    assert_eq!(products[0].name, "Aspirina");
    assert_eq!(products[0].price.to_string(), "$4.50");
    assert_eq!(products[0].category.as_ref().unwrap().as_str(), "Analgésicos");
}

#[tokio::test]
async fn test_fetch_products_accepts_string_ids_and_unknown_fields() {
    let backend = FakeBackend::start().await;
    backend
        .set_products(vec![json!({
            "id": "sku-77",
            "name": "Vitamina C",
            "price": 3.1,
            "stock": 12
        })])
        .await;

    let products = backend.client().fetch_products().await.unwrap();

    assert_eq!(products[0].id, ProductId::from("sku-77"));
    assert_eq!(products[0].extra["stock"], json!(12));
    assert!(products[0].category.is_none());
}

#[tokio::test]
async fn test_fetch_products_server_error() {
    let backend = FakeBackend::start().await;
    backend.state().await.fail_products = true;

    let err = backend.client().fetch_products().await.unwrap_err();

    assert!(err.is_status());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn test_fetch_products_invalid_body() {
    let backend = FakeBackend::start().await;
    backend.state().await.raw_products = Some(r#"{"products": "soon"}"#.to_string());

    let err = backend.client().fetch_products().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_products_times_out() {
    let backend = FakeBackend::start().await;
    backend.state().await.products_delay = Some(Duration::from_secs(3));

    let client = backend.client_with(&[("FARMACARE_API_TIMEOUT_SECS", "1")]);
    let err = client.fetch_products().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let backend = FakeBackend::start().await;
    let client = backend.client();

    let unreachable = farmacare_integration_tests::storefront_config(
        &url::Url::parse("http://127.0.0.1:9").unwrap(),
        &[],
    );
    let offline = farmacare_storefront::api::PharmacyApiClient::new(&unreachable.api).unwrap();

    assert!(client.fetch_products().await.is_ok());
    assert!(matches!(
        offline.fetch_products().await,
        Err(ApiError::Network(_))
    ));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let backend = FakeBackend::start_at("/api/v1").await;
    backend.set_products(sample_catalog()).await;

    let products = backend.client().fetch_products().await.unwrap();
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let backend = FakeBackend::start().await;

    let client = backend.client_with(&[("FARMACARE_API_TOKEN", "s3cr3t-Tk9qLmW2")]);
    client.fetch_products().await.unwrap();
    backend.client().fetch_purchases().await.unwrap();

    let auth = backend.state().await.authorization.clone();
    assert_eq!(auth[0].as_deref(), Some("Bearer s3cr3t-Tk9qLmW2"));
    assert_eq!(auth[1], None);
}

// =============================================================================
// Purchases
// =============================================================================

#[tokio::test]
async fn test_submit_purchase_body() {
    let backend = FakeBackend::start().await;
    backend
        .set_products(vec![json!({
            "id": 5,
            "name": "Termómetro",
            "price": 12.5,
            "category": "Equipos",
            "brand": "Medix"
        })])
        .await;
    let client = backend.client();

    let products: Vec<Product> = client.fetch_products().await.unwrap();
    let mut cart = Cart::new();
    cart.add(&products[0]);
    cart.add(&products[0]);

    client
        .submit_purchase(&NewPurchase::from_cart(&cart))
        .await
        .unwrap();

    let submitted = backend.submitted().await;
    assert_eq!(submitted.len(), 1);
    let body = &submitted[0];
    assert_eq!(body["total"].as_f64(), Some(25.0));
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    // Items are the products exactly as the backend sent them
    assert_eq!(body["items"][0]["id"], json!(5));
    assert_eq!(body["items"][0]["brand"], json!("Medix"));
    assert_eq!(body["items"][1]["category"], json!("Equipos"));
}

#[tokio::test]
async fn test_submit_purchase_rejected() {
    let backend = FakeBackend::start().await;
    backend.state().await.fail_submit = true;
    let client = backend.client();

    let mut cart = Cart::new();
    let products: Vec<Product> = serde_json::from_value(json!([product(1, "Aspirina", 4.5, "Analgésicos")])).unwrap();
    cart.add(&products[0]);

    let err = client
        .submit_purchase(&NewPurchase::from_cart(&cart))
        .await
        .unwrap_err();
    assert!(err.is_status());
}

#[tokio::test]
async fn test_fetch_purchases() {
    let backend = FakeBackend::start().await;
    backend.state().await.purchases = vec![
        json!({"id": 1, "items": [product(1, "Aspirina", 4.5, "Analgésicos")], "total": 4.5}),
        json!({"id": "b-2", "items": [], "total": 0}),
    ];

    let purchases = backend.client().fetch_purchases().await.unwrap();

    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0].item_count(), 1);
    assert_eq!(purchases[0].total.to_string(), "$4.50");
    assert_eq!(purchases[1].id.as_ref().unwrap().to_string(), "b-2");
}

// =============================================================================
// Failure Logging
// =============================================================================

#[tokio::test]
async fn test_client_failures_are_not_logged_as_errors() {
    let backend = FakeBackend::start().await;
    {
        let mut state = backend.state().await;
        state.fail_purchases = true;
        state.raw_products = Some("not json".to_string());
    }
    let client = backend.client();

    let logs = LogCapture::install();
    client.fetch_purchases().await.unwrap_err();
    client.fetch_products().await.unwrap_err();

    assert!(logs.at(Level::ERROR).is_empty(), "{:?}", logs.events());
    assert!(logs.at(Level::WARN).is_empty(), "{:?}", logs.events());
    let debug = logs.at(Level::DEBUG);
    assert!(debug.iter().any(|m| m == "Backend API returned non-success status"));
    assert!(debug.iter().any(|m| m == "Failed to parse backend API response"));
}

#[tokio::test]
async fn test_history_failure_is_a_warning() {
    let backend = FakeBackend::start().await;
    backend.state().await.fail_purchases = true;
    let client = backend.client();
    let mut view = ViewState::new();

    let logs = LogCapture::install();
    assert!(!refresh_purchases(&client, &mut view).await);

    assert!(logs.at(Level::ERROR).is_empty(), "{:?}", logs.events());
    assert_eq!(logs.at(Level::WARN), ["Error fetching purchases"]);
}

#[tokio::test]
async fn test_catalog_failure_is_one_error() {
    let backend = FakeBackend::start().await;
    backend.state().await.fail_products = true;
    let client = backend.client();
    let mut view = ViewState::new();

    let logs = LogCapture::install();
    assert!(!load_catalog(&client, &mut view).await);

    assert_eq!(logs.at(Level::ERROR), ["Error fetching products"]);
}

#[tokio::test]
async fn test_rejected_purchase_is_one_error() {
    let backend = FakeBackend::start().await;
    backend.set_products(sample_catalog()).await;
    backend.state().await.fail_submit = true;
    let client = backend.client();
    let mut view = ViewState::new();
    view.set_products(client.fetch_products().await.unwrap());
    view.add_to_cart(&ProductId::from_number(1)).unwrap();

    let logs = LogCapture::install();
    let outcome = finalize_purchase(&client, &mut view).await;

    assert!(matches!(outcome, farmacare_storefront::services::PurchaseOutcome::Failed(_)));
    assert_eq!(logs.at(Level::ERROR), ["Error finalizing purchase"]);
    assert_eq!(view.cart().len(), 1);
}
