//! Backend API client implementation.

use std::sync::Arc;

use farmacare_core::{NewPurchase, Product, Purchase};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::config::PharmacyApiConfig;

const PRODUCTS_ENDPOINT: &str = "GET /products";
const PURCHASES_ENDPOINT: &str = "GET /purchases";
const SUBMIT_PURCHASE_ENDPOINT: &str = "POST /purchases";

/// Longest slice of an error body that ends up in the logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Client for the Farmacare backend API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct PharmacyApiClient {
    inner: Arc<PharmacyApiClientInner>,
}

struct PharmacyApiClientInner {
    client: reqwest::Client,
    products_url: Url,
    purchases_url: Url,
    config: PharmacyApiConfig,
}

impl PharmacyApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be derived from the
    /// base URL or the HTTP client cannot be built.
    pub fn new(config: &PharmacyApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(PharmacyApiClientInner {
                client,
                products_url: endpoint(&config.base_url, "products")?,
                purchases_url: endpoint(&config.base_url, "purchases")?,
                config: config.clone(),
            }),
        })
    }

    /// Attach the bearer token, if any.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.config.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and fail on any non-success status.
    ///
    /// Failures are only logged at debug here, with the response body. The
    /// caller knows how much a failed call matters and logs it at that level.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .authorize(request)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(
                endpoint,
                status = %status,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(ApiError::Status { endpoint, status });
        }

        Ok(response)
    }

    /// GET a JSON document.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        endpoint: &'static str,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.inner.client.get(url.clone()), endpoint)
            .await?;

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| {
            debug!(
                endpoint,
                error = %source,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse backend API response"
            );
            ApiError::Decode { endpoint, source }
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] on a non-success status,
    /// [`ApiError::Network`] if the API cannot be reached, and
    /// [`ApiError::Decode`] if the body is not a product list.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = self
            .get_json(&self.inner.products_url, PRODUCTS_ENDPOINT)
            .await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Fetch the purchase history.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`PharmacyApiClient::fetch_products`].
    #[instrument(skip(self))]
    pub async fn fetch_purchases(&self) -> Result<Vec<Purchase>, ApiError> {
        let purchases: Vec<Purchase> = self
            .get_json(&self.inner.purchases_url, PURCHASES_ENDPOINT)
            .await?;
        debug!(count = purchases.len(), "Fetched purchases");
        Ok(purchases)
    }

    /// Submit a purchase.
    ///
    /// Any success status counts as accepted; the response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the API rejects the purchase and
    /// [`ApiError::Network`] if it cannot be reached.
    #[instrument(skip(self, purchase), fields(items = purchase.items.len(), total = %purchase.total))]
    pub async fn submit_purchase(&self, purchase: &NewPurchase) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.inner.purchases_url.clone())
            .json(purchase);

        self.send(request, SUBMIT_PURCHASE_ENDPOINT).await?;
        debug!("Purchase accepted");
        Ok(())
    }
}

/// Resolve `segment` below `base`, keeping any path prefix on the base URL.
fn endpoint(base: &Url, segment: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(segment)
}
