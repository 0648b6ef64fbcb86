//! Integration tests for Farmacare.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p farmacare-integration-tests
//! ```
//!
//! Nothing external is needed: each test starts a [`FakeBackend`] that
//! plays the pharmacy REST API and, where needed, a [`TestStorefront`]
//! pointed at it. Both listen on ephemeral ports.
//!
//! # Test Categories
//!
//! - `api_client` - `PharmacyApiClient` against the fake backend
//! - `storefront_cart` - catalog, category filter, and cart over HTTP
//! - `storefront_checkout` - purchase submission, notices, and history

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use farmacare_storefront::{api::PharmacyApiClient, config::StorefrontConfig, state::AppState};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{Event, Level, Subscriber, subscriber::DefaultGuard};
use tracing_subscriber::{Layer, layer::Context, prelude::*};
use url::Url;

// =============================================================================
// Fake Backend
// =============================================================================

/// What the fake backend serves and what it has seen.
#[derive(Debug, Default)]
pub struct BackendState {
    /// Body of `GET /products`.
    pub products: Vec<Value>,
    /// Body of `GET /purchases`; accepted submissions are appended.
    pub purchases: Vec<Value>,
    /// Answer `GET /products` with this raw body instead.
    pub raw_products: Option<String>,
    /// Answer `GET /products` with 500.
    pub fail_products: bool,
    /// Answer `GET /purchases` with 500.
    pub fail_purchases: bool,
    /// Answer `POST /purchases` with 500.
    pub fail_submit: bool,
    /// Sleep this long before answering `GET /products`.
    pub products_delay: Option<Duration>,
    /// Sleep this long before answering `POST /purchases`.
    pub submit_delay: Option<Duration>,
    /// Bodies received on `POST /purchases`, including rejected ones.
    pub submitted: Vec<Value>,
    /// `Authorization` header of every request, in order.
    pub authorization: Vec<Option<String>>,
}

/// A fake pharmacy REST API.
pub struct FakeBackend {
    addr: SocketAddr,
    prefix: String,
    state: Arc<Mutex<BackendState>>,
}

type Shared = Arc<Mutex<BackendState>>;

impl FakeBackend {
    /// Start a backend serving at the root path.
    pub async fn start() -> Self {
        Self::start_at("").await
    }

    /// Start a backend whose endpoints live below `prefix` (e.g. `/api/v1`).
    pub async fn start_at(prefix: &str) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));

        let api = Router::new()
            .route("/products", get(products))
            .route("/purchases", get(purchases).post(submit_purchase))
            .with_state(Arc::clone(&state));
        let app = if prefix.is_empty() {
            api
        } else {
            Router::new().nest(prefix, api)
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            prefix: prefix.to_string(),
            state,
        }
    }

    /// Base URL to configure clients with.
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, self.prefix)).unwrap()
    }

    /// Lock the backend state to inspect or change it.
    pub async fn state(&self) -> tokio::sync::MutexGuard<'_, BackendState> {
        self.state.lock().await
    }

    /// Replace the catalog.
    pub async fn set_products(&self, products: Vec<Value>) {
        self.state().await.products = products;
    }

    /// Bodies received on `POST /purchases`.
    pub async fn submitted(&self) -> Vec<Value> {
        self.state().await.submitted.clone()
    }

    /// An API client for this backend.
    pub fn client(&self) -> PharmacyApiClient {
        self.client_with(&[])
    }

    /// An API client for this backend with extra configuration variables.
    pub fn client_with(&self, vars: &[(&str, &str)]) -> PharmacyApiClient {
        let config = storefront_config(&self.url(), vars);
        PharmacyApiClient::new(&config.api).unwrap()
    }
}

fn record_auth(state: &mut BackendState, headers: &HeaderMap) {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.authorization.push(value);
}

async fn products(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let delay = {
        let mut state = state.lock().await;
        record_auth(&mut state, &headers);
        state.products_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = state.lock().await;
    if state.fail_products {
        return (StatusCode::INTERNAL_SERVER_ERROR, "products unavailable").into_response();
    }
    if let Some(raw) = &state.raw_products {
        return ([("content-type", "application/json")], raw.clone()).into_response();
    }
    Json(state.products.clone()).into_response()
}

async fn purchases(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().await;
    record_auth(&mut state, &headers);
    if state.fail_purchases {
        return (StatusCode::INTERNAL_SERVER_ERROR, "purchases unavailable").into_response();
    }
    Json(state.purchases.clone()).into_response()
}

async fn submit_purchase(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let delay = state.lock().await.submit_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().await;
    record_auth(&mut state, &headers);
    state.submitted.push(body.clone());
    if state.fail_submit {
        return (StatusCode::INTERNAL_SERVER_ERROR, "could not record purchase").into_response();
    }

    let id = state.purchases.len() + 1;
    let mut record = body;
    if let Some(object) = record.as_object_mut() {
        object.insert("id".to_string(), json!(id));
        object.insert("created_at".to_string(), json!("2026-10-18T12:00:00Z"));
    }
    state.purchases.push(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

// =============================================================================
// Log Capture
// =============================================================================

/// A logged event: level and message.
pub type LoggedEvent = (Level, String);

/// Records the events logged on the current thread while installed.
///
/// `#[tokio::test]` runs on a single thread, so everything the test awaits
/// directly is captured. Dropping the capture uninstalls it.
pub struct LogCapture {
    events: Arc<std::sync::Mutex<Vec<LoggedEvent>>>,
    _guard: DefaultGuard,
}

struct RecordingLayer {
    events: Arc<std::sync::Mutex<Vec<LoggedEvent>>>,
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor(String::new());
        event.record(&mut message);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((*event.metadata().level(), message.0));
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl LogCapture {
    /// Start capturing on the current thread.
    pub fn install() -> Self {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(RecordingLayer {
            events: Arc::clone(&events),
        });
        Self {
            events,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    /// Everything captured so far.
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Messages captured at exactly `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// Storefront configuration pointing at `api_url`.
pub fn storefront_config(api_url: &Url, vars: &[(&str, &str)]) -> StorefrontConfig {
    let api_url = api_url.to_string();
    StorefrontConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
            .or_else(|| (key == "FARMACARE_API_URL").then(|| api_url.clone()))
            .or_else(|| (key == "FARMACARE_API_TIMEOUT_SECS").then(|| "2".to_string()))
    })
    .unwrap()
}

/// A running storefront and a cookie-keeping client for it.
///
/// The client follows redirects, so a plain form post ends on the page it
/// was redirected to. Clones share the cookie jar, so a clone is the same
/// visitor in another tab.
#[derive(Clone)]
pub struct TestStorefront {
    pub url: String,
    pub client: reqwest::Client,
}

impl TestStorefront {
    /// Start a storefront talking to `backend`.
    pub async fn start(backend: &FakeBackend) -> Self {
        Self::start_with(backend, &[]).await
    }

    /// Start a storefront with extra configuration variables.
    pub async fn start_with(backend: &FakeBackend, vars: &[(&str, &str)]) -> Self {
        let config = storefront_config(&backend.url(), vars);
        let state = AppState::new(config).unwrap();
        let app = farmacare_storefront::app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();

        Self {
            url: format!("http://{addr}"),
            client,
        }
    }

    /// Another visitor of the same storefront, with its own session.
    pub fn new_visitor(&self) -> Self {
        Self {
            url: self.url.clone(),
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .unwrap(),
        }
    }

    /// GET a path and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .unwrap()
    }

    /// GET a path and return the body.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    /// POST a form as a plain browser would.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.url))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// POST a form the way HTMX does.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.url))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// The cart as JSON.
    pub async fn cart(&self) -> Value {
        self.get("/api/cart").await.json().await.unwrap()
    }
}

/// A product as the backend sends it.
pub fn product(id: i64, name: &str, price: f64, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image": format!("/img/{id}.png"),
        "category": category,
    })
}

/// A small catalog across two categories.
pub fn sample_catalog() -> Vec<Value> {
    vec![
        product(1, "Aspirina", 4.5, "Analgésicos"),
        product(2, "Jarabe para la tos", 7.0, "Resfriado"),
        product(3, "Ibuprofeno", 5.25, "Analgésicos"),
    ]
}
