//! Farmacare backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The backend is the source of truth for products and purchases; nothing
//!   is cached locally, every page load fetches fresh data
//! - One shared connection pool, per-request timeout from configuration
//!
//! # Endpoints
//!
//! - `GET  /products`  - product catalog
//! - `GET  /purchases` - purchase history
//! - `POST /purchases` - submit `{items, total}`
//!
//! # Example
//!
//! ```rust,ignore
//! use farmacare_storefront::api::PharmacyApiClient;
//!
//! let client = PharmacyApiClient::new(&config.api)?;
//! let products = client.fetch_products().await?;
//! ```

mod client;

pub use client::PharmacyApiClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },

    /// An endpoint URL could not be built from the configured base URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the API was reached and rejected the request.
    #[must_use]
    pub const fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// The HTTP status, if the API answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
