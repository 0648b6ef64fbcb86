//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, PharmacyApiClient};
use crate::config::StorefrontConfig;
use crate::middleware::VisitorLocks;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: PharmacyApiClient,
    visitor_locks: VisitorLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend API client cannot be built from the
    /// configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = PharmacyApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                visitor_locks: VisitorLocks::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &PharmacyApiClient {
        &self.inner.api
    }

    /// Get the per-visitor request locks.
    #[must_use]
    pub fn visitor_locks(&self) -> &VisitorLocks {
        &self.inner.visitor_locks
    }
}
