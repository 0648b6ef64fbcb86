//! Visitor extractor.
//!
//! Loads the visitor's [`ViewState`] from the session for a handler and
//! writes it back on request. The session is the only place the cart lives.
//!
//! The copy taken here is written back whole, which is only safe because
//! [`serialize_visitor_requests`](super::serialize_visitor_requests) keeps a
//! visitor's other requests out until this one has saved its session.

use axum::{extract::FromRequestParts, http::request::Parts};
use farmacare_core::ViewState;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Notice, session_keys};

/// The current visitor: their session and the view state loaded from it.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut visitor: Visitor) -> Result<impl IntoResponse> {
///     visitor.view.cart_mut().clear();
///     visitor.save().await?;
///     Ok(Redirect::to("/"))
/// }
/// ```
pub struct Visitor {
    session: Session,
    pub view: ViewState,
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        // A value that no longer deserializes (e.g. after a deploy) starts the
        // visitor over instead of failing every request.
        let view = match session.get::<ViewState>(session_keys::VIEW_STATE).await {
            Ok(view) => view.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session state");
                ViewState::default()
            }
        };

        Ok(Self { session, view })
    }
}

impl Visitor {
    /// Persist the view state back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::VIEW_STATE, &self.view)
            .await
    }

    /// Queue a notice for the next page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn notify(&self, notice: &Notice) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::NOTICE, notice).await
    }

    /// Take the pending notice, if any. Each notice is shown once.
    pub async fn take_notice(&self) -> Option<Notice> {
        self.session
            .remove::<Notice>(session_keys::NOTICE)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read notice from session");
                None
            })
    }
}
