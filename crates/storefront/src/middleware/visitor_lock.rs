//! Per-visitor request serialization.
//!
//! Handlers read the visitor's [`ViewState`](farmacare_core::ViewState) from
//! the session, await the backend, and write it back. Two requests of the
//! same visitor running side by side would each write the copy they started
//! with, so the later write silently undoes the earlier one.
//!
//! This middleware runs outside the session layer and holds a lock keyed by
//! the session cookie for the whole request: session load, handler and
//! session save. Requests of one visitor run one after another; different
//! visitors never wait on each other. Requests without a session cookie have
//! nothing to race on and pass straight through.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, Weak};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;

/// Locks of the visitors with a request in flight.
///
/// Entries are weak, so a visitor's lock is freed with its last request.
#[derive(Clone, Default)]
pub struct VisitorLocks {
    inner: Arc<std::sync::Mutex<HashMap<String, Weak<Mutex<()>>>>>,
}

impl VisitorLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `session`, shared with every request currently holding it.
    #[must_use]
    pub fn lock_for(&self, session: &str) -> Arc<Mutex<()>> {
        let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(lock) = locks.get(session).and_then(Weak::upgrade) {
            return lock;
        }

        locks.retain(|_, lock| lock.strong_count() > 0);
        let lock = Arc::new(Mutex::new(()));
        locks.insert(session.to_string(), Arc::downgrade(&lock));
        lock
    }

    /// Number of visitors with a live lock.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }
}

/// Session cookie value of the request, if it carries one.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Middleware that runs a visitor's requests one at a time.
pub async fn serialize_visitor_requests(
    State(locks): State<VisitorLocks>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let lock = locks.lock_for(&session);
    let _guard = lock.lock().await;
    next.run(request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_same_session_shares_a_lock() {
        let locks = VisitorLocks::new();
        let first = locks.lock_for("abc");
        let second = locks.lock_for("abc");
        assert!(Arc::ptr_eq(&first, &second));

        let other = locks.lock_for("xyz");
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(locks.active(), 2);
    }

    #[test]
    fn test_lock_is_released_with_last_request() {
        let locks = VisitorLocks::new();
        let lock = locks.lock_for("abc");
        drop(lock);
        assert_eq!(locks.active(), 0);

        // A later request gets a fresh lock and the dead entry is pruned.
        let _lock = locks.lock_for("xyz");
        assert_eq!(locks.inner.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_request_waits_for_the_first() {
        let locks = VisitorLocks::new();
        let lock = locks.lock_for("abc");
        let guard = lock.lock().await;

        assert!(locks.lock_for("abc").try_lock().is_err());
        assert!(locks.lock_for("xyz").try_lock().is_ok());

        drop(guard);
        assert!(locks.lock_for("abc").try_lock().is_ok());
    }

    #[test]
    fn test_session_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; farmacare_session=s3ss10n; lang=es"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("s3ss10n"));
    }

    #[test]
    fn test_session_cookie_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie(&headers), None);
    }
}
