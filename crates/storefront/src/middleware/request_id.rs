//! Request ID middleware for request tracing and correlation.
//!
//! Every storefront request carries an ID that ties together its log lines,
//! the backend calls it made and any Sentry event it raised. The ID is:
//! - Taken from an upstream proxy (load balancer, CDN) when it sent a usable one
//! - Otherwise a fresh UUID v4
//! - Recorded in the `http_request` span built by the trace layer
//! - Added to the Sentry scope as the `request_id` tag
//! - Returned to the client in the `x-request-id` response header
//!
//! The upstream value ends up in logs, Sentry tags and a response header, so
//! only short IDs made of URL-safe characters are trusted. Anything else is
//! replaced and the replacement noted at debug.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID that is kept.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The upstream request ID, if present and well formed.
///
/// Accepts 1 to [`MAX_REQUEST_ID_LEN`] characters from `[A-Za-z0-9._:-]`,
/// which covers UUIDs, Cloudflare ray IDs and the usual proxy formats.
fn upstream_request_id(headers: &HeaderMap) -> Option<&str> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;

    let well_formed = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'));

    if well_formed {
        Some(id)
    } else {
        tracing::debug!(len = id.len(), "Ignoring malformed upstream request ID");
        None
    }
}

/// Middleware that gives every storefront request an ID.
///
/// Must run inside the `TraceLayer`, whose span declares the empty
/// `request_id` field this fills in.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Always valid: either a UUID or an ID restricted to visible ASCII above.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(id).expect("test header value"),
        );
        headers
    }

    #[test]
    fn test_upstream_id_is_kept() {
        let h = headers("req-123");
        assert_eq!(upstream_request_id(&h), Some("req-123"));

        let h = headers("8c1f5a2e9b7d4e3a-MAD");
        assert_eq!(upstream_request_id(&h), Some("8c1f5a2e9b7d4e3a-MAD"));

        let h = headers("lb:2026.10.18_0042");
        assert_eq!(upstream_request_id(&h), Some("lb:2026.10.18_0042"));
    }

    #[test]
    fn test_missing_or_empty_id_is_replaced() {
        assert_eq!(upstream_request_id(&HeaderMap::new()), None);
        assert_eq!(upstream_request_id(&headers("")), None);
    }

    #[test]
    fn test_malformed_id_is_replaced() {
        assert_eq!(upstream_request_id(&headers("two words")), None);
        assert_eq!(upstream_request_id(&headers("<script>")), None);
        assert_eq!(upstream_request_id(&headers("id\"quoted\"")), None);
    }

    #[test]
    fn test_overlong_id_is_replaced() {
        let longest = "a".repeat(MAX_REQUEST_ID_LEN);
        assert_eq!(upstream_request_id(&headers(&longest)), Some(longest.as_str()));

        let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(upstream_request_id(&headers(&too_long)), None);
    }
}
