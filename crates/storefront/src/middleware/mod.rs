//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Visitor lock (one request at a time per session)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! Handlers reach the visitor's state through the [`Visitor`] extractor.

pub mod request_id;
pub mod session;
pub mod visitor;
pub mod visitor_lock;

pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use visitor::Visitor;
pub use visitor_lock::{VisitorLocks, serialize_visitor_requests};
