//! Storefront-local models.
//!
//! Domain types (products, cart, purchases) live in `farmacare_core`; this
//! module only holds what the web layer keeps in the visitor's session.

pub mod notice;
pub mod session;

pub use notice::{Notice, NoticeLevel};
pub use session::keys as session_keys;
