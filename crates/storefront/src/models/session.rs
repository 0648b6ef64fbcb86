//! Session-related types.
//!
//! The visitor's session is the single source of truth for the cart, the
//! selected category and the last loaded purchase history. Everything is
//! stored under a handful of keys.

/// Session keys for storefront state.
pub mod keys {
    /// Key for the serialized `ViewState` (cart, category filter, history).
    pub const VIEW_STATE: &str = "view_state";

    /// Key for the one-shot flash notice shown on the next page render.
    pub const NOTICE: &str = "notice";
}
