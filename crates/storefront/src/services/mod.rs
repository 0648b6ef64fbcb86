//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Catalog and history loading, purchase submission

pub mod checkout;

pub use checkout::{PurchaseOutcome, finalize_purchase, load_catalog, refresh_purchases};
