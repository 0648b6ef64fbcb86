//! Farmacare Core - Domain types and view state.
//!
//! This crate provides the types used by the Farmacare storefront and its
//! tests:
//! - `storefront` - Public-facing pharmacy shop
//! - `integration-tests` - Fake backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! HTTP clients, no sessions. Everything here is synchronous and can be
//! unit tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and category labels
//! - [`catalog`] - Products and the category filter
//! - [`cart`] - The cart and its mutators
//! - [`purchase`] - Purchase submissions and history records
//! - [`view`] - The view state the storefront page renders from

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod purchase;
pub mod types;
pub mod view;

pub use cart::{Cart, CartItem};
pub use catalog::Product;
pub use purchase::{NewPurchase, Purchase};
pub use types::*;
pub use view::{ViewError, ViewState};
