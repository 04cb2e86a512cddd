//! Shopfront Core - storefront domain library.
//!
//! This crate holds the storefront's state and view math, with no I/O of its
//! own:
//! - [`cart`] - the cart value, its mutation API and the [`CartStore`] seam
//! - [`toast`] - added-to-cart notification content and timings
//! - [`listing`] - product search, sort and pagination math
//! - [`rating`] - star rating breakdown
//! - [`types`] - product ids, prices and email addresses
//!
//! The `storefront` crate supplies the HTTP surface, the catalog client and a
//! session-backed [`CartStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod listing;
pub mod rating;
pub mod toast;
pub mod types;

pub use cart::{Cart, CartError, CartItem, CartStore, CartSummary, ProductRef};
pub use toast::ToastNotice;
pub use types::*;
