//! Core types for Shopfront.
//!
//! Type-safe wrappers for ids, prices and email addresses.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{InvalidProductId, ProductId};
pub use price::{CurrencyCode, Price, coerce_amount, format_fixed};
