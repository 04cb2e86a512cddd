//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart operations with per-session locking

pub mod cart;

pub use cart::{CartLocks, CartService, SessionCartError, SessionCartStore};
