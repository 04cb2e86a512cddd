//! Session keys.
//!
//! Everything the storefront keeps per visitor lives in the tower-sessions
//! record under one of these keys.

/// Session keys for visitor data.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = shopfront_core::cart::CART_STORAGE_KEY;
}
