//! Cart persistence seam.
//!
//! The cart is persisted as a JSON array of items under [`CART_STORAGE_KEY`]:
//!
//! ```text
//! [{"id":1,"title":"Shirt","price":19.99,"image":"","quantity":2}]
//! ```
//!
//! Decoding is lenient per entry (see [`decode_cart`]). Loading never fails:
//! an absent or undecodable value is an empty cart.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::{Cart, CartItem};

/// Storage key holding the encoded cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Durable storage for one visitor's cart.
///
/// Implementations hold no cart state of their own between calls: every
/// `load` reads the stored value afresh.
pub trait CartStore: Send + Sync {
    /// Error raised when a write fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored cart, or an empty cart if absent or undecodable.
    fn load(&self) -> impl Future<Output = Cart> + Send;

    /// Overwrite the stored cart with `cart`.
    fn save(&self, cart: &Cart) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Serialize a cart to its stored text form.
///
/// # Errors
///
/// Returns the underlying `serde_json` error; this does not happen for carts
/// built through [`Cart`]'s own methods.
pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Parse stored text into a cart.
///
/// The value must be a JSON array. Within it, entries that are not objects or
/// whose id does not resolve are dropped, missing fields take their defaults,
/// and duplicate ids merge into the first occurrence.
///
/// # Errors
///
/// Returns an error when the text is not JSON or not an array.
pub fn decode_cart(raw: &str) -> Result<Cart, serde_json::Error> {
    let entries: Vec<Value> = serde_json::from_str(raw)?;
    Ok(Cart::from_items(
        entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(CartItem::from_stored),
    ))
}

/// In-process cart store holding the encoded text, for tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    raw: Mutex<Option<String>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with raw stored text, valid or not.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// The current stored text.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStore for MemoryCartStore {
    type Error = serde_json::Error;

    async fn load(&self) -> Cart {
        self.raw()
            .and_then(|raw| decode_cart(&raw).ok())
            .unwrap_or_default()
    }

    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        let encoded = encode_cart(cart)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }
}
