//! Shopping cart state.
//!
//! [`Cart`] is a plain value: an ordered list of [`CartItem`]s, unique by id,
//! in insertion order. Its methods are the pure state transitions; the async
//! functions in [`mutations`] wrap them in the load → mutate → save cycle
//! against a [`CartStore`].
//!
//! Every transition keeps `quantity >= 1` on every item.

mod item;
pub mod mutations;
pub mod store;
mod summary;

pub use item::{CartItem, ProductRef, UNTITLED_PRODUCT, coerce_quantity};
pub use mutations::{CartUpdate, MutationError, Refresh, add_item, change_quantity, remove_item};
pub use store::{CART_STORAGE_KEY, CartStore, MemoryCartStore, decode_cart, encode_cart};
pub use summary::CartSummary;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::types::ProductId;

/// Reasons a cart mutation is rejected. A rejected mutation changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product reference has no resolvable id.
    #[error("Product ID is missing")]
    MissingProductId,

    /// The requested quantity is below 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// What was just added, with the product fields resolved.
///
/// `quantity` is the amount requested by this add, not the line's new total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

/// Ordered collection of cart items, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items that may repeat ids.
    ///
    /// Later duplicates are merged into the first occurrence by summing
    /// quantities; the first occurrence keeps its position and fields.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            match cart.position(item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(CartItem {
                    quantity: item.quantity.max(1),
                    ..item
                }),
            }
        }
        cart
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price × quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Derived totals for display.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(self)
    }

    /// Add `quantity` of a product.
    ///
    /// An existing line has its quantity increased by exactly `quantity` and
    /// keeps its stored title, price and image. Otherwise a new line is
    /// appended using the reference's resolved fields.
    ///
    /// # Errors
    ///
    /// [`CartError::MissingProductId`] when the id resolves to 0 and
    /// [`CartError::InvalidQuantity`] when `quantity` is 0. Either way the
    /// cart is left untouched.
    pub fn add(&mut self, product: &ProductRef, quantity: u32) -> Result<AddedItem, CartError> {
        let id = product.resolve_id().ok_or(CartError::MissingProductId)?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let added = AddedItem {
            id,
            title: product.resolved_title(),
            price: product.resolved_price(),
            image: product.resolved_image(),
            quantity,
        };

        match self.items.iter_mut().find(|item| item.id == id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.items.push(CartItem {
                id,
                title: added.title.clone(),
                price: added.price,
                image: added.image.clone(),
                quantity,
            }),
        }

        Ok(added)
    }

    /// Apply `delta` to a line's quantity, clamping at 1.
    ///
    /// Returns `false` when no line has this id. Clamping never removes a
    /// line.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        item.quantity = u32::try_from(next.max(1)).unwrap_or(u32::MAX);
        true
    }

    /// Remove a line. Returns `false` when no line has this id.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
