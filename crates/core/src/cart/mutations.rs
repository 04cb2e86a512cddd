//! Cart mutation API.
//!
//! Each operation loads the cart from its store, applies one [`Cart`]
//! transition and writes the whole cart back. The returned [`CartUpdate`]
//! tells the view layer what to refresh; nothing here renders.
//!
//! Operations do not serialize themselves. Callers that may run two
//! operations against the same store concurrently must hold a lock around
//! each call.

use thiserror::Error;

use super::store::CartStore;
use super::{Cart, CartError, ProductRef};
use crate::toast::ToastNotice;
use crate::types::ProductId;

/// Views affected by a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    /// The item-count badge.
    pub badge: bool,
    /// The full cart line list and totals.
    pub view: bool,
}

impl Refresh {
    pub const NONE: Self = Self {
        badge: false,
        view: false,
    };
    pub const BADGE: Self = Self {
        badge: true,
        view: false,
    };
    pub const ALL: Self = Self {
        badge: true,
        view: true,
    };
}

/// Result of a mutation: the cart as saved, plus the side effects to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub cart: Cart,
    pub refresh: Refresh,
    pub toast: Option<ToastNotice>,
}

/// A mutation failed.
#[derive(Debug, Error)]
pub enum MutationError<E: std::error::Error + 'static> {
    /// The mutation was rejected; nothing was written.
    #[error(transparent)]
    Rejected(#[from] CartError),

    /// The store could not be written.
    #[error("cart storage error: {0}")]
    Store(#[source] E),
}

/// Add `quantity` of `product` and persist.
///
/// On success the badge refreshes and an added-to-cart toast is produced.
///
/// # Errors
///
/// [`MutationError::Rejected`] when the id resolves to 0 or `quantity` is 0
/// (the store is not written); [`MutationError::Store`] when saving fails.
pub async fn add_item<S: CartStore>(
    store: &S,
    product: &ProductRef,
    quantity: u32,
) -> Result<CartUpdate, MutationError<S::Error>> {
    let mut cart = store.load().await;
    let added = cart.add(product, quantity)?;
    store.save(&cart).await.map_err(MutationError::Store)?;

    Ok(CartUpdate {
        cart,
        refresh: Refresh::BADGE,
        toast: Some(ToastNotice::added(&added)),
    })
}

/// Shift a line's quantity by `delta` (clamped at 1) and persist.
///
/// An unknown id is a no-op: nothing is written and nothing refreshes.
///
/// # Errors
///
/// Returns the store's error when saving fails.
pub async fn change_quantity<S: CartStore>(
    store: &S,
    id: ProductId,
    delta: i64,
) -> Result<CartUpdate, S::Error> {
    let mut cart = store.load().await;
    if !cart.change_quantity(id, delta) {
        return Ok(CartUpdate {
            cart,
            refresh: Refresh::NONE,
            toast: None,
        });
    }

    store.save(&cart).await?;
    Ok(CartUpdate {
        cart,
        refresh: Refresh::ALL,
        toast: None,
    })
}

/// Remove a line and persist.
///
/// Removing an absent id is not an error; the cart is written back unchanged
/// and the views still refresh.
///
/// # Errors
///
/// Returns the store's error when saving fails.
pub async fn remove_item<S: CartStore>(store: &S, id: ProductId) -> Result<CartUpdate, S::Error> {
    let mut cart = store.load().await;
    cart.remove(id);
    store.save(&cart).await?;

    Ok(CartUpdate {
        cart,
        refresh: Refresh::ALL,
        toast: None,
    })
}
