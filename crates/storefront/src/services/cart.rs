//! Session-backed cart.
//!
//! The cart lives in the visitor's session record under [`session_keys::CART`]
//! as a JSON string. Every operation reloads it from the session, so nothing
//! is cached between requests.
//!
//! The server handles requests concurrently, and two requests for the same
//! session would otherwise race on the load/save pair. [`CartLocks`] holds a
//! per-session mutex; the cart lock middleware keeps it for the whole request
//! so the session layer's trailing record write is covered too.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::Session;
use tracing::{instrument, warn};

use shopfront_core::cart::{self, CartUpdate, MutationError, decode_cart, encode_cart};
use shopfront_core::{Cart, CartStore, ProductId, ProductRef};

use crate::models::session_keys;

/// How long an unused session lock is kept.
const LOCK_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const MAX_TRACKED_SESSIONS: u64 = 100_000;

/// Errors writing the cart into the session.
#[derive(Debug, Error)]
pub enum SessionCartError {
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

// =============================================================================
// SessionCartStore
// =============================================================================

/// [`CartStore`] over a tower-sessions [`Session`].
#[derive(Debug, Clone)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore {
    type Error = SessionCartError;

    async fn load(&self) -> Cart {
        let raw = match self.session.get::<String>(session_keys::CART).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart from session, using empty cart");
                return Cart::new();
            }
        };

        decode_cart(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored cart is malformed, using empty cart");
            Cart::new()
        })
    }

    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        let raw = encode_cart(cart)?;
        self.session.insert(session_keys::CART, raw).await?;
        // The record must be in the session store before the caller releases
        // its lock.
        self.session.save().await?;
        Ok(())
    }
}

// =============================================================================
// CartLocks
// =============================================================================

/// Per-session async mutexes, dropped after a period of inactivity.
#[derive(Clone)]
pub struct CartLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl CartLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder()
                .max_capacity(MAX_TRACKED_SESSIONS)
                .time_to_idle(LOCK_IDLE_TIMEOUT)
                .build(),
        }
    }

    /// Wait for exclusive access to the cart of `session_key`.
    pub async fn acquire(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(session_key.to_string(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for CartLocks {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations for a request's session.
#[derive(Clone, Default)]
pub struct CartService {
    locks: CartLocks,
}

impl CartService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-session locks held by the cart lock middleware.
    #[must_use]
    pub const fn locks(&self) -> &CartLocks {
        &self.locks
    }

    /// Current cart of the session.
    pub async fn load(&self, session: &Session) -> Cart {
        SessionCartStore::new(session.clone()).load().await
    }

    /// Add `quantity` of `product` to the session's cart.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Rejected` for an unresolvable id or a zero
    /// quantity, `MutationError::Store` if the session cannot be written.
    #[instrument(skip(self, session, product), fields(product_id = ?product.resolve_id()))]
    pub async fn add(
        &self,
        session: &Session,
        product: &ProductRef,
        quantity: u32,
    ) -> Result<CartUpdate, MutationError<SessionCartError>> {
        cart::add_item(&SessionCartStore::new(session.clone()), product, quantity).await
    }

    /// Shift the quantity of line `id` by `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self, session))]
    pub async fn change_quantity(
        &self,
        session: &Session,
        id: ProductId,
        delta: i64,
    ) -> Result<CartUpdate, SessionCartError> {
        cart::change_quantity(&SessionCartStore::new(session.clone()), id, delta).await
    }

    /// Remove line `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self, session))]
    pub async fn remove(
        &self,
        session: &Session,
        id: ProductId,
    ) -> Result<CartUpdate, SessionCartError> {
        cart::remove_item(&SessionCartStore::new(session.clone()), id).await
    }
}
