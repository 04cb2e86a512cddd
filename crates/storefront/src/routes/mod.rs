//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (popular products, newsletter)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Products
//! GET  /products               - Product listing (?page=&q=&sort=name|price)
//! GET  /products/{id}          - Product detail
//! GET  /products/{id}/related  - Related products fragment (HTMX)
//!
//! # Cart (HTMX fragments, redirects for plain forms)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart items fragment
//! POST /cart/add               - Add to cart (returns toast, triggers cart-updated)
//! POST /cart/update            - Change quantity (returns cart items fragment)
//! POST /cart/remove            - Remove item (returns cart items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Newsletter
//! POST /newsletter             - Subscribe (acknowledgement fragment)
//! ```

pub mod cart;
pub mod health;
pub mod home;
pub mod newsletter;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::CspNonce;
use crate::state::AppState;

/// Data every full page needs for the shared layout.
#[derive(Clone, Debug, Default)]
pub struct PageChrome {
    /// Badge value in the header.
    pub cart_count: u64,
    /// CSP nonce for the inline bootstrap script.
    pub nonce: String,
}

impl PageChrome {
    /// Build the layout data for the current request.
    pub async fn load(state: &AppState, session: &Session, nonce: CspNonce) -> Self {
        Self {
            cart_count: state.cart().load(session).await.total_quantity(),
            nonce: nonce.0,
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Newsletter
        .route("/newsletter", post(newsletter::subscribe))
}
