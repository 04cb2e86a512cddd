//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Cart lock (one state-changing request per session at a time)
//! 5. Session layer (tower-sessions with `SQLite` store)
//! 6. CSP nonce (generate per-request nonce for inline scripts)
//! 7. Security headers (CSP, frame options, etc.)

pub mod cart_lock;
pub mod csp;
pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use cart_lock::cart_lock_middleware;
pub use csp::{CspNonce, csp_nonce_middleware};
pub use htmx::HxRequest;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, create_session_store};
