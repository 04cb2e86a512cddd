//! Per-session serialization of state-changing requests.
//!
//! tower-sessions writes the session record back after the handler returns,
//! so a lock taken inside the handler is released before that write lands.
//! This middleware sits outside the session layer and holds the session's
//! lock until the response, and with it the record write, is complete.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::Cookie;

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Session id carried by the request's session cookie, if any.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Run unsafe-method requests of one session one at a time.
///
/// Requests without a session cookie get a fresh session, which no other
/// request can share, so they are not locked.
pub async fn cart_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method().is_safe() {
        return next.run(request).await;
    }

    let Some(key) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let _guard = state.cart().locks().acquire(&key).await;
    next.run(request).await
}
