//! HTMX request detection and response headers.

use axum::{extract::FromRequestParts, http::request::Parts};

/// Request header HTMX sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Response header that fires client-side events after the swap.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Response header that makes HTMX navigate to a new page.
pub const HX_REDIRECT: &str = "HX-Redirect";

/// Event that tells the badge and cart views to reload.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Whether the request came from HTMX and expects a fragment.
///
/// ```ignore
/// async fn handler(HxRequest(is_htmx): HxRequest) -> Response {
///     if is_htmx { fragment().into_response() } else { Redirect::to("/cart").into_response() }
/// }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        Ok(Self(is_htmx))
    }
}
