//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Plain form posts (no JavaScript) get a 303 redirect back to a page that
//! shows the new state.
//!
//! The cart itself is stored in the session; see [`crate::services::cart`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::cart::{CartUpdate, MutationError, Refresh, coerce_quantity};
use shopfront_core::toast::CONTAINER_ID;
use shopfront_core::{Cart, ProductId, ProductRef, ToastNotice};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::htmx::{CART_UPDATED_EVENT, HX_REDIRECT, HX_TRIGGER};
use crate::middleware::{CspNonce, HxRequest};
use crate::routes::PageChrome;
use crate::state::AppState;

/// Where plain form posts land after a cart change.
const CART_PAGE: &str = "/cart";

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartLineView {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: String,
    pub total: String,
    pub checkout_enabled: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let summary = cart.summary();
        Self {
            lines: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    id: item.id.get(),
                    title: item.title.clone(),
                    image: item.image.clone(),
                    unit_price: shopfront_core::Price::usd(item.price).to_string(),
                    quantity: item.quantity,
                    line_total: shopfront_core::Price::usd(item.line_total()).to_string(),
                })
                .collect(),
            item_count: summary.item_count,
            subtotal: summary.subtotal.to_string(),
            total: summary.total.to_string(),
            checkout_enabled: summary.checkout_enabled,
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Field names follow the loose product shape the cart accepts: `id` or
/// `productId`, `title` or `name`, `image` or `thumbnail`.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    pub id: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub quantity: Option<String>,
    /// Local path to continue to after adding (buy now).
    pub redirect: Option<String>,
}

impl AddToCartForm {
    #[must_use]
    pub fn product(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            product_id: self.product_id.clone(),
            title: self.title.clone(),
            name: self.name.clone(),
            price: self.price.clone(),
            image: self.image.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }

    /// Requested quantity: 1 when omitted, 0 (rejected) when unparsable.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
            .as_deref()
            .map_or(1, |raw| coerce_quantity(raw).unwrap_or(0))
    }

    /// The redirect target, if it is a path on this site.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref().and_then(local_path)
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub delta: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Accept only same-site absolute paths as redirect targets.
///
/// Control characters are refused since they cannot go into a header value.
fn local_path(target: &str) -> Option<&str> {
    let target = target.trim();
    (target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control))
    .then_some(target)
}

/// `HX-Trigger` header for a mutation's refresh set.
fn refresh_headers(refresh: Refresh) -> Vec<(&'static str, &'static str)> {
    if refresh.badge || refresh.view {
        vec![(HX_TRIGGER, CART_UPDATED_EVENT)]
    } else {
        Vec::new()
    }
}

/// A mutation that changed nothing.
fn unchanged(cart: Cart) -> CartUpdate {
    CartUpdate {
        cart,
        refresh: Refresh::NONE,
        toast: None,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Added-to-cart toast fragment template (for HTMX).
///
/// Appended to the shared `#cart-toast-container` in the layout.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_toast.html")]
pub struct CartToastTemplate {
    pub toast: Option<ToastNotice>,
    pub container_id: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    let cart = state.cart().load(&session).await;

    CartShowTemplate {
        chrome: PageChrome {
            cart_count: cart.total_quantity(),
            nonce: nonce.0,
        },
        cart: CartView::from(&cart),
    }
}

/// Cart items fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn items(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = state.cart().load(&session).await;
    CartItemsTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add item to cart.
///
/// HTMX requests get the toast fragment and a `cart-updated` trigger so the
/// badge reloads; with a `redirect` field they are sent on via `HX-Redirect`.
/// Plain posts are redirected to `redirect` or the cart page.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = form.product();
    let update = state
        .cart()
        .add(&session, &product, form.quantity())
        .await
        .map_err(|e| {
            if let MutationError::Rejected(reason) = &e {
                tracing::warn!(%reason, "Add to cart rejected");
            }
            AppError::from(e)
        })?;

    let product_id = product
        .resolve_id()
        .map(|id| id.to_string())
        .unwrap_or_default();
    add_breadcrumb("cart", "Added item", Some(&[("product_id", product_id.as_str())]));

    let redirect = form.redirect_target();

    if !is_htmx {
        return Ok(Redirect::to(redirect.unwrap_or(CART_PAGE)).into_response());
    }

    if let Some(target) = redirect {
        return Ok((
            AppendHeaders([(HX_TRIGGER, CART_UPDATED_EVENT), (HX_REDIRECT, target)]),
            (),
        )
            .into_response());
    }

    Ok((
        AppendHeaders(refresh_headers(update.refresh)),
        CartToastTemplate {
            toast: update.toast,
            container_id: CONTAINER_ID,
        },
    )
        .into_response())
}

/// Update cart item quantity by `delta`, never below 1.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let delta: i64 = form
        .delta
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Quantity change must be a whole number".to_string()))?;

    let update = match ProductId::coerce(&form.id) {
        Some(id) => state.cart().change_quantity(&session, id, delta).await?,
        None => unchanged(state.cart().load(&session).await),
    };

    Ok(cart_items_response(is_htmx, &update))
}

/// Remove item from cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let update = match ProductId::coerce(&form.id) {
        Some(id) => state.cart().remove(&session, id).await?,
        None => unchanged(state.cart().load(&session).await),
    };

    Ok(cart_items_response(is_htmx, &update))
}

fn cart_items_response(is_htmx: bool, update: &CartUpdate) -> Response {
    if !is_htmx {
        return Redirect::to(CART_PAGE).into_response();
    }

    (
        AppendHeaders(refresh_headers(update.refresh)),
        CartItemsTemplate {
            cart: CartView::from(&update.cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = state.cart().load(&session).await;
    CartCountTemplate {
        count: cart.total_quantity(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path() {
        assert_eq!(local_path("/cart"), Some("/cart"));
        assert_eq!(local_path(" /cart "), Some("/cart"));
        assert_eq!(local_path("//evil.example.com"), None);
        assert_eq!(local_path("https://evil.example.com"), None);
        assert_eq!(local_path("/\\evil.example.com"), None);
        assert_eq!(local_path(""), None);
        assert_eq!(local_path("/cart\u{1}"), None);
        assert_eq!(local_path("/cart\r\nX-Evil: 1"), None);
        assert_eq!(local_path("/cart\tx"), None);
    }

    #[test]
    fn test_form_quantity() {
        let mut form = AddToCartForm::default();
        assert_eq!(form.quantity(), 1);

        form.quantity = Some("3".to_string());
        assert_eq!(form.quantity(), 3);

        form.quantity = Some("abc".to_string());
        assert_eq!(form.quantity(), 0);

        form.quantity = Some("-2".to_string());
        assert_eq!(form.quantity(), 0);
    }

    #[test]
    fn test_form_product_coalesces_fields() {
        let form = AddToCartForm {
            product_id: Some("12".to_string()),
            name: Some("Desk Lamp".to_string()),
            price: Some("24.5".to_string()),
            thumbnail: Some("https://cdn.example.com/lamp.png".to_string()),
            ..AddToCartForm::default()
        };

        let product = form.product();
        assert_eq!(product.resolve_id(), ProductId::new(12));
        assert_eq!(product.resolved_title(), "Desk Lamp");
        assert_eq!(product.resolved_image(), "https://cdn.example.com/lamp.png");
    }

    #[test]
    fn test_refresh_headers() {
        assert!(refresh_headers(Refresh::NONE).is_empty());
        assert_eq!(
            refresh_headers(Refresh::BADGE),
            vec![("HX-Trigger", "cart-updated")]
        );
        assert_eq!(refresh_headers(Refresh::ALL).len(), 1);
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(&ProductRef::new(1, "Shirt", "19.99"), 2).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].unit_price, "$19.99");
        assert_eq!(view.lines[0].line_total, "$39.98");
        assert_eq!(view.subtotal, "$39.98");
        assert_eq!(view.total, "$39.98");
        assert_eq!(view.item_count, 2);
        assert!(view.checkout_enabled);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.lines.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.total, "$0.00");
        assert!(!view.checkout_enabled);
    }
}
