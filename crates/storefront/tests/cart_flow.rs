//! Cart flows through the HTTP surface: HTMX fragments, plain form
//! redirects and the session-backed store.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::{StatusCode, header};

use common::{TestApp, body_text, header_value};

const SHIRT: &str = "id=1&title=Shirt&price=19.99&quantity=2";

#[tokio::test]
async fn test_add_to_empty_cart_returns_toast_and_trigger() {
    let mut app = TestApp::new().await;

    let response = app.post_htmx("/cart/add", SHIRT).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(response.headers(), "hx-trigger"), "cart-updated");
    let body = body_text(response).await;
    assert!(body.contains("hx-swap-oob=\"beforeend:#cart-toast-container\""));
    assert!(body.contains("Added to cart"));
    assert!(body.contains("Shirt"));
    assert!(body.contains("Qty 2"));
    assert!(body.contains("$19.99"));
    assert!(body.contains("data-visible-ms=\"3000\""));
    assert!(body.contains("data-exit-ms=\"400\""));
}

#[tokio::test]
async fn test_cart_page_shows_line_and_totals() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let response = app.get("/cart").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Shirt"));
    assert!(body.contains("<span class=\"qty\">2</span>"));
    assert!(body.contains("<span id=\"cart-subtotal\">$39.98</span>"));
    assert!(body.contains("<span id=\"cart-total\">$39.98</span>"));
    assert!(!body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_cart_persists_across_requests_in_session() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;
    app.post_htmx("/cart/add", "id=1&title=Shirt&price=19.99&quantity=3")
        .await;

    let body = body_text(app.get_htmx("/cart/items").await).await;
    assert!(body.contains("<span class=\"qty\">5</span>"));
    assert!(body.contains("$99.95"));
}

#[tokio::test]
async fn test_count_badge_reflects_total_quantity() {
    let mut app = TestApp::new().await;

    let empty = body_text(app.get_htmx("/cart/count").await).await;
    assert!(empty.contains(">0</span>"));

    app.post_htmx("/cart/add", SHIRT).await;
    app.post_htmx("/cart/add", "id=2&title=Hat&price=5&quantity=1")
        .await;

    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains("hx-trigger=\"cart-updated from:body\""));
    assert!(body.contains(">3</span>"));
}

#[tokio::test]
async fn test_add_accepts_alternate_field_names() {
    let mut app = TestApp::new().await;

    let response = app
        .post_htmx("/cart/add", "productId=7&name=Desk%20Lamp&price=12&quantity=1")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(app.get_htmx("/cart/items").await).await;
    assert!(body.contains("Desk Lamp"));
    assert!(body.contains("$12.00"));
}

#[tokio::test]
async fn test_add_without_id_is_rejected() {
    let mut app = TestApp::new().await;

    let response = app
        .post_htmx("/cart/add", "title=Shirt&price=19.99&quantity=1")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.post_htmx("/cart/add", "id=0&title=Shirt").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains(">0</span>"));
}

#[tokio::test]
async fn test_add_with_zero_quantity_is_rejected() {
    let mut app = TestApp::new().await;

    let response = app
        .post_htmx("/cart/add", "id=1&title=Shirt&price=19.99&quantity=0")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plain_add_redirects_to_cart() {
    let mut app = TestApp::new().await;

    let response = app.post_plain("/cart/add", SHIRT).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(response.headers(), "location"), "/cart");
}

#[tokio::test]
async fn test_buy_now_redirects_after_adding() {
    let mut app = TestApp::new().await;

    let response = app
        .post_htmx("/cart/add", "id=1&title=Shirt&price=19.99&quantity=1&redirect=%2Fcart")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(response.headers(), "hx-redirect"), "/cart");

    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains(">1</span>"));
}

#[tokio::test]
async fn test_offsite_redirect_is_ignored() {
    let mut app = TestApp::new().await;

    let response = app
        .post_plain("/cart/add", "id=1&title=Shirt&price=1&redirect=%2F%2Fevil.example.com")
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(response.headers(), "location"), "/cart");
}

#[tokio::test]
async fn test_control_characters_in_redirect_are_ignored() {
    let mut app = TestApp::new().await;

    let response = app
        .post_htmx("/cart/add", "id=1&title=Shirt&price=1&redirect=%2Fcart%01")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("hx-redirect").is_none());

    let response = app
        .post_plain("/cart/add", "id=1&title=Shirt&price=1&redirect=%2Fcart%0D%0AX-Evil%3A%201")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(response.headers(), "location"), "/cart");

    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains(">2</span>"));
}

#[tokio::test]
async fn test_decrement_clamps_at_one() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let response = app.post_htmx("/cart/update", "id=1&delta=-5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<span class=\"qty\">1</span>"));
    assert!(body.contains("<span id=\"cart-total\">$19.99</span>"));
}

#[tokio::test]
async fn test_increment_updates_totals() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let response = app.post_htmx("/cart/update", "id=1&delta=1").await;

    assert_eq!(header_value(response.headers(), "hx-trigger"), "cart-updated");
    let body = body_text(response).await;
    assert!(body.contains("<span class=\"qty\">3</span>"));
    assert!(body.contains("$59.97"));
}

#[tokio::test]
async fn test_update_unknown_item_changes_nothing() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let response = app.post_htmx("/cart/update", "id=99&delta=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("hx-trigger").is_none());
    let body = body_text(response).await;
    assert!(body.contains("<span class=\"qty\">2</span>"));
}

#[tokio::test]
async fn test_update_with_non_numeric_delta_is_rejected() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let response = app.post_htmx("/cart/update", "id=1&delta=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let first = app.post_htmx("/cart/remove", "id=1").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_text(first).await;
    assert!(first_body.contains("Your cart is empty"));
    assert!(first_body.contains("<span id=\"cart-total\">$0.00</span>"));
    assert!(first_body.contains("id=\"checkout-button\" class=\"btn btn-primary\" disabled"));

    let second = app.post_htmx("/cart/remove", "id=1").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_text(second).await, first_body);
}

#[tokio::test]
async fn test_plain_update_and_remove_redirect_to_cart() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let update = app.post_plain("/cart/update", "id=1&delta=1").await;
    assert_eq!(update.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(update.headers(), "location"), "/cart");

    let remove = app.post_plain("/cart/remove", "id=1").await;
    assert_eq!(remove.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_sessions_do_not_share_carts() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    app.forget_session();
    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains(">0</span>"));
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let mut app = TestApp::new().await;

    let response = app.post_htmx("/cart/add", SHIRT).await;

    let cookie = header_value(response.headers(), header::SET_COOKIE.as_str()).to_string();
    assert!(cookie.starts_with("shopfront_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_adds_in_one_session_all_land() {
    let mut app = TestApp::new().await;
    app.post_htmx("/cart/add", SHIRT).await;

    let handles: Vec<_> = (2..=9)
        .map(|id| app.spawn_post_htmx("/cart/add", &format!("id={id}&title=Item&price=1&quantity=1")))
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().status(), StatusCode::OK);
    }

    let body = body_text(app.get_htmx("/cart/count").await).await;
    assert!(body.contains(">10</span>"));
}
