//! Shared helpers for storefront integration tests.
//!
//! Each test builds its own router over an in-memory session store and a
//! throwaway catalog server serving DummyJSON-shaped fixtures.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{HeaderMap, Request, StatusCode, header},
    response::Response,
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;

use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::middleware::create_session_layer;
use shopfront_storefront::state::AppState;
use shopfront_storefront::{app, db};

/// Catalog fixtures: two beauty products (one out of stock) and a lamp.
pub fn fixtures() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Essence Mascara",
            "description": "Volumizing mascara.",
            "category": "beauty",
            "price": 9.99,
            "rating": 4.5,
            "stock": 5,
            "images": ["https://cdn.dummyjson.com/mascara/1.png", "https://cdn.dummyjson.com/mascara/2.png"],
            "thumbnail": "https://cdn.dummyjson.com/mascara/thumb.png",
            "reviews": [
                {
                    "rating": 5,
                    "comment": "Very happy!",
                    "date": "2024-05-23T08:56:21.618Z",
                    "reviewerName": "Ada Lovelace"
                }
            ]
        }),
        json!({
            "id": 2,
            "title": "Eyeshadow Palette",
            "description": "Twelve shades.",
            "category": "beauty",
            "price": "19.5",
            "rating": 3.2,
            "stock": 0,
            "images": [],
            "thumbnail": "https://cdn.dummyjson.com/palette/thumb.png",
            "reviews": []
        }),
        json!({
            "id": 3,
            "title": "Annibale Lamp",
            "description": "A desk lamp.",
            "category": "home-decoration",
            "price": 24,
            "rating": 4.0,
            "stock": 8,
            "images": ["https://cdn.dummyjson.com/lamp/1.png"],
            "thumbnail": "https://cdn.dummyjson.com/lamp/thumb.png",
            "reviews": []
        }),
    ]
}

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let all = fixtures();
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(30);
    let skip = params
        .get("skip")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let products: Vec<Value> = all.iter().skip(skip).take(limit).cloned().collect();

    Json(json!({
        "products": products,
        "total": all.len(),
        "skip": skip,
        "limit": limit,
    }))
}

async fn get_product(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    fixtures()
        .into_iter()
        .find(|product| product["id"].to_string() == id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn products_in_category(Path(category): Path<String>) -> Json<Value> {
    let products: Vec<Value> = fixtures()
        .into_iter()
        .filter(|product| product["category"] == category.as_str())
        .collect();
    let total = products.len();
    Json(json!({ "products": products, "total": total, "skip": 0, "limit": 0 }))
}

/// Start the fake catalog and return its base URL.
pub async fn spawn_catalog() -> Url {
    let router = Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/category/{category}", get(products_in_category));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Url::parse(&format!("http://{addr}")).unwrap()
}

/// A catalog URL nothing listens on.
pub async fn unreachable_catalog() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// A storefront router plus the session cookie it handed out.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront backed by the fake catalog.
    pub async fn new() -> Self {
        Self::with_catalog(spawn_catalog().await).await
    }

    pub async fn with_catalog(catalog_url: Url) -> Self {
        let mut config = StorefrontConfig::with_defaults().unwrap();
        config.catalog.base_url = catalog_url;

        let pool = db::create_pool(&secrecy::SecretString::from("sqlite::memory:"))
            .await
            .unwrap();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, pool).unwrap();

        Self {
            router: app(state, session_layer),
            cookie: None,
        }
    }

    /// Send a request, carrying the session cookie across calls.
    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        response
    }

    /// POST a form as HTMX would on a spawned task, for overlapping requests.
    ///
    /// The current cookie is sent but any cookie in the reply is not kept.
    pub fn spawn_post_htmx(&self, uri: &str, form: &str) -> tokio::task::JoinHandle<Response> {
        let mut request = form_request(uri, form, true);
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }
        let router = self.router.clone();
        tokio::spawn(async move { router.oneshot(request).await.unwrap() })
    }

    /// Drop the session cookie, as a new visitor would arrive.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_htmx(&mut self, uri: &str) -> Response {
        self.send(
            Request::get(uri)
                .header("hx-request", "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST a form as HTMX would.
    pub async fn post_htmx(&mut self, uri: &str, form: &str) -> Response {
        self.send(form_request(uri, form, true)).await
    }

    /// POST a form without JavaScript.
    pub async fn post_plain(&mut self, uri: &str, form: &str) -> Response {
        self.send(form_request(uri, form, false)).await
    }
}

fn form_request(uri: &str, form: &str, htmx: bool) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if htmx {
        builder = builder.header("hx-request", "true");
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Value of a response header, or empty.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
