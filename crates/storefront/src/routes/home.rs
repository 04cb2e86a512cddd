//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::PageChrome;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Shown in place of the popular grid when the catalog cannot be reached.
pub const POPULAR_ERROR: &str = "Failed to load popular products.";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    /// First catalog page, up to the configured popular limit.
    pub popular: Vec<ProductCardView>,
    pub popular_error: Option<&'static str>,
}

/// Display the home page.
#[instrument(skip(state, session, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    let limit = state.config().pages.popular_products_limit;

    let (popular, popular_error) = state.catalog().list_products(limit, 0).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch popular products: {e}");
            (Vec::new(), Some(POPULAR_ERROR))
        },
        |page| {
            (
                page.products.iter().map(ProductCardView::from).collect(),
                None,
            )
        },
    );

    HomeTemplate {
        chrome: PageChrome::load(&state, &session, nonce).await,
        popular,
        popular_error,
    }
}
