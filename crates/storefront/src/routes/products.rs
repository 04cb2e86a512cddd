//! Product route handlers.
//!
//! The listing fetches one catalog page at a time; search and sort apply to
//! that page only. The detail page renders immediately and pulls related
//! products as a separate HTMX fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::ProductId;
use shopfront_core::listing::{self, ListingProduct, Pagination, SortKey};
use shopfront_core::rating::StarRating;

use crate::catalog::{CatalogError, Product, Review};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::{CspNonce, HxRequest};
use crate::routes::PageChrome;
use crate::state::AppState;

/// Shown in place of the grid when the catalog page cannot be fetched.
pub const LISTING_ERROR: &str = "Failed to load products. Please try again later.";

/// Shown as the detail page title when the product cannot be fetched.
pub const PRODUCT_ERROR: &str = "Failed to load product.";

/// Shown in place of the related grid when it cannot be fetched.
pub const RELATED_ERROR: &str = "Failed to load related products.";

/// Related products shown below a product.
const RELATED_LIMIT: usize = 4;

/// Seed comments shown on every product until real ones exist.
const SEED_COMMENTS: [SeedComment; 3] = [
    SeedComment {
        author: "Customer1",
        body: "Can you provide more info about this product?",
    },
    SeedComment {
        author: "Customer2",
        body: "Can you provide more info about this product?",
    },
    SeedComment {
        author: "Customer3",
        body: "Can you provide more info about this product?",
    },
];

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for templates.
#[derive(Clone, Debug)]
pub struct ProductCardView {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub image: String,
    /// Display price, e.g. `$9.99 USD`.
    pub price: String,
    /// Plain amount posted with add-to-cart, e.g. `9.99`.
    pub amount: String,
    pub in_stock: bool,
}

impl From<&ListingProduct> for ProductCardView {
    fn from(product: &ListingProduct) -> Self {
        let price = shopfront_core::Price::usd(product.price);
        Self {
            id: product.id.get(),
            title: product.name.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: price.with_code(),
            amount: price.fixed(),
            in_stock: product.in_stock,
        }
    }
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self::from(&product.to_listing())
    }
}

/// A numbered pagination link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub active: bool,
}

/// Pagination controls for the listing.
#[derive(Clone, Debug, Default)]
pub struct PaginationView {
    pub visible: bool,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLink>,
}

impl PaginationView {
    fn new(pagination: &Pagination, keyword: &str, sort: SortKey) -> Self {
        let href = |page: u32| page_href(page, keyword, sort);
        Self {
            visible: pagination.is_visible(),
            prev_href: pagination
                .has_prev()
                .then(|| href(pagination.current - 1)),
            next_href: pagination
                .has_next()
                .then(|| href(pagination.current + 1)),
            pages: pagination
                .window()
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    active: number == pagination.current,
                })
                .collect(),
        }
    }
}

/// Everything the product grid renders.
#[derive(Clone, Debug, Default)]
pub struct ListingView {
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
    pub pagination: PaginationView,
    pub keyword: String,
    pub sort: &'static str,
}

impl ListingView {
    /// `Showing N products`, counting only what survived the search.
    #[must_use]
    pub fn count_line(&self) -> String {
        format!("Showing {} products", self.products.len())
    }
}

/// A review as shown in the reviews tab.
#[derive(Clone, Debug)]
pub struct ReviewView {
    pub reviewer: String,
    pub stars: Vec<&'static str>,
    pub comment: String,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            reviewer: review.reviewer_name.clone(),
            stars: star_classes(StarRating::from_rating(review.rating)),
            comment: review.comment.clone(),
            // "2024-05-23T08:56:21.618Z" -> "2024-05-23"
            date: review.date.split('T').next().unwrap_or_default().to_string(),
        }
    }
}

/// A static comment in the comments tab.
#[derive(Clone, Copy, Debug)]
pub struct SeedComment {
    pub author: &'static str,
    pub body: &'static str,
}

/// Product detail display data for templates.
#[derive(Clone, Debug)]
pub struct ProductDetailView {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub price: String,
    pub amount: String,
    pub stock: u32,
    pub in_stock: bool,
    pub description: String,
    pub main_image: String,
    pub images: Vec<String>,
    pub stars: Vec<&'static str>,
    pub reviews: Vec<ReviewView>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let price = product.price();
        Self {
            id: product.id.get(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: price.with_code(),
            amount: price.fixed(),
            stock: product.stock,
            in_stock: product.in_stock(),
            description: product.description.clone(),
            main_image: product.main_image().to_string(),
            images: product.images.clone(),
            stars: star_classes(product.stars()),
            reviews: product.reviews.iter().map(ReviewView::from).collect(),
        }
    }
}

/// CSS classes for each of the five stars.
#[must_use]
pub fn star_classes(rating: StarRating) -> Vec<&'static str> {
    let mut stars = vec!["star"; usize::from(rating.full)];
    if rating.half {
        stars.push("star half");
    }
    stars.extend(std::iter::repeat_n("star empty", usize::from(rating.empty)));
    stars
}

// =============================================================================
// Query Types
// =============================================================================

/// Listing query parameters. Unparsable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    /// Requested page, at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        self.q.as_deref().map_or("", str::trim)
    }

    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort.as_deref().map_or_else(SortKey::default, SortKey::parse)
    }
}

/// Listing URL for `page`, preserving the search and sort.
#[must_use]
pub fn page_href(page: u32, keyword: &str, sort: SortKey) -> String {
    let mut href = format!("/products?page={page}&sort={}", sort.as_str());
    if !keyword.is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(keyword));
    }
    href
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub chrome: PageChrome,
    pub listing: ListingView,
}

/// Product grid fragment template (for HTMX search and sort).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub listing: ListingView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub chrome: PageChrome,
    pub product: Option<ProductDetailView>,
    pub comments: &'static [SeedComment],
    pub error: &'static str,
}

/// Related products fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/related_products.html")]
pub struct RelatedProductsTemplate {
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product listing page.
///
/// HTMX requests (search box, sort menu) get just the grid.
#[instrument(skip(state, session, nonce))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<ListingQuery>,
) -> Response {
    let listing = load_listing(&state, &query).await;

    if is_htmx {
        return ProductGridTemplate { listing }.into_response();
    }

    ProductsIndexTemplate {
        chrome: PageChrome::load(&state, &session, nonce).await,
        listing,
    }
    .into_response()
}

async fn load_listing(state: &AppState, query: &ListingQuery) -> ListingView {
    let per_page = state.config().pages.products_per_page;
    let page = query.page();
    let keyword = query.keyword();
    let sort = query.sort_key();

    match state
        .catalog()
        .list_products(per_page, listing::skip_for(page, per_page))
        .await
    {
        Ok(result) => {
            let products: Vec<ListingProduct> =
                result.products.iter().map(Product::to_listing).collect();
            let shown = listing::filter_and_sort(&products, keyword, sort);
            let pagination = Pagination::new(page, listing::total_pages(result.total, per_page));

            ListingView {
                products: shown.iter().map(ProductCardView::from).collect(),
                error: None,
                pagination: PaginationView::new(&pagination, keyword, sort),
                keyword: keyword.to_string(),
                sort: sort.as_str(),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, page, "Failed to load products");
            ListingView {
                error: Some(LISTING_ERROR),
                keyword: keyword.to_string(),
                sort: sort.as_str(),
                ..ListingView::default()
            }
        }
    }
}

/// Display product detail page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Path(id): Path<String>,
) -> Response {
    let (status, product) = match ProductId::coerce(&id) {
        Some(product_id) => match state.catalog().get_product(product_id).await {
            Ok(product) => {
                let id_text = product_id.to_string();
                add_breadcrumb(
                    "navigation",
                    "Viewed product page",
                    Some(&[("product_id", id_text.as_str())]),
                );
                (StatusCode::OK, Some(ProductDetailView::from(&product)))
            }
            Err(CatalogError::NotFound(_)) => (StatusCode::NOT_FOUND, None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load product");
                (StatusCode::BAD_GATEWAY, None)
            }
        },
        None => (StatusCode::NOT_FOUND, None),
    };

    let template = ProductShowTemplate {
        chrome: PageChrome::load(&state, &session, nonce).await,
        product,
        comments: &SEED_COMMENTS,
        error: PRODUCT_ERROR,
    };

    (status, template).into_response()
}

/// Related products fragment (HTMX).
///
/// Other products in the same category, excluding this one.
#[instrument(skip(state))]
pub async fn related(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match load_related(&state, &id).await {
        Ok(products) => RelatedProductsTemplate {
            products,
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load related products");
            RelatedProductsTemplate {
                products: Vec::new(),
                error: Some(RELATED_ERROR),
            }
        }
    }
}

async fn load_related(state: &AppState, raw_id: &str) -> Result<Vec<ProductCardView>, CatalogError> {
    let id = ProductId::coerce(raw_id)
        .ok_or_else(|| CatalogError::NotFound(format!("product {raw_id}")))?;
    let product = state.catalog().get_product(id).await?;
    let in_category = state
        .catalog()
        .products_in_category(&product.category)
        .await?;

    Ok(in_category
        .iter()
        .filter(|candidate| candidate.id != id)
        .take(RELATED_LIMIT)
        .map(ProductCardView::from)
        .collect())
}
