//! Catalog API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP and caches responses with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::ProductId;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::types::{Product, ProductPage};
use crate::config::CatalogConfig;

const MAX_CACHE_ENTRIES: u64 = 1000;

/// Longest slice of an error body written to the log.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote product catalog.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, limit: u32, skip: u64) -> Result<ProductPage, CatalogError> {
        let cache_key = CacheKey::Products { limit, skip };

        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());

        let page: ProductPage = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let product: Product = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get every product in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let cache_key = CacheKey::Category(category.to_string());

        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(page.products);
        }

        let url = self.endpoint(&["products", "category", category])?;
        let page: ProductPage = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;

        Ok(page.products)
    }
}
