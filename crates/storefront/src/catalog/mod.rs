//! Remote product catalog client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest` against a DummyJSON-compatible API
//! - The catalog is the source of truth for products; nothing is stored locally
//! - In-memory caching via `moka` for API responses (5 minute TTL by default)
//!
//! # Endpoints
//!
//! ```text
//! GET /products?limit=&skip=        page of products with the overall total
//! GET /products/{id}                product detail
//! GET /products/category/{category} every product in a category
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let page = client.list_products(12, 0).await?;
//! let product = client.get_product(page.products[0].id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::{Product, ProductPage, Review};

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot carry a path.
    #[error("Invalid catalog URL: {0}")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 999".to_string());
        assert_eq!(err.to_string(), "Not found: product 999");

        let err = CatalogError::Status(503);
        assert_eq!(err.to_string(), "Catalog returned HTTP 503");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let parse_err = serde_json::from_str::<ProductPage>("{").unwrap_err();
        let err = CatalogError::from(parse_err);
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
