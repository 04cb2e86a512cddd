//! Catalog API response types.
//!
//! Only the fields the storefront renders are modelled; everything else in
//! the payload is ignored. Missing fields fall back to their defaults so a
//! sparse product still renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use shopfront_core::listing::ListingProduct;
use shopfront_core::rating::StarRating;
use shopfront_core::{Price, ProductId, coerce_amount};

/// A product as returned by `GET /products/{id}` or inside a product list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "price_amount")]
    pub price: Decimal,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A customer review embedded in a product detail.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub reviewer_name: String,
}

/// One page of products plus the overall total.
///
/// The category endpoint returns the same envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub fn price(&self) -> Price {
        Price::usd(self.price)
    }

    /// First gallery image, or empty when the product has none.
    #[must_use]
    pub fn main_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn stars(&self) -> StarRating {
        StarRating::from_rating(self.rating)
    }

    /// The product as a listing card sees it.
    #[must_use]
    pub fn to_listing(&self) -> ListingProduct {
        ListingProduct {
            id: self.id,
            name: self.title.clone(),
            price: self.price,
            category: self.category.clone(),
            image: self.thumbnail.clone(),
            in_stock: self.in_stock(),
        }
    }
}

/// Accept prices as JSON numbers or numeric strings; anything else is 0.
fn price_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(number) => coerce_amount(&number.to_string()),
        Value::String(text) => coerce_amount(&text),
        _ => None,
    };
    Ok(amount.unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "A popular mascara.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "images": ["https://cdn.dummyjson.com/products/1/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/1/thumbnail.png",
        "reviews": [
            {
                "rating": 2,
                "comment": "Very unhappy with my purchase!",
                "date": "2024-05-23T08:56:21.618Z",
                "reviewerName": "John Doe",
                "reviewerEmail": "john.doe@x.dummyjson.com"
            }
        ]
    }"#;

    #[test]
    fn test_product_deserialize() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();

        assert_eq!(product.id.get(), 1);
        assert_eq!(product.price, Decimal::from_str("9.99").unwrap());
        assert_eq!(product.stock, 5);
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.reviews[0].reviewer_name, "John Doe");
        assert_eq!(
            product.main_image(),
            "https://cdn.dummyjson.com/products/1/1.png"
        );
        assert_eq!(product.price().with_code(), "$9.99 USD");
    }

    #[test]
    fn test_sparse_product_uses_defaults() {
        let product: Product = serde_json::from_str(r#"{"id": 7}"#).unwrap();

        assert_eq!(product.price, Decimal::ZERO);
        assert!(!product.in_stock());
        assert_eq!(product.main_image(), "");
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn test_price_as_string() {
        let product: Product = serde_json::from_str(r#"{"id": 2, "price": "12.5"}"#).unwrap();
        assert_eq!(product.price, Decimal::from_str("12.5").unwrap());

        let product: Product = serde_json::from_str(r#"{"id": 2, "price": null}"#).unwrap();
        assert_eq!(product.price, Decimal::ZERO);
    }

    #[test]
    fn test_zero_id_is_rejected() {
        assert!(serde_json::from_str::<Product>(r#"{"id": 0}"#).is_err());
    }

    #[test]
    fn test_product_page() {
        let json = format!(r#"{{"products": [{PRODUCT_JSON}], "total": 194, "skip": 0, "limit": 12}}"#);
        let page: ProductPage = serde_json::from_str(&json).unwrap();

        assert_eq!(page.total, 194);
        assert_eq!(page.products.len(), 1);

        let listing = page.products[0].to_listing();
        assert_eq!(listing.name, "Essence Mascara Lash Princess");
        assert!(listing.in_stock);
        assert_eq!(
            listing.image,
            "https://cdn.dummyjson.com/products/1/thumbnail.png"
        );
    }

    #[test]
    fn test_category_envelope() {
        let page: ProductPage =
            serde_json::from_str(r#"{"products": [{"id": 3, "title": "Lipstick"}]}"#).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.products[0].title, "Lipstick");
    }
}
