//! Cart line items and the loosely-typed product references they are built from.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::types::{ProductId, coerce_amount};

/// Title used when a product reference carries neither `title` nor `name`.
pub const UNTITLED_PRODUCT: &str = "Untitled Product";

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    /// Unit price. Stored as a JSON number, or as a string when no `f64`
    /// holds it exactly.
    #[serde(serialize_with = "price_as_number")]
    pub price: Decimal,
    pub image: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Rebuild an item from one persisted JSON entry.
    ///
    /// Missing fields fall back to the same defaults as a fresh add; a missing
    /// or non-positive quantity becomes 1. Entries whose id does not resolve
    /// are dropped.
    pub(crate) fn from_stored(value: &Value) -> Option<Self> {
        let product = ProductRef::from_json(value);
        let id = product.resolve_id()?;
        let quantity = value
            .get("quantity")
            .and_then(scalar_text)
            .and_then(|raw| coerce_quantity(&raw))
            .unwrap_or(1);

        Some(Self {
            id,
            title: product.resolved_title(),
            price: product.resolved_price(),
            image: product.resolved_image(),
            quantity,
        })
    }
}

fn price_as_number<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    match price.to_f64().filter(|value| exact_f64(*value, price)) {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&price.to_string()),
    }
}

/// Whether `value` reads back as exactly `price`.
fn exact_f64(value: f64, price: &Decimal) -> bool {
    Decimal::from_str(&value.to_string()).is_ok_and(|back| back == *price)
}

/// A reference to a product as supplied by a caller of the cart.
///
/// Every field is optional raw text; the `resolve_*`/`resolved_*` methods
/// apply the coalescing rules. A field that is present but blank counts as
/// absent.
///
/// | value | precedence                        | fallback             |
/// |-------|-----------------------------------|----------------------|
/// | id    | `id`, then `productId`            | rejected             |
/// | title | `title`, then `name`              | `"Untitled Product"` |
/// | price | `price`                           | `0`                  |
/// | image | `image`, then `thumbnail`         | `""`                 |
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductRef {
    pub id: Option<String>,
    #[serde(rename = "productId", alias = "product_id")]
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

impl ProductRef {
    /// Reference with just an id, title and price set.
    #[must_use]
    pub fn new(id: impl ToString, title: impl Into<String>, price: impl ToString) -> Self {
        Self {
            id: Some(id.to_string()),
            title: Some(title.into()),
            price: Some(price.to_string()),
            ..Self::default()
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Read a reference out of a JSON object, accepting numbers or strings
    /// for every field.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(scalar_text);
        Self {
            id: field("id"),
            product_id: field("productId"),
            title: field("title"),
            name: field("name"),
            price: field("price"),
            image: field("image"),
            thumbnail: field("thumbnail"),
        }
    }

    /// Canonical id, or `None` when it resolves to 0.
    ///
    /// `productId` is consulted only when `id` is absent or blank, not when
    /// `id` is present but invalid.
    #[must_use]
    pub fn resolve_id(&self) -> Option<ProductId> {
        first_present(&[&self.id, &self.product_id]).and_then(ProductId::coerce)
    }

    #[must_use]
    pub fn resolved_title(&self) -> String {
        first_present(&[&self.title, &self.name])
            .unwrap_or(UNTITLED_PRODUCT)
            .to_string()
    }

    #[must_use]
    pub fn resolved_price(&self) -> Decimal {
        first_present(&[&self.price])
            .and_then(coerce_amount)
            .unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn resolved_image(&self) -> String {
        first_present(&[&self.image, &self.thumbnail])
            .unwrap_or_default()
            .to_string()
    }
}

/// Coerce a requested quantity. Blank, non-numeric or non-positive input
/// yields `None`.
#[must_use]
pub fn coerce_quantity(raw: &str) -> Option<u32> {
    ProductId::coerce(raw).map(ProductId::get)
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
