//! Catalog product identifiers.
//!
//! Product ids arrive from loosely-typed sources (form fields, persisted
//! JSON, catalog payloads). [`ProductId::coerce`] is the single place where
//! such input becomes a canonical id.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A positive catalog product id.
///
/// The value `0` never appears inside a `ProductId`: input that would resolve
/// to zero (missing, blank, non-numeric, fractional, negative) yields `None`
/// from the constructors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProductId(u32);

impl ProductId {
    /// Create an id from a raw integer. Returns `None` for zero.
    #[must_use]
    pub const fn new(id: u32) -> Option<Self> {
        if id == 0 { None } else { Some(Self(id)) }
    }

    /// Get the underlying integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Coerce free-form text into an id.
    ///
    /// Accepts plain integers (`"12"`, `" 12 "`) and integral decimal or
    /// exponent notation (`"12.0"`, `"1e2"`). Anything else resolves to
    /// `None`.
    #[must_use]
    pub fn coerce(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(id) = trimmed.parse::<u32>() {
            return Self::new(id);
        }

        let value = trimmed.parse::<f64>().ok()?;
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX)
        {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above
        Self::new(value as u32)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for ProductId {
    type Error = InvalidProductId;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(InvalidProductId)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A product id of zero was supplied where a real id is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("product id must be a positive integer")]
pub struct InvalidProductId;
