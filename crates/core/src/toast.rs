//! Added-to-cart notifications.
//!
//! A [`ToastNotice`] is what the browser shows after an add: title, quantity,
//! price and a thumbnail. The element is visible for [`VISIBLE_MS`], then
//! plays an exit transition for [`EXIT_MS`] before it is removed. Notices
//! stack in a single container per page ([`CONTAINER_ID`]); there is no
//! deduplication and no limit.

use crate::cart::AddedItem;
use crate::types::Price;

/// Time a notice stays in its visible state, in milliseconds.
pub const VISIBLE_MS: u32 = 3000;

/// Exit transition time before the element is removed, in milliseconds.
pub const EXIT_MS: u32 = 400;

/// DOM id of the shared notice container.
pub const CONTAINER_ID: &str = "cart-toast-container";

/// Image shown when the product has none.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/50";

/// Content of one added-to-cart notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastNotice {
    pub title: String,
    pub quantity: u32,
    pub price: Price,
    pub image: String,
}

impl ToastNotice {
    /// Notice for a successful add. Falls back to [`PLACEHOLDER_IMAGE`].
    #[must_use]
    pub fn added(item: &AddedItem) -> Self {
        let image = if item.image.trim().is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            item.image.clone()
        };

        Self {
            title: item.title.clone(),
            quantity: item.quantity,
            price: Price::usd(item.price),
            image,
        }
    }

    /// Price as shown in the notice (`"$19.99"`).
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price.to_string()
    }

    #[must_use]
    pub const fn visible_ms(&self) -> u32 {
        VISIBLE_MS
    }

    #[must_use]
    pub const fn exit_ms(&self) -> u32 {
        EXIT_MS
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductId;

    fn added(image: &str) -> AddedItem {
        AddedItem {
            id: ProductId::new(1).unwrap(),
            title: "Shirt".to_string(),
            price: Decimal::from_str("19.9").unwrap(),
            image: image.to_string(),
            quantity: 2,
        }
    }

    #[test]
    fn test_added_formats_price() {
        let notice = ToastNotice::added(&added("shirt.png"));
        assert_eq!(notice.price_display(), "$19.90");
        assert_eq!(notice.image, "shirt.png");
        assert_eq!(notice.quantity, 2);
    }

    #[test]
    fn test_added_uses_placeholder_image() {
        let notice = ToastNotice::added(&added(""));
        assert_eq!(notice.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_timings() {
        let notice = ToastNotice::added(&AddedItem {
            price: Decimal::ZERO,
            ..added("")
        });
        assert_eq!(notice.visible_ms(), 3000);
        assert_eq!(notice.exit_ms(), 400);
        assert_eq!(notice.price_display(), "$0.00");
    }
}
