use super::Cart;
use crate::types::Price;

/// Totals shown next to the cart lines.
///
/// There is no tax or shipping model, so `total` always equals `subtotal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Price,
    pub total: Price,
    pub checkout_enabled: bool,
}

impl CartSummary {
    pub(super) fn of(cart: &Cart) -> Self {
        let subtotal = Price::usd(cart.subtotal());
        Self {
            item_count: cart.total_quantity(),
            subtotal,
            total: subtotal,
            checkout_enabled: !cart.is_empty(),
        }
    }
}
