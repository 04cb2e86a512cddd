//! Product listing math: keyword filter, sort order and the page-number window.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use rust_decimal::Decimal;

use crate::types::ProductId;

/// Maximum number of numbered page links shown at once.
pub const MAX_PAGE_BUTTONS: u32 = 7;

/// A product as shown on a listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical by name, ignoring case.
    #[default]
    Name,
    /// Cheapest first.
    Price,
}

impl SortKey {
    /// Parse the `sort` query value. Anything other than `price` sorts by name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("price") {
            Self::Price
        } else {
            Self::Name
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
        }
    }
}

/// Keep products whose name contains `keyword` (case-insensitive), then sort.
///
/// Both sorts are stable; name ties are broken by the exact name so the
/// order does not depend on the input order.
#[must_use]
pub fn filter_and_sort(
    products: &[ListingProduct],
    keyword: &str,
    sort: SortKey,
) -> Vec<ListingProduct> {
    let needle = keyword.trim().to_lowercase();
    let mut matched: Vec<ListingProduct> = products
        .iter()
        .filter(|product| needle.is_empty() || product.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match sort {
        SortKey::Price => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::Name => matched.sort_by(compare_names),
    }

    matched
}

fn compare_names(a: &ListingProduct, b: &ListingProduct) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Offset of the first product on `page` (1-based).
#[must_use]
pub fn skip_for(page: u32, per_page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(per_page)
}

/// Number of pages needed for `total` products.
#[must_use]
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
}

/// Pagination controls for one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
}

impl Pagination {
    #[must_use]
    pub const fn new(current: u32, total_pages: u32) -> Self {
        Self {
            current,
            total_pages,
        }
    }

    /// Controls are hidden when everything fits on one page.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Page numbers to show, at most [`MAX_PAGE_BUTTONS`] of them.
    ///
    /// Normally three on either side of the current page. Near the start the
    /// window is pinned to the first seven pages, near the end to the last
    /// seven.
    #[must_use]
    pub fn window(&self) -> RangeInclusive<u32> {
        let current = self.current;
        let total = self.total_pages;

        let mut start = current.saturating_sub(3).max(1);
        let mut end = current.saturating_add(3).min(total);

        if current <= 4 {
            end = total.min(MAX_PAGE_BUTTONS);
        }
        if current > total.saturating_sub(4) {
            start = total.saturating_sub(MAX_PAGE_BUTTONS - 1).max(1);
        }

        start..=end
    }
}
