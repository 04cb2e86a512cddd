//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the value, or the placeholder product image when it is blank.
///
/// Usage in templates: `{{ item.image|or_placeholder }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn or_placeholder(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let value = value.to_string();
    if value.trim().is_empty() {
        Ok(shopfront_core::toast::PLACEHOLDER_IMAGE.to_string())
    } else {
        Ok(value)
    }
}
