//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Maximum characters of a product name shown in the table.
pub const NAME_DISPLAY_LEN: usize = 25;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Truncate `value` to `max` characters, appending `...` when cut.
#[must_use]
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let head: String = value.chars().take(max).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_untouched() {
        assert_eq!(truncate_chars("Jazzmaster", NAME_DISPLAY_LEN), "Jazzmaster");
        let exact = "a".repeat(NAME_DISPLAY_LEN);
        assert_eq!(truncate_chars(&exact, NAME_DISPLAY_LEN), exact);
    }

    #[test]
    fn long_values_cut_at_char_boundary() {
        assert_eq!(
            truncate_chars("Fender American Vintage II 1966 Jazzmaster", NAME_DISPLAY_LEN),
            "Fender American Vintage I..."
        );
        assert_eq!(truncate_chars("ééééé", 3), "ééé...");
    }
}
