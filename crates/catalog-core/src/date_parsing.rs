//! Publication-year extraction from free-text catalog dates.
//!
//! Catalog dates come in many shapes (`"1999-05-01"`, `"circa 1876"`,
//! `"[1902?]"`), so rather than parsing a calendar date the extractor takes
//! the leftmost run of four ASCII digits and reads it as the year.

use std::sync::OnceLock;

use regex::Regex;

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]{4}").expect("regex is valid"))
}

/// Extract a four-digit year from a publication date string.
///
/// Returns `None` when the string is empty, contains no run of four digits,
/// or the digits read as a non-positive number (`"0000"`). Adjacent digits are
/// not excluded, so `"12345"` yields `1234`.
///
/// Only ASCII `0-9` count as digits; other Unicode decimal digits such as
/// Arabic-Indic `١٩٩٩` are not read as a year.
///
/// # Examples
///
/// ```
/// use catalog_core::date_parsing::extract_year;
///
/// assert_eq!(extract_year("1999-05-01"), Some(1999));
/// assert_eq!(extract_year("circa 1876"), Some(1876));
/// assert_eq!(extract_year("no date"), None);
/// ```
pub fn extract_year(date_value: &str) -> Option<i32> {
    if date_value.is_empty() {
        return None;
    }
    let found = year_pattern().find(date_value)?;
    let year: i32 = found.as_str().parse().ok()?;
    (year > 0).then_some(year)
}
