//! Pluralization utilities.

/// Return "s" suffix for plural counts
///
/// # Examples
///
/// - `plural_s(0)` -> `"s"` (0 feeds)
/// - `plural_s(1)` -> `""` (1 feed)
/// - `plural_s(5)` -> `"s"` (5 feeds)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// # Examples
///
/// - `plural_count(0, "feed")` -> `"0 feeds"`
/// - `plural_count(1, "feed")` -> `"1 feed"`
/// - `plural_count(5, "feed")` -> `"5 feeds"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
