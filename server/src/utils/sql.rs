//! LIKE pattern helpers

/// Where the user value sits inside a LIKE pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAnchor {
    /// `%value%`
    Contains,
    /// `value%`
    Prefix,
    /// `%value`
    Suffix,
    /// `value`, matched whole (case-insensitive equality via ILIKE)
    Whole,
}

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// # Example
///
/// ```
/// use orderin_server::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("100% match_test"), "100\\% match\\_test");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Escape `value` and wrap it with wildcards for `anchor`
pub fn like_pattern(value: &str, anchor: LikeAnchor) -> String {
    let escaped = escape_like_pattern(value);
    match anchor {
        LikeAnchor::Contains => format!("%{}%", escaped),
        LikeAnchor::Prefix => format!("{}%", escaped),
        LikeAnchor::Suffix => format!("%{}", escaped),
        LikeAnchor::Whole => escaped,
    }
}
