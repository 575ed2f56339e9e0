//! SQL utility functions

/// Escape the LIKE metacharacters `%`, `_` and `\` so user text matches literally.
///
/// Pair the result with `ESCAPE '\'` in the query.
///
/// ```
/// use listings_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("50% off_road"));
/// assert_eq!(pattern, "%50\\% off\\_road%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
