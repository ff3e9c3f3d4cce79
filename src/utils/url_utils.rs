//! URL helpers for page locations and pixel requests

/// Drop the query string (and fragment) from a location.
///
/// Deduplication keys built from request URLs use this so calls that differ
/// only in their parameters count as one error.
#[must_use]
pub fn strip_query(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

/// Append `key=value` to `base`, percent-encoding the value.
///
/// Uses `?` when `base` has no query yet and `&` otherwise.
#[must_use]
pub fn append_query_param(base: &str, key: &str, value: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{key}={}", urlencoding::encode(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(strip_query("https://api.test/users?id=1"), "https://api.test/users");
        assert_eq!(strip_query("https://api.test/a#top"), "https://api.test/a");
        assert_eq!(strip_query("/plain"), "/plain");
    }

    #[test]
    fn appends_with_correct_separator() {
        assert_eq!(
            append_query_param("https://c.test/p.gif", "data", "{\"a\":1}"),
            "https://c.test/p.gif?data=%7B%22a%22%3A1%7D"
        );
        assert_eq!(
            append_query_param("https://c.test/p.gif?v=2", "data", "x y"),
            "https://c.test/p.gif?v=2&data=x%20y"
        );
    }
}
