//! HTTP cache validation module
//!
//! `ETag` generation for static assets and `If-None-Match` handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a strong `ETag` from content length and hash
///
/// Returns a quoted string, e.g. `"1a-3f2c9e0b7d11a4c2"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether the client's `If-None-Match` covers `etag` (so 304 applies)
///
/// Accepts a single tag, a comma-separated list, weak tags (`W/"..."`)
/// and the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with("\"b-"));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"hello worlds"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"5-abc\"";
        assert!(check_etag_match(Some("\"5-abc\""), etag));
        assert!(check_etag_match(Some("\"x\", \"5-abc\""), etag));
        assert!(check_etag_match(Some("W/\"5-abc\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"other\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
