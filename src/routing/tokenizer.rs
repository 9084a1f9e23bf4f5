//! Path tokenizer
//!
//! Splits a request path on `/` without any normalization.

/// Split a decoded request path into its segments.
///
/// Repeated delimiters and trailing slashes are kept as empty tokens, so the
/// result always has at least one element.
///
/// # Examples
/// ```
/// use pkgroute::routing::tokenize;
/// assert_eq!(tokenize("/packages/foo"), vec!["", "packages", "foo"]);
/// assert_eq!(tokenize("/a//b/"), vec!["", "a", "", "b", ""]);
/// ```
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Positional view over a token sequence
///
/// Index 0 is the artifact of the leading `/`, index 1 the route key,
/// index 2 the primary identifier and index 3 the sub-action.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            tokens: tokenize(path),
        }
    }

    pub fn route_key(&self) -> Option<&'a str> {
        self.tokens.get(1).copied()
    }

    pub fn identifier(&self) -> Option<&'a str> {
        self.tokens.get(2).copied()
    }

    pub fn sub_action(&self) -> Option<&'a str> {
        self.tokens.get(3).copied()
    }

    /// Whether token 1 selects the route registered under `key` (e.g. `/packages`)
    pub fn selects(&self, key: &str) -> bool {
        self.route_key()
            .zip(key.strip_prefix('/'))
            .is_some_and(|(token, bare)| token == bare)
    }
}
