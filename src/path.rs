//! Dotted paths into a configuration tree.
//!
//! A path such as `http.server` addresses `http -> server`. The empty string
//! addresses the root of the tree.

use crate::error::{ConfigError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use toml::Value;

const DEFAULT_SEPARATOR: char = '.';

/// A parsed path of table keys.
///
/// The separator it was parsed with is kept for display only; two paths with
/// the same keys are equal whatever their separators.
#[derive(Debug, Clone)]
pub struct DottedPath {
    segments: Vec<String>,
    separator: char,
}

impl DottedPath {
    /// The path addressing the whole tree
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `raw` by splitting on `separator`.
    ///
    /// An empty string is the root. Any other input must not contain an
    /// empty segment (`a..b`, `.a`, `a.`).
    pub fn parse(raw: &str, separator: char) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
                separator,
            });
        }

        let segments: Vec<String> = raw.split(separator).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::Path {
                path: raw.to_string(),
                reason: format!("empty segment between '{separator}' separators"),
            });
        }

        Ok(Self {
            segments,
            separator,
        })
    }

    /// Build a path from already-split keys
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Use `separator` when displaying this path
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The first `len` segments of this path
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
            separator: self.separator,
        }
    }

    /// Resolve this path against `root`.
    ///
    /// Returns `None` when a key is missing or an intermediate node is not a
    /// table.
    #[must_use]
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| node.as_table()?.get(segment))
    }
}

impl Default for DottedPath {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl PartialEq for DottedPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for DottedPath {}

impl Hash for DottedPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            let mut buf = [0; 4];
            let separator: &str = self.separator.encode_utf8(&mut buf);
            f.write_str(&self.segments.join(separator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Value {
        r#"
            top = 1
            list = [1, 2]

            [bar]
            player = "one"

            [bar.nested]
            deep = true
        "#
        .parse::<toml::Table>()
        .map(Value::Table)
        .unwrap()
    }

    #[test]
    fn test_parse_root() {
        let path = DottedPath::parse("", '.').unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "<root>");
    }

    #[test]
    fn test_parse_segments() {
        let path = DottedPath::parse("bar.player", '.').unwrap();
        assert_eq!(path.segments(), ["bar", "player"]);
        assert_eq!(path.to_string(), "bar.player");
    }

    #[test]
    fn test_parse_custom_separator() {
        let path = DottedPath::parse("bar/player.name", '/').unwrap();
        assert_eq!(path.segments(), ["bar", "player.name"]);
    }

    #[test]
    fn test_display_uses_parse_separator() {
        let path = DottedPath::parse("a/b", '/').unwrap();
        assert_eq!(path.to_string(), "a/b");
        assert_eq!(path.prefix(1).to_string(), "a");
        assert_eq!(path, DottedPath::parse("a.b", '.').unwrap());
        assert_eq!(
            DottedPath::from_segments(["x", "y"])
                .with_separator(':')
                .to_string(),
            "x:y"
        );
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["a..b", ".a", "a.", "."] {
            let err = DottedPath::parse(raw, '.').unwrap_err();
            assert!(matches!(err, ConfigError::Path { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn test_lookup() {
        let root = tree();
        let path = DottedPath::parse("bar.nested.deep", '.').unwrap();
        assert_eq!(path.lookup(&root), Some(&Value::Boolean(true)));
        assert_eq!(DottedPath::root().lookup(&root), Some(&root));
    }

    #[test]
    fn test_lookup_missing() {
        let root = tree();
        for raw in ["nope", "bar.nope", "top.inner", "list.0"] {
            let path = DottedPath::parse(raw, '.').unwrap();
            assert!(path.lookup(&root).is_none(), "{raw} should not resolve");
        }
    }

    #[test]
    fn test_prefix() {
        let path = DottedPath::from_segments(["a", "b", "c"]);
        assert_eq!(path.prefix(2).to_string(), "a.b");
        assert!(path.prefix(0).is_root());
        assert_eq!(path.prefix(10), path);
    }
}
