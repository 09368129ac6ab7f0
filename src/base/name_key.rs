//! Parsed views of a namespaced identifier.

use std::fmt;
use std::path::PathBuf;

use smol_str::SmolStr;

/// The namespace delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = '\\';

/// A namespaced identifier split into its package and leaf parts.
///
/// `Acme\Util\Strings` parses into the package segments `["Acme", "Util"]`
/// and the leaf `Strings`. An identifier without a delimiter is leaf-only.
/// A leading delimiter (the fully-qualified form) and empty segments are
/// ignored when deriving the views, but [`NameKey::full`] keeps the
/// identifier exactly as given since it is the cache key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    full: SmolStr,
    segments: Vec<SmolStr>,
}

impl NameKey {
    /// Parse `identifier` using `delimiter` between segments. Never fails.
    pub fn parse(identifier: &str, delimiter: char) -> Self {
        let segments = identifier
            .split(delimiter)
            .filter(|s| !s.is_empty())
            .map(SmolStr::new)
            .collect();
        Self {
            full: SmolStr::new(identifier),
            segments,
        }
    }

    /// The identifier as supplied by the caller.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// The final segment, or `""` for an empty identifier.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(SmolStr::as_str).unwrap_or("")
    }

    /// All segments but the last.
    pub fn package_segments(&self) -> &[SmolStr] {
        match self.segments.split_last() {
            Some((_, package)) => package,
            None => &[],
        }
    }

    /// The package segments joined with the host path separator.
    ///
    /// Empty when the identifier has no namespace.
    pub fn package_path(&self) -> PathBuf {
        self.package_segments().iter().map(SmolStr::as_str).collect()
    }

    /// Every segment joined with the host path separator (the convention path,
    /// without extension).
    pub fn full_path(&self) -> PathBuf {
        self.segments.iter().map(SmolStr::as_str).collect()
    }

    /// Segments after the first one joined as a path, used when a namespace
    /// is keyed by its first segment only.
    pub fn path_after_first(&self) -> PathBuf {
        self.segments.iter().skip(1).map(SmolStr::as_str).collect()
    }

    /// The first segment, when the identifier has a namespace.
    pub fn first_segment(&self) -> Option<&str> {
        if self.has_namespace() {
            self.segments.first().map(SmolStr::as_str)
        } else {
            None
        }
    }

    pub fn has_namespace(&self) -> bool {
        self.segments.len() > 1
    }

    /// Whether the identifier can be turned into a relative path safely:
    /// a non-empty leaf and no `.`/`..` or separator-bearing segments.
    pub fn is_path_safe(&self) -> bool {
        !self.segments.is_empty()
            && self.segments.iter().all(|s| {
                s != "." && s != ".." && !s.contains('/') && !s.contains(std::path::MAIN_SEPARATOR)
            })
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({})", self.full)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_namespaced() {
        let key = NameKey::parse("Acme\\Util\\Strings", DEFAULT_DELIMITER);

        assert_eq!(key.full(), "Acme\\Util\\Strings");
        assert_eq!(key.leaf(), "Strings");
        assert!(key.has_namespace());
        assert_eq!(key.package_path(), Path::new("Acme").join("Util"));
        assert_eq!(key.full_path(), Path::new("Acme").join("Util").join("Strings"));
        assert_eq!(key.first_segment(), Some("Acme"));
        assert_eq!(key.path_after_first(), Path::new("Util").join("Strings"));
    }

    #[test]
    fn test_parse_leaf_only() {
        let key = NameKey::parse("Registry", DEFAULT_DELIMITER);

        assert_eq!(key.leaf(), "Registry");
        assert!(!key.has_namespace());
        assert_eq!(key.package_path(), PathBuf::new());
        assert_eq!(key.first_segment(), None);
    }

    #[test]
    fn test_leading_delimiter_ignored_for_views() {
        let key = NameKey::parse("\\tests\\FindMe", DEFAULT_DELIMITER);

        assert_eq!(key.full(), "\\tests\\FindMe");
        assert_eq!(key.leaf(), "FindMe");
        assert_eq!(key.package_path(), PathBuf::from("tests"));
    }

    #[test]
    fn test_custom_delimiter() {
        let key = NameKey::parse("app.models.User", '.');

        assert_eq!(key.leaf(), "User");
        assert_eq!(key.package_path(), Path::new("app").join("models"));
    }

    #[test]
    fn test_empty_identifier() {
        let key = NameKey::parse("", DEFAULT_DELIMITER);

        assert_eq!(key.leaf(), "");
        assert!(!key.has_namespace());
        assert!(!key.is_path_safe());
    }

    #[test]
    fn test_dot_segments_are_unsafe() {
        assert!(!NameKey::parse("..\\etc\\passwd", DEFAULT_DELIMITER).is_path_safe());
        assert!(!NameKey::parse("a/b\\C", DEFAULT_DELIMITER).is_path_safe());
        assert!(NameKey::parse("Acme\\Foo", DEFAULT_DELIMITER).is_path_safe());
    }
}
