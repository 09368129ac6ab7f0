//! Registered namespace prefixes and their root directories.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::NameKey;
use crate::error::{LoaderError, Result};

/// Directories registered under one namespace prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
struct NamespaceEntry {
    /// The prefix with delimiters replaced by path separators. Matching is
    /// done on path components so `Acme` never matches `AcmeTools`.
    prefix_path: PathBuf,
    directories: Vec<PathBuf>,
}

/// Ordered mapping of namespace prefix → candidate directories.
///
/// Registration order is preserved both across prefixes and within the
/// directory list of a prefix; the first directory holding a match wins.
#[derive(Clone, Debug)]
pub struct NamespaceRegistry {
    delimiter: char,
    entries: IndexMap<SmolStr, NamespaceEntry>,
}

impl NamespaceRegistry {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            entries: IndexMap::new(),
        }
    }

    /// Append `directory` to the list for `prefix`.
    ///
    /// Fails with `DirectoryNotFound` when `directory` is not an existing
    /// directory, in which case the registry is left unchanged. The directory
    /// is not scanned.
    pub fn register(&mut self, prefix: &str, directory: impl Into<PathBuf>) -> Result<()> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(LoaderError::DirectoryNotFound { path: directory });
        }
        self.insert_unchecked(prefix, directory);
        Ok(())
    }

    /// Register each pair in iteration order. A failure does not stop the
    /// batch; one result per pair is returned in input order.
    pub fn register_many<I, S, P>(&mut self, mapping: I) -> Vec<Result<()>>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: Into<PathBuf>,
    {
        mapping
            .into_iter()
            .map(|(prefix, dir)| self.register(prefix.as_ref(), dir))
            .collect()
    }

    /// Append without checking the directory exists (used for restored state).
    pub(crate) fn insert_unchecked(&mut self, prefix: &str, directory: PathBuf) {
        let delimiter = self.delimiter;
        self.entries
            .entry(SmolStr::new(prefix))
            .or_insert_with(|| NamespaceEntry {
                prefix_path: NameKey::parse(prefix, delimiter).full_path(),
                directories: Vec::new(),
            })
            .directories
            .push(directory);
    }

    /// Directories of every prefix that `package_path` starts with, in
    /// registration order. Matching is on whole path components.
    pub fn candidate_directories(&self, package_path: &Path) -> Vec<&Path> {
        self.entries
            .values()
            .filter(|entry| package_path.starts_with(&entry.prefix_path))
            .flat_map(|entry| entry.directories.iter().map(PathBuf::as_path))
            .collect()
    }

    /// Directories registered under exactly `prefix`.
    pub fn directories(&self, prefix: &str) -> &[PathBuf] {
        self.entries
            .get(prefix)
            .map(|entry| entry.directories.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate prefixes with their directories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> + '_ {
        self.entries
            .iter()
            .map(|(prefix, entry)| (prefix.as_str(), entry.directories.as_slice()))
    }

    /// Owned copy of the registry for callers and snapshots.
    pub fn to_map(&self) -> IndexMap<String, Vec<PathBuf>> {
        self.iter()
            .map(|(prefix, dirs)| (prefix.to_string(), dirs.to_vec()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::DEFAULT_DELIMITER;
    use std::fs;

    #[test]
    fn test_register_missing_directory() {
        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        let err = registry.register("test", "notExistingDir").unwrap_err();

        assert!(matches!(err, LoaderError::DirectoryNotFound { .. }));
        assert!(registry.directories("test").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_register_keeps_existing_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        registry.register("Acme", dir.path()).unwrap();

        assert!(registry.register("Acme", dir.path().join("missing")).is_err());
        assert_eq!(registry.directories("Acme"), &[dir.path().to_path_buf()]);
    }

    #[test]
    fn test_register_appends() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();

        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        registry.register("Acme", &a).unwrap();
        registry.register("Acme", &b).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.directories("Acme"), &[a, b]);
    }

    #[test]
    fn test_register_many_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);

        let results = registry.register_many([
            ("Missing", dir.path().join("nope")),
            ("Acme", dir.path().to_path_buf()),
        ]);

        assert!(results[0].is_err());
        assert!(results[1].is_ok());
        assert_eq!(registry.directories("Acme").len(), 1);
    }

    #[test]
    fn test_candidates_match_on_segment_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        registry.register("Acme", dir.path()).unwrap();

        let tools = NameKey::parse("AcmeTools\\Hammer", DEFAULT_DELIMITER);
        assert!(registry.candidate_directories(&tools.package_path()).is_empty());

        let nested = NameKey::parse("Acme\\Util\\Strings", DEFAULT_DELIMITER);
        assert_eq!(registry.candidate_directories(&nested.package_path()), vec![dir.path()]);
    }

    #[test]
    fn test_candidates_in_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join("outer");
        let inner = dir.path().join("inner");
        fs::create_dir(&outer).unwrap();
        fs::create_dir(&inner).unwrap();

        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        registry.register("Acme", &outer).unwrap();
        registry.register("Acme\\Util", &inner).unwrap();

        let key = NameKey::parse("Acme\\Util\\Strings", DEFAULT_DELIMITER);
        assert_eq!(
            registry.candidate_directories(&key.package_path()),
            vec![outer.as_path(), inner.as_path()]
        );
    }

    #[test]
    fn test_no_namespace_matches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = NamespaceRegistry::new(DEFAULT_DELIMITER);
        registry.register("Acme", dir.path()).unwrap();

        let key = NameKey::parse("Strings", DEFAULT_DELIMITER);
        assert!(registry.candidate_directories(&key.package_path()).is_empty());
    }
}
