//! The ordered strategy chain that turns an identifier into a file.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::base::{AcceptedExtensions, DEFAULT_DELIMITER, NameKey};

use super::cache::ResolutionCache;
use super::namespaces::NamespaceRegistry;
use super::root::RootPath;
use super::scan::FileSystemScanner;

// ============================================================================
// STRATEGY CONFIGURATION
// ============================================================================

/// One lookup method of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A previous hit (or explicit mapping) held in the cache.
    Cache,
    /// A file under a registered namespace directory.
    Namespace,
    /// The path derived by turning delimiters into separators.
    Convention,
    /// A recursive search of the scan root.
    FileSystem,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Cache => "cache",
            Strategy::Namespace => "namespace",
            Strategy::Convention => "convention",
            Strategy::FileSystem => "filesystem",
        };
        f.write_str(name)
    }
}

/// Relative priority of the namespace and convention strategies.
///
/// The cache always runs first and the filesystem search always runs last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyOrder {
    /// Registered namespaces before convention paths.
    #[default]
    NamespaceFirst,
    /// Convention paths before registered namespaces (the legacy loader).
    ConventionFirst,
}

impl StrategyOrder {
    /// The full chain for this ordering.
    pub fn chain(self) -> [Strategy; 4] {
        match self {
            StrategyOrder::NamespaceFirst => [
                Strategy::Cache,
                Strategy::Namespace,
                Strategy::Convention,
                Strategy::FileSystem,
            ],
            StrategyOrder::ConventionFirst => [
                Strategy::Cache,
                Strategy::Convention,
                Strategy::Namespace,
                Strategy::FileSystem,
            ],
        }
    }
}

/// How a registered namespace turns into candidate file stems.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NamespaceMatch {
    /// Every prefix the package path starts with; probe `dir/leaf`.
    #[default]
    Prefix,
    /// Only the prefix equal to the first segment; probe
    /// `dir/<remaining segments>`.
    FirstSegment,
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// A successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub strategy: Strategy,
}

/// Result of resolving an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    Found(ResolvedFile),
    /// No strategy produced a file. Not an error.
    NotFound,
}

impl ResolveResult {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolveResult::Found(found) => Some(&found.path),
            ResolveResult::NotFound => None,
        }
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            ResolveResult::Found(found) => Some(found.strategy),
            ResolveResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            ResolveResult::Found(found) => Some(found.path),
            ResolveResult::NotFound => None,
        }
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves identifiers through cache → namespace/convention → filesystem,
/// writing every hit back into the cache under the identifier as given.
///
/// Misses are never cached so that a later registration can make the
/// identifier resolvable.
#[derive(Clone, Debug)]
pub struct Resolver {
    delimiter: char,
    extensions: AcceptedExtensions,
    order: StrategyOrder,
    namespace_match: NamespaceMatch,
    convention_base: Option<PathBuf>,
    root: RootPath,
    namespaces: NamespaceRegistry,
    cache: ResolutionCache,
}

impl Resolver {
    /// A resolver with default settings and empty state.
    pub fn new() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }

    /// A resolver splitting identifiers on `delimiter`.
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            extensions: AcceptedExtensions::default(),
            order: StrategyOrder::default(),
            namespace_match: NamespaceMatch::default(),
            convention_base: None,
            root: RootPath::default(),
            namespaces: NamespaceRegistry::new(delimiter),
            cache: ResolutionCache::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: AcceptedExtensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_order(mut self, order: StrategyOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_namespace_match(mut self, namespace_match: NamespaceMatch) -> Self {
        self.namespace_match = namespace_match;
        self
    }

    /// Base directory for convention paths. Without one they are relative to
    /// the process working directory.
    pub fn with_convention_base(mut self, base: Option<PathBuf>) -> Self {
        self.convention_base = base;
        self
    }

    pub fn with_root(mut self, root: RootPath) -> Self {
        self.root = root;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn order(&self) -> StrategyOrder {
        self.order
    }

    pub fn extensions(&self) -> &AcceptedExtensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut AcceptedExtensions {
        &mut self.extensions
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.namespaces
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResolutionCache {
        &mut self.cache
    }

    pub fn root(&self) -> &RootPath {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut RootPath {
        &mut self.root
    }

    /// Resolve `identifier`, stopping at the first strategy that hits.
    pub fn resolve(&mut self, identifier: &str) -> ResolveResult {
        let key = NameKey::parse(identifier, self.delimiter);

        for strategy in self.order.chain() {
            let hit = match strategy {
                Strategy::Cache => {
                    if let Some(path) = self.cache.lookup(key.full()) {
                        tracing::debug!(identifier, path = %path.display(), "cache hit");
                        return ResolveResult::Found(ResolvedFile {
                            path: path.to_path_buf(),
                            strategy,
                        });
                    }
                    if !key.is_path_safe() {
                        tracing::debug!(identifier, "identifier cannot map to a path");
                        return ResolveResult::NotFound;
                    }
                    None
                }
                Strategy::Namespace => self.find_in_namespaces(&key),
                Strategy::Convention => self.find_by_convention(&key),
                Strategy::FileSystem => self.find_in_filesystem(&key),
            };

            if let Some(path) = hit {
                tracing::debug!(identifier, %strategy, path = %path.display(), "resolved");
                self.cache.put(key.full(), path.clone());
                return ResolveResult::Found(ResolvedFile { path, strategy });
            }
        }

        tracing::debug!(identifier, "not resolved");
        ResolveResult::NotFound
    }

    fn find_in_namespaces(&self, key: &NameKey) -> Option<PathBuf> {
        // A bare leaf has no package to look up.
        if !key.has_namespace() {
            return None;
        }
        match self.namespace_match {
            NamespaceMatch::Prefix => {
                let leaf = key.leaf();
                self.namespaces
                    .candidate_directories(&key.package_path())
                    .into_iter()
                    .find_map(|dir| self.extensions.probe(&dir.join(leaf)))
            }
            NamespaceMatch::FirstSegment => {
                let first = key.first_segment()?;
                let rest = key.path_after_first();
                self.namespaces
                    .directories(first)
                    .iter()
                    .find_map(|dir| self.extensions.probe(&dir.join(&rest)))
            }
        }
    }

    fn find_by_convention(&self, key: &NameKey) -> Option<PathBuf> {
        let derived = key.full_path();
        let stem = match &self.convention_base {
            Some(base) => base.join(derived),
            None => derived,
        };
        self.extensions.probe(&stem)
    }

    fn find_in_filesystem(&self, key: &NameKey) -> Option<PathBuf> {
        FileSystemScanner::new(&self.extensions).find(self.root.get(), key.leaf())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Tree {
        _dir: tempfile::TempDir,
        root: PathBuf,
    }

    impl Tree {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            // Canonical so scan results compare equal on hosts with symlinked temp dirs.
            let root = dir.path().canonicalize().unwrap();
            Self { _dir: dir, root }
        }

        fn path(&self) -> &Path {
            &self.root
        }

        fn file(&self, rel: &str) -> PathBuf {
            let path = self.root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
            path
        }

        fn subdir(&self, rel: &str) -> PathBuf {
            let path = self.root.join(rel);
            fs::create_dir_all(&path).unwrap();
            path
        }

        /// A resolver whose convention base and scan root are both inside the tree.
        fn resolver(&self, conv: &str, scan: &str) -> Resolver {
            Resolver::new()
                .with_convention_base(Some(self.subdir(conv)))
                .with_root(RootPath::new(Some(self.subdir(scan))))
        }
    }

    #[test]
    fn test_strategy_chain_orders() {
        assert_eq!(StrategyOrder::NamespaceFirst.chain()[1], Strategy::Namespace);
        assert_eq!(StrategyOrder::ConventionFirst.chain()[1], Strategy::Convention);
        assert_eq!(StrategyOrder::ConventionFirst.chain()[3], Strategy::FileSystem);
    }

    #[test]
    fn test_empty_prefix_does_not_match_bare_leaf() {
        let tree = Tree::new();
        let lib = tree.subdir("lib");
        tree.file("lib/Foo.php");

        let mut resolver = tree.resolver("conv", "scan");
        resolver.namespaces_mut().register("", &lib).unwrap();

        assert_eq!(resolver.resolve("Foo"), ResolveResult::NotFound);
        assert!(resolver.cache().is_empty());

        resolver = resolver.with_namespace_match(NamespaceMatch::FirstSegment);
        assert_eq!(resolver.resolve("Foo"), ResolveResult::NotFound);
    }

    #[test]
    fn test_namespace_hit_is_cached_under_full_identifier() {
        let tree = Tree::new();
        let lib = tree.subdir("lib");
        let file = tree.file("lib/Strings.php");

        let mut resolver = tree.resolver("conv", "scan");
        resolver.namespaces_mut().register("Acme", &lib).unwrap();

        let result = resolver.resolve("Acme\\Util\\Strings");

        assert_eq!(result.path(), Some(file.as_path()));
        assert_eq!(result.strategy(), Some(Strategy::Namespace));
        assert_eq!(resolver.cache().lookup("Acme\\Util\\Strings"), Some(file.as_path()));
        assert!(resolver.cache().lookup("Strings").is_none());
    }

    #[test]
    fn test_second_resolution_comes_from_cache() {
        let tree = Tree::new();
        let file = tree.file("conv/Acme/Foo.php");
        let mut resolver = tree.resolver("conv", "scan");

        let first = resolver.resolve("Acme\\Foo");
        let second = resolver.resolve("Acme\\Foo");

        assert_eq!(first.strategy(), Some(Strategy::Convention));
        assert_eq!(second.strategy(), Some(Strategy::Cache));
        assert_eq!(first.path(), second.path());
        assert_eq!(second.path(), Some(file.as_path()));
    }

    #[test]
    fn test_stale_cache_entry_is_still_returned() {
        let tree = Tree::new();
        let mut resolver = tree.resolver("conv", "scan");
        resolver.cache_mut().put("Gone", tree.path().join("Gone.php"));

        let result = resolver.resolve("Gone");

        assert_eq!(result.strategy(), Some(Strategy::Cache));
        assert_eq!(result.path(), Some(tree.path().join("Gone.php").as_path()));
    }

    #[test]
    fn test_first_segment_match_uses_remaining_path() {
        let tree = Tree::new();
        let custom = tree.subdir("custom");
        let file = tree.file("custom/Sub/Widget.inc");

        let mut resolver = tree
            .resolver("conv", "scan")
            .with_namespace_match(NamespaceMatch::FirstSegment);
        resolver.namespaces_mut().register("customNamespace", &custom).unwrap();

        let result = resolver.resolve("customNamespace\\Sub\\Widget");
        assert_eq!(result.path(), Some(file.as_path()));
        assert_eq!(result.strategy(), Some(Strategy::Namespace));
    }

    #[test]
    fn test_filesystem_fallback() {
        let tree = Tree::new();
        let file = tree.file("scan/deep/er/Needle.php");
        let mut resolver = tree.resolver("conv", "scan");

        let result = resolver.resolve("Some\\Pkg\\Needle");

        assert_eq!(result.strategy(), Some(Strategy::FileSystem));
        assert_eq!(result.path(), Some(file.as_path()));
        assert!(resolver.cache().contains("Some\\Pkg\\Needle"));
    }

    #[test]
    fn test_miss_is_not_cached() {
        let tree = Tree::new();
        let mut resolver = tree.resolver("conv", "scan");

        assert_eq!(resolver.resolve("Nowhere\\Thing"), ResolveResult::NotFound);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_unsafe_identifier_never_resolves() {
        let tree = Tree::new();
        tree.file("secret.php");
        let mut resolver = tree.resolver("conv", "scan");

        assert_eq!(resolver.resolve("..\\secret"), ResolveResult::NotFound);
        assert_eq!(resolver.resolve(""), ResolveResult::NotFound);
    }
}
