//! Construction-time settings for [`ClassLoader`](super::ClassLoader).

use std::path::PathBuf;

use crate::base::{AcceptedExtensions, DEFAULT_DELIMITER};
use crate::resolve::{DEFAULT_CACHE_FILE, NamespaceMatch, StrategyOrder, install_dir};

/// Loader configuration.
///
/// `Default` is the generalized loader with caching off. [`LoaderConfig::legacy`]
/// gives the single-extension, convention-first loader with caching on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Hydrate the cache at construction and persist it on drop.
    pub caching_enabled: bool,
    /// Location of the persisted cache. `None` means
    /// `<install dir>/classMap.cache`.
    pub cache_file: Option<PathBuf>,
    pub accepted_extensions: AcceptedExtensions,
    /// Scan root override. `None` means computed lazily on first search.
    pub root_path: Option<PathBuf>,
    pub strategy_order: StrategyOrder,
    pub namespace_match: NamespaceMatch,
    pub delimiter: char,
    /// Base directory for convention paths. `None` means the working
    /// directory.
    pub convention_base: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            caching_enabled: false,
            cache_file: None,
            accepted_extensions: AcceptedExtensions::default(),
            root_path: None,
            strategy_order: StrategyOrder::NamespaceFirst,
            namespace_match: NamespaceMatch::Prefix,
            delimiter: DEFAULT_DELIMITER,
            convention_base: None,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The legacy loader: caching on, `.php` only, convention before namespace.
    pub fn legacy() -> Self {
        Self {
            caching_enabled: true,
            accepted_extensions: AcceptedExtensions::single("php"),
            strategy_order: StrategyOrder::ConventionFirst,
            ..Self::default()
        }
    }

    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    pub fn with_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted_extensions = AcceptedExtensions::new(exts);
        self
    }

    pub fn with_root_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_path = Some(path.into());
        self
    }

    pub fn with_strategy_order(mut self, order: StrategyOrder) -> Self {
        self.strategy_order = order;
        self
    }

    pub fn with_namespace_match(mut self, namespace_match: NamespaceMatch) -> Self {
        self.namespace_match = namespace_match;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_convention_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.convention_base = Some(base.into());
        self
    }

    /// The cache file actually used.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| install_dir().join(DEFAULT_CACHE_FILE))
    }
}
