//! The class loader: registration, loading and class map persistence.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::config::LoaderConfig;
use crate::base::AcceptedExtensions;
use crate::error::{LoaderError, Result};
use crate::resolve::{ResolveResult, Resolver, RootPath, Strategy, is_encodable};

/// A resolved identifier together with the raw contents of its file.
///
/// Contents are kept as bytes; files are not required to be UTF-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub identifier: String,
    pub path: PathBuf,
    pub strategy: Strategy,
    pub source: Arc<[u8]>,
}

impl Artifact {
    /// The contents as text, with invalid UTF-8 replaced.
    pub fn source_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }
}

/// Serialized loader configuration and class map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LoaderState {
    version: u32,
    root_path: Option<PathBuf>,
    extensions: Vec<String>,
    namespaces: IndexMap<String, Vec<PathBuf>>,
    class_map: BTreeMap<String, PathBuf>,
}

impl LoaderState {
    const CURRENT_VERSION: u32 = 1;
}

/// Resolves and loads identifiers, owning the registry and the class map.
///
/// With caching enabled the class map is hydrated from the cache file at
/// construction and written back when the loader is dropped, provided it
/// holds at least one entry. Concurrent use needs external locking; see
/// [`SharedLoader`](super::SharedLoader).
#[derive(Debug)]
pub struct ClassLoader {
    resolver: Resolver,
    caching_enabled: bool,
    cache_path: PathBuf,
    loaded: IndexMap<String, PathBuf>,
}

impl ClassLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let cache_path = config.cache_path();
        let resolver = Resolver::with_delimiter(config.delimiter)
            .with_extensions(config.accepted_extensions)
            .with_order(config.strategy_order)
            .with_namespace_match(config.namespace_match)
            .with_convention_base(config.convention_base)
            .with_root(RootPath::new(config.root_path));

        let mut loader = Self {
            resolver,
            caching_enabled: config.caching_enabled,
            cache_path,
            loaded: IndexMap::new(),
        };

        if loader.caching_enabled {
            let path = loader.cache_path.clone();
            if let Err(err) = loader.load_cache_from(&path) {
                tracing::warn!(error = %err, "discarding unreadable class map cache");
            }
        }
        loader
    }

    /// Replace the class map with the snapshot stored at `path`.
    ///
    /// Returns `Ok(false)` when there is no such file. A corrupt file leaves
    /// the class map empty.
    pub fn load_cache_from(&mut self, path: &Path) -> Result<bool> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(LoaderError::io(path, err)),
        };
        self.resolver.cache_mut().hydrate(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            entries = self.resolver.cache().len(),
            "class map hydrated"
        );
        Ok(true)
    }

    /// Write the class map to the cache file, overwriting it.
    ///
    /// Nothing is written for an empty map; returns whether a write happened.
    pub fn persist(&self) -> Result<bool> {
        let cache = self.resolver.cache();
        if cache.is_empty() {
            return Ok(false);
        }
        let bytes = cache.serialize_snapshot()?;
        fs::write(&self.cache_path, bytes).map_err(|e| LoaderError::io(&self.cache_path, e))?;
        tracing::debug!(path = %self.cache_path.display(), entries = cache.len(), "class map persisted");
        Ok(true)
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Register `directory` as a root for namespace `prefix`.
    pub fn register_namespace(&mut self, prefix: &str, directory: impl Into<PathBuf>) -> Result<()> {
        self.resolver
            .namespaces_mut()
            .register(prefix, directory)
            .inspect_err(|err| tracing::warn!(prefix, error = %err, "namespace not registered"))
    }

    /// Register several namespaces; one result per pair, failures do not stop
    /// the batch.
    pub fn register_namespaces<I, S, P>(&mut self, mapping: I) -> Vec<Result<()>>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: Into<PathBuf>,
    {
        mapping
            .into_iter()
            .map(|(prefix, dir)| self.register_namespace(prefix.as_ref(), dir))
            .collect()
    }

    /// Map `identifier` straight to `file`, bypassing the search strategies.
    pub fn register_class(&mut self, identifier: &str, file: impl Into<PathBuf>) -> Result<()> {
        let file = file.into();
        if !file.exists() {
            let err = LoaderError::FileNotFound { path: file };
            tracing::warn!(identifier, error = %err, "class not registered");
            return Err(err);
        }
        self.resolver.cache_mut().put(identifier, file);
        Ok(())
    }

    /// Register several identifier → file mappings; one result per pair.
    pub fn register_classes<I, S, P>(&mut self, mapping: I) -> Vec<Result<()>>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: Into<PathBuf>,
    {
        mapping
            .into_iter()
            .map(|(id, file)| self.register_class(id.as_ref(), file))
            .collect()
    }

    /// Override the scan root. A missing directory is rejected and the
    /// previous root kept.
    pub fn set_root_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.is_dir() {
            return Err(LoaderError::DirectoryNotFound { path });
        }
        self.resolver.root_mut().set(path);
        Ok(())
    }

    /// Append an accepted extension. Returns `false` if it was already known.
    pub fn add_accepted_extension(&mut self, ext: &str) -> bool {
        self.resolver.extensions_mut().push(ext)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Registered namespaces with their directories, in registration order.
    pub fn namespaces(&self) -> IndexMap<String, Vec<PathBuf>> {
        self.resolver.namespaces().to_map()
    }

    /// Identifiers loaded through [`ClassLoader::load`], in load order.
    pub fn loaded_identifiers(&self) -> &IndexMap<String, PathBuf> {
        &self.loaded
    }

    pub fn accepted_extensions(&self) -> &AcceptedExtensions {
        self.resolver.extensions()
    }

    /// The scan root, computing it if needed.
    pub fn root_path(&self) -> &Path {
        self.resolver.root().get()
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn is_caching(&self) -> bool {
        self.caching_enabled
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Resolve without reading the file.
    pub fn resolve(&mut self, identifier: &str) -> ResolveResult {
        self.resolver.resolve(identifier)
    }

    /// Resolve `identifier` and read its file as bytes.
    ///
    /// `Ok(None)` is an ordinary miss. A cached path whose file has gone
    /// missing surfaces here as an `Io` error.
    pub fn load(&mut self, identifier: &str) -> Result<Option<Artifact>> {
        let ResolveResult::Found(found) = self.resolver.resolve(identifier) else {
            return Ok(None);
        };

        let source = fs::read(&found.path).map_err(|e| LoaderError::io(&found.path, e))?;
        self.loaded.insert(identifier.to_string(), found.path.clone());

        Ok(Some(Artifact {
            identifier: identifier.to_string(),
            path: found.path,
            strategy: found.strategy,
            source: Arc::from(source),
        }))
    }

    /// Callback form of [`ClassLoader::load`]: `true` when the identifier is
    /// now loaded, `false` for a miss or an unreadable file.
    pub fn resolve_and_load(&mut self, identifier: &str) -> bool {
        match self.load(identifier) {
            Ok(artifact) => artifact.is_some(),
            Err(err) => {
                tracing::warn!(identifier, error = %err, "failed to load resolved file");
                false
            }
        }
    }

    // ========================================================================
    // STATE SNAPSHOT
    // ========================================================================

    /// Serialize the root path, extensions, namespaces and class map.
    ///
    /// Paths that are not valid UTF-8 cannot be encoded and are left out
    /// with a warning; the rest of the state is still exported.
    pub fn export_state(&self) -> Result<Vec<u8>> {
        let root_path = self
            .resolver
            .root()
            .explicit()
            .filter(|root| {
                let ok = is_encodable(root);
                if !ok {
                    tracing::warn!(root = %root.display(), "skipping non-UTF-8 root path in state");
                }
                ok
            })
            .map(Path::to_path_buf);

        let mut namespaces = self.namespaces();
        for (prefix, dirs) in namespaces.iter_mut() {
            dirs.retain(|dir| {
                let ok = is_encodable(dir);
                if !ok {
                    tracing::warn!(prefix = %prefix, dir = %dir.display(), "skipping non-UTF-8 namespace directory in state");
                }
                ok
            });
        }
        namespaces.retain(|_, dirs| !dirs.is_empty());

        let state = LoaderState {
            version: LoaderState::CURRENT_VERSION,
            root_path,
            extensions: self.resolver.extensions().iter().map(str::to_string).collect(),
            namespaces,
            class_map: self.resolver.cache().to_encodable_map(),
        };
        serde_json::to_vec(&state).map_err(|e| LoaderError::CacheEncode(e.to_string()))
    }

    /// Replace the loader's state with an exported snapshot.
    ///
    /// Refused once anything has been loaded. A malformed snapshot leaves the
    /// loader untouched. Namespace directories are taken as-is.
    pub fn import_state(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.loaded.is_empty() {
            return Err(LoaderError::StateLocked {
                loaded: self.loaded.len(),
            });
        }

        let state: LoaderState =
            serde_json::from_slice(bytes).map_err(|e| LoaderError::CacheDecode(e.to_string()))?;
        if state.version != LoaderState::CURRENT_VERSION {
            return Err(LoaderError::CacheDecode(format!(
                "unsupported state version {}",
                state.version
            )));
        }

        *self.resolver.root_mut() = RootPath::new(state.root_path);
        *self.resolver.extensions_mut() = AcceptedExtensions::new(state.extensions);

        let namespaces = self.resolver.namespaces_mut();
        namespaces.clear();
        for (prefix, dirs) in state.namespaces {
            for dir in dirs {
                namespaces.insert_unchecked(&prefix, dir);
            }
        }

        self.resolver.cache_mut().replace_all(state.class_map);
        Ok(())
    }
}

impl Default for ClassLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl Drop for ClassLoader {
    fn drop(&mut self) {
        if !self.caching_enabled {
            return;
        }
        if let Err(err) = self.persist() {
            tracing::warn!(error = %err, "failed to persist class map");
        }
    }
}
