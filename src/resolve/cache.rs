//! Identifier → file path memo with snapshot persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{LoaderError, Result};

/// Default file name of the persisted cache.
pub const DEFAULT_CACHE_FILE: &str = "classMap.cache";

/// On-disk form of the cache.
///
/// A `BTreeMap` keeps the encoding deterministic for a given set of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheSnapshot {
    version: u32,
    entries: BTreeMap<String, PathBuf>,
}

impl CacheSnapshot {
    const CURRENT_VERSION: u32 = 1;
}

/// In-memory map of resolved identifiers.
///
/// Entries are never invalidated: a cached path that has since disappeared is
/// still returned, and the caller deals with the failed open.
#[derive(Clone, Debug, Default)]
pub struct ResolutionCache {
    entries: FxHashMap<SmolStr, PathBuf>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached path. No filesystem access.
    pub fn lookup(&self, id: &str) -> Option<&Path> {
        self.entries.get(id).map(PathBuf::as_path)
    }

    /// Insert or overwrite an entry.
    pub fn put(&mut self, id: &str, path: impl Into<PathBuf>) {
        self.entries.insert(SmolStr::new(id), path.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Entries sorted by identifier.
    pub fn to_sorted_map(&self) -> BTreeMap<String, PathBuf> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Entries sorted by identifier, leaving out paths the snapshot format
    /// cannot hold (not valid UTF-8). Each skipped entry is logged.
    pub fn to_encodable_map(&self) -> BTreeMap<String, PathBuf> {
        self.entries
            .iter()
            .filter(|(id, path)| {
                let ok = is_encodable(path);
                if !ok {
                    tracing::warn!(identifier = %id, path = %path.display(), "skipping non-UTF-8 path in snapshot");
                }
                ok
            })
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Replace the contents with the given entries.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = (String, PathBuf)>) {
        self.entries = entries
            .into_iter()
            .map(|(k, v)| (SmolStr::from(k), v))
            .collect();
    }

    /// Replace the contents with a persisted snapshot.
    ///
    /// On malformed input the cache is left empty and `CacheDecode` is
    /// returned; callers are expected to carry on with a cold cache.
    pub fn hydrate(&mut self, bytes: &[u8]) -> Result<()> {
        self.entries.clear();

        let snapshot: CacheSnapshot = serde_json::from_slice(bytes)
            .map_err(|e| LoaderError::CacheDecode(e.to_string()))?;
        if snapshot.version != CacheSnapshot::CURRENT_VERSION {
            return Err(LoaderError::CacheDecode(format!(
                "unsupported cache version {}",
                snapshot.version
            )));
        }

        self.replace_all(snapshot.entries);
        Ok(())
    }

    /// Encode the whole map.
    pub fn serialize_snapshot(&self) -> Result<Vec<u8>> {
        let snapshot = CacheSnapshot {
            version: CacheSnapshot::CURRENT_VERSION,
            entries: self.to_encodable_map(),
        };
        serde_json::to_vec(&snapshot).map_err(|e| LoaderError::CacheEncode(e.to_string()))
    }
}

/// Whether `path` survives a round trip through the snapshot encoding.
pub(crate) fn is_encodable(path: &Path) -> bool {
    path.to_str().is_some()
}
