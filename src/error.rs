//! Error type shared by registration, persistence and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Failures surfaced by the loader.
///
/// A resolution miss is not an error; see [`crate::resolve::ResolveResult`].
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A namespace (or root path) was registered against a missing directory.
    #[error("directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// An explicit identifier-to-file mapping names a missing file.
    #[error("file does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A persisted snapshot could not be decoded.
    #[error("failed to decode snapshot: {0}")]
    CacheDecode(String),

    /// A snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    CacheEncode(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loader state cannot be replaced once identifiers have been loaded.
    #[error("cannot import loader state after {loaded} identifier(s) were loaded")]
    StateLocked { loaded: usize },
}

impl LoaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
