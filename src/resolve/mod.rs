//! Identifier resolution — from a namespaced name to a source file.
//!
//! # Strategy chain
//!
//! ```text
//! cache ──miss──▶ namespace ──miss──▶ convention ──miss──▶ filesystem ──miss──▶ NotFound
//!   │                 │                   │                     │
//!   └── hit           └───────── hit: written back to the cache ┘
//! ```
//!
//! The namespace and convention steps swap places under
//! [`StrategyOrder::ConventionFirst`].
//!
//! ## Key Data Structures
//!
//! - [`ResolutionCache`] - Identifier → path memo, persisted as a snapshot
//! - [`NamespaceRegistry`] - Prefix → ordered candidate directories
//! - [`FileSystemScanner`] - Pre-order search of the scan root
//! - [`RootPath`] - Lazily computed scan root
//! - [`Resolver`] - Runs the chain and fills the cache

mod cache;
mod namespaces;
mod resolver;
mod root;
mod scan;

pub use cache::{DEFAULT_CACHE_FILE, ResolutionCache};
pub(crate) use cache::is_encodable;
pub use namespaces::NamespaceRegistry;
pub use resolver::{
    NamespaceMatch, ResolveResult, ResolvedFile, Resolver, Strategy, StrategyOrder,
};
pub use root::{DOCUMENT_ROOT_ENV, RootPath, compute_root, install_dir, normalize};
pub use scan::FileSystemScanner;
