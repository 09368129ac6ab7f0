//! # classmap-base
//!
//! Resolve namespaced identifiers (`Acme\Util\Strings`) to the source files
//! that define them, and remember every answer in a persistent class map.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project  → ClassLoader: registration, loading, cache persistence
//!   ↓
//! resolve  → Strategy chain: cache, namespace, convention, filesystem
//!   ↓
//! base     → Primitives (NameKey, AcceptedExtensions)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use classmap::{ClassLoader, LoaderConfig};
//!
//! let mut loader = ClassLoader::new(LoaderConfig::default());
//! loader.register_namespace("Acme", "vendor/acme/src")?;
//!
//! if let Some(artifact) = loader.load("Acme\\Util\\Strings")? {
//!     println!("{} from {}", artifact.identifier, artifact.path.display());
//! }
//! ```

/// Foundation types: NameKey, AcceptedExtensions
pub mod base;

/// Crate error type
pub mod error;

/// Resolution strategies and the class map cache
pub mod resolve;

/// Loader surface built on the resolver
pub mod project;

pub use base::{AcceptedExtensions, NameKey};
pub use error::{LoaderError, Result};
pub use project::{Artifact, ClassLoader, LoaderConfig, SharedLoader};
pub use resolve::{
    NamespaceMatch, NamespaceRegistry, ResolutionCache, ResolveResult, ResolvedFile, Resolver,
    Strategy, StrategyOrder,
};
