//! Loader surface — configuration, registration, loading and persistence.

mod config;
mod loader;
mod shared;

pub use config::LoaderConfig;
pub use loader::{Artifact, ClassLoader};
pub use shared::SharedLoader;
