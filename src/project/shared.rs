//! A loader handle that can be shared between threads.

use std::sync::Arc;

use parking_lot::Mutex;

use super::config::LoaderConfig;
use super::loader::ClassLoader;
use crate::resolve::ResolveResult;

/// One lock guarding a whole [`ClassLoader`].
///
/// The loader itself mutates its cache and registry without synchronization;
/// every call here holds the lock for its full duration, including any
/// filesystem search.
#[derive(Clone, Debug)]
pub struct SharedLoader {
    inner: Arc<Mutex<ClassLoader>>,
}

impl SharedLoader {
    pub fn new(loader: ClassLoader) -> Self {
        Self {
            inner: Arc::new(Mutex::new(loader)),
        }
    }

    pub fn from_config(config: LoaderConfig) -> Self {
        Self::new(ClassLoader::new(config))
    }

    pub fn resolve(&self, identifier: &str) -> ResolveResult {
        self.inner.lock().resolve(identifier)
    }

    pub fn resolve_and_load(&self, identifier: &str) -> bool {
        self.inner.lock().resolve_and_load(identifier)
    }

    /// Run `f` with exclusive access to the loader.
    pub fn with<R>(&self, f: impl FnOnce(&mut ClassLoader) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    #[test]
    fn test_shared_resolution_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Shared.php");
        fs::write(&file, "").unwrap();

        let shared = SharedLoader::from_config(LoaderConfig::default().with_root_path(dir.path()));
        shared.with(|loader| loader.register_class("Shared", &file)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.resolve_and_load("Shared"))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(shared.with(|loader| loader.loaded_identifiers().len()), 1);
    }
}
