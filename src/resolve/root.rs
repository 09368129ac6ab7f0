//! Scan root for the filesystem-search strategy.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use once_cell::unsync::OnceCell;

/// Environment variable naming the host's document root.
pub const DOCUMENT_ROOT_ENV: &str = "DOCUMENT_ROOT";

/// The directory searched by the last-resort strategy.
///
/// Computed on first use from, in order: an explicit setting, the
/// `DOCUMENT_ROOT` environment variable, the install directory. The result is
/// normalized and kept for the lifetime of the value.
#[derive(Clone, Debug, Default)]
pub struct RootPath {
    explicit: Option<PathBuf>,
    resolved: OnceCell<PathBuf>,
}

impl RootPath {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            resolved: OnceCell::new(),
        }
    }

    /// Override the root. Replaces any previously computed value.
    pub fn set(&mut self, path: impl Into<PathBuf>) {
        self.explicit = Some(path.into());
        self.resolved = OnceCell::new();
    }

    /// The explicit setting, if any.
    pub fn explicit(&self) -> Option<&Path> {
        self.explicit.as_deref()
    }

    /// The root, computing it on first call.
    pub fn get(&self) -> &Path {
        self.resolved.get_or_init(|| {
            let root = compute_root(
                self.explicit.as_deref(),
                std::env::var_os(DOCUMENT_ROOT_ENV),
                &install_dir(),
            );
            tracing::debug!(root = %root.display(), "scan root resolved");
            root
        })
    }
}

/// Pick and normalize the scan root from its possible sources.
pub fn compute_root(explicit: Option<&Path>, document_root: Option<OsString>, install: &Path) -> PathBuf {
    let raw = match (explicit, document_root) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(env)) if !env.is_empty() => PathBuf::from(env),
        _ => install.to_path_buf(),
    };
    normalize(&raw)
}

/// Resolve symlinks when the path exists; otherwise collapse redundant
/// separators and `.` components lexically.
pub fn normalize(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect(),
    }
}

/// Directory of the running executable, or the working directory when that
/// cannot be determined.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
