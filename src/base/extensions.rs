//! Ordered file extensions accepted for identifier files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

/// An ordered set of file extensions, stored without the leading dot.
///
/// Order is the tie-break when several variants of a candidate exist:
/// the first extension whose file exists wins and later ones are not probed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedExtensions {
    exts: Vec<SmolStr>,
}

impl AcceptedExtensions {
    /// Build from a list, dropping leading dots, empty entries and duplicates.
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self { exts: Vec::new() };
        for ext in exts {
            set.push(ext.as_ref());
        }
        set
    }

    /// A single-extension set, the legacy loader's shape.
    pub fn single(ext: &str) -> Self {
        Self::new([ext])
    }

    /// Append `ext` unless already present. Returns whether it was added.
    pub fn push(&mut self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() || self.contains(ext) {
            return false;
        }
        self.exts.push(SmolStr::new(ext));
        true
    }

    pub fn contains(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.exts.iter().any(|e| e == ext)
    }

    /// Whether `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.exts.iter().any(|x| x == e))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.exts.iter().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    /// Probe `stem.<ext>` for each extension in order and return the first
    /// regular file found.
    ///
    /// The extension is appended rather than substituted, so a stem that
    /// already contains a dot keeps it.
    pub fn probe(&self, stem: &Path) -> Option<PathBuf> {
        self.iter().find_map(|ext| {
            let candidate = with_appended_extension(stem, ext);
            tracing::trace!(candidate = %candidate.display(), "probing");
            candidate.is_file().then_some(candidate)
        })
    }
}

impl Default for AcceptedExtensions {
    fn default() -> Self {
        Self::new(["php", "inc"])
    }
}

fn with_appended_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
