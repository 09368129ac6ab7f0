//! Last-resort recursive search for a file by its stem.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::base::AcceptedExtensions;

/// Recursive directory walk used when every other strategy missed.
///
/// The walk is pre-order (a directory is yielded before its children) and
/// siblings come in the host filesystem's native order. With more than one
/// matching file under the root, which one wins is implementation-defined.
#[derive(Clone, Copy, Debug)]
pub struct FileSystemScanner<'a> {
    extensions: &'a AcceptedExtensions,
}

impl<'a> FileSystemScanner<'a> {
    pub fn new(extensions: &'a AcceptedExtensions) -> Self {
        Self { extensions }
    }

    /// First regular file under `root` whose stem equals `leaf` and whose
    /// extension is accepted. Symlinks are not followed; unreadable entries
    /// are skipped.
    pub fn find(&self, root: &Path, leaf: &str) -> Option<PathBuf> {
        if leaf.is_empty() {
            return None;
        }

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some(leaf);
            if stem_matches && self.extensions.accepts(path) {
                return Some(entry.into_path());
            }
        }
        None
    }
}
