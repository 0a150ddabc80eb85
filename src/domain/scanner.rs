use super::ExtensionSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Expands dropped filesystem entries into image file paths.
///
/// Discovery is best-effort: missing, hidden, read-only and unreadable
/// entries are skipped without reporting an error.
#[derive(Debug, Clone)]
pub struct PathScanner<'a> {
    extensions: &'a ExtensionSet,
}

impl<'a> PathScanner<'a> {
    pub fn new(extensions: &'a ExtensionSet) -> Self {
        Self { extensions }
    }

    /// Scans `root` and returns every admitted image below it.
    ///
    /// # Behavior
    /// - A missing root yields nothing
    /// - Hidden or read-only files are dropped, as are whole hidden or
    ///   read-only directory trees
    /// - Directory children are visited in file-name order, depth-first
    /// - Symlinks below the root are followed for files only
    /// - Returned paths are absolute
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        let root = match std::path::absolute(root) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("Cannot resolve {}: {}", root.display(), e);
                return Vec::new();
            }
        };

        let found: Vec<PathBuf> = WalkDir::new(&root)
            .sort_by_file_name()
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_protected(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::trace!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| is_file_target(entry) && self.extensions.matches(entry.path()))
            .map(DirEntry::into_path)
            .collect();

        tracing::debug!("Scanned {}: {} image(s)", root.display(), found.len());
        found
    }
}

/// Regular files, or symlinks that resolve to one
fn is_file_target(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
    } else {
        entry.file_type().is_file()
    }
}

/// Read-only or hidden entries are never sorted; dangling links are skipped too
fn is_protected(entry: &DirEntry) -> bool {
    match fs::metadata(entry.path()) {
        Ok(metadata) => metadata.permissions().readonly() || is_hidden(entry.path(), &metadata),
        Err(e) => {
            tracing::trace!("Skipping {}: {}", entry.path().display(), e);
            true
        }
    }
}

#[cfg(windows)]
fn is_hidden(path: &Path, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    has_dot_name(path) || metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(path: &Path, _: &Metadata) -> bool {
    has_dot_name(path)
}

fn has_dot_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
}
