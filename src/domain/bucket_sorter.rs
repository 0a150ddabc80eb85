use super::{BucketLabel, ImageQueue};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result of a sort request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// The queue had no current image
    NothingToSort,
    /// The image was moved and dropped from the queue
    Moved { from: PathBuf, to: PathBuf },
}

/// Reasons a sort left the queue untouched
#[derive(Debug, Error)]
pub enum SortError {
    #[error("Could not create bucket {}: {source}", .dir.display())]
    BucketCreateFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not move {} to {}: {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Moves the current image into `<its directory>/<label>/`.
///
/// Stateless: every call works from the queue and the filesystem alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketSorter;

impl BucketSorter {
    /// Sorts the current image of `queue` into the bucket named `label`.
    ///
    /// On success the entry is removed and the cursor moves to the image that
    /// followed it. On failure the queue and the filesystem are unchanged
    /// (apart from a newly created, empty bucket). An existing file at the
    /// destination is never overwritten; the filesystem enforces this through
    /// a hard link, except on filesystems without hard links, where a file
    /// created between the existence check and the rename could be replaced.
    pub fn sort(queue: &mut ImageQueue, label: &BucketLabel) -> Result<SortOutcome, SortError> {
        let Some(from) = queue.current().map(Path::to_path_buf) else {
            return Ok(SortOutcome::NothingToSort);
        };

        let to = Self::destination(&from, label)
            .ok_or_else(|| SortError::MoveFailed {
                from: from.clone(),
                to: PathBuf::new(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })?;

        if let Some(bucket_dir) = to.parent() {
            ensure_bucket_dir(bucket_dir)?;
        }

        move_file(&from, &to).map_err(|source| SortError::MoveFailed {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        tracing::info!("Moved {} -> {}", from.display(), to.display());
        queue.remove_current();

        Ok(SortOutcome::Moved { from, to })
    }

    /// `<dir>/<label>/<name>` for an image at `<dir>/<name>`
    pub fn destination(image: &Path, label: &BucketLabel) -> Option<PathBuf> {
        let name = image.file_name()?;
        let dir = image.parent()?;
        Some(dir.join(label.as_str()).join(name))
    }
}

/// Creates the single bucket segment, reusing an existing directory
fn ensure_bucket_dir(dir: &Path) -> Result<(), SortError> {
    match fs::create_dir(dir) {
        Ok(()) => {
            tracing::debug!("Created bucket {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(SortError::BucketCreateFailed {
            dir: dir.to_path_buf(),
            source,
        }),
    }
}

/// Moves `from` to `to` without ever replacing an existing `to`.
///
/// Same filesystem: hard link then unlink, so the kernel refuses an existing
/// destination. Filesystems without hard links fall back to check-then-rename.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => fs::remove_file(from).inspect_err(|_| discard(to)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(e),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!("Cross-device move, copying {}", from.display());
            copy_then_remove(from, to)
        }
        Err(e) => {
            tracing::trace!("No hard link for {}: {}", from.display(), e);
            rename_no_clobber(from, to)
        }
    }
}

fn rename_no_clobber(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(e) => Err(e),
    }
}

/// Copies `from` into a newly created `to`, then deletes `from`.
///
/// Any failure removes what was written at `to`, so the source stays the
/// only copy and a later attempt starts clean.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let mut source = File::open(from)?;
    let permissions = source.metadata()?.permissions();
    let mut target = OpenOptions::new().write(true).create_new(true).open(to)?;

    let copied = io::copy(&mut source, &mut target)
        .and_then(|_| target.sync_all())
        .and_then(|()| fs::set_permissions(to, permissions))
        .and_then(|()| fs::remove_file(from));
    drop(target);

    copied.inspect_err(|_| discard(to))
}

/// Best-effort removal of a half-finished destination
fn discard(to: &Path) {
    if let Err(e) = fs::remove_file(to) {
        tracing::warn!("Could not clean up {}: {}", to.display(), e);
    }
}
