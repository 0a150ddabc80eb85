//! Hands the current image to the system's default viewer

use crate::error::{FlickError, Result};
use std::path::Path;

/// Opens `path` with the platform default application and waits for the launcher
pub fn open_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(FlickError::OpenError {
            path: path.display().to_string(),
            message: "file does not exist".to_string(),
        });
    }

    tracing::debug!("Opening {} in external viewer", path.display());
    open::that(path).map_err(|e| FlickError::OpenError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
