//! Error types for flicksort

use crate::domain::SortError;
use std::io;
use thiserror::Error;

/// Crate-level error
#[derive(Debug, Error)]
pub enum FlickError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid bucket label '{0}'")]
    InvalidLabel(String),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("Failed to open {path}: {message}")]
    OpenError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, FlickError>;
