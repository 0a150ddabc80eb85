//! Flicksort - page through images and file them into numbered folders
//!
//! The library holds the sorting core (scanner, queue, bucket sorter and the
//! session tying them together) plus the pieces of the terminal front end.

pub mod async_preview;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod logging;
pub mod preview;
pub mod session;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    BucketLabel, BucketSorter, Cursor, ExtensionSet, ImageQueue, PathScanner, SortError,
    SortOutcome,
};
pub use error::{FlickError, Result};
pub use file_opener::open_file;
pub use session::{DropOutcome, Session, SessionStatistics};
