pub mod bucket_sorter;
pub mod queue;
pub mod scanner;

pub use bucket_sorter::{BucketSorter, SortError, SortOutcome};
pub use queue::{Cursor, ImageQueue};
pub use scanner::PathScanner;

use crate::error::{FlickError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Extensions recognised as images when nothing else is configured
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Longest label accepted for a bucket folder
const MAX_LABEL_LEN: usize = 16;

/// Fixed allow-list of image file suffixes.
///
/// Entries are stored lower-cased and without the leading dot, so membership
/// checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Builds a set from user-supplied suffixes such as `"PNG"` or `".jpg"`.
    ///
    /// Blank entries are ignored; a list with nothing left is rejected.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if extensions.is_empty() {
            return Err(FlickError::ConfigError(
                "At least one image extension is required".to_string(),
            ));
        }

        Ok(Self { extensions })
    }

    pub fn contains(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.').to_lowercase();
        self.extensions.contains(&ext)
    }

    /// Whether the file name at `path` ends in one of the recognised suffixes
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.contains(ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Name of a destination bucket folder.
///
/// Labels become a single path segment next to the image, so anything that
/// could escape the containing directory is refused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketLabel(String);

impl BucketLabel {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let valid = !label.is_empty()
            && label.chars().count() <= MAX_LABEL_LEN
            && label != "."
            && label != ".."
            && !label.contains(['/', '\\', '\0']);

        if valid {
            Ok(Self(label))
        } else {
            Err(FlickError::InvalidLabel(label))
        }
    }

    /// Label for one of the ten digit buckets
    pub fn digit(digit: u8) -> Option<Self> {
        (digit <= 9).then(|| Self(digit.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod extension_set_tests {
        use super::*;

        #[test]
        fn test_default_extensions() {
            let set = ExtensionSet::default();
            assert!(set.contains("png"));
            assert!(set.contains("jpg"));
            assert!(set.contains("jpeg"));
            assert!(!set.contains("gif"));
        }

        #[test]
        fn test_contains_is_case_insensitive() {
            let set = ExtensionSet::default();
            assert!(set.contains("PNG"));
            assert!(set.contains("JpEg"));
            assert!(set.contains(".jpg"));
        }

        #[test]
        fn test_matches_path() {
            let set = ExtensionSet::default();
            assert!(set.matches(Path::new("/photos/cat.PNG")));
            assert!(!set.matches(Path::new("/photos/notes.txt")));
            assert!(!set.matches(Path::new("/photos/png")));
            assert!(!set.matches(Path::new("/photos/.png")));
        }

        #[test]
        fn test_new_normalizes_entries() {
            let set = ExtensionSet::new([".WEBP", " gif ", ""]).unwrap();
            let exts: Vec<_> = set.iter().collect();
            assert_eq!(exts, vec!["gif", "webp"]);
        }

        #[test]
        fn test_new_rejects_empty_list() {
            assert!(ExtensionSet::new(Vec::<String>::new()).is_err());
            assert!(ExtensionSet::new(["", "."]).is_err());
        }
    }

    mod bucket_label_tests {
        use super::*;

        #[test]
        fn test_digit_labels() {
            assert_eq!(BucketLabel::digit(0).unwrap().as_str(), "0");
            assert_eq!(BucketLabel::digit(9).unwrap().as_str(), "9");
            assert!(BucketLabel::digit(10).is_none());
        }

        #[test]
        fn test_short_labels_accepted() {
            assert!(BucketLabel::new("5").is_ok());
            assert!(BucketLabel::new("keep").is_ok());
        }

        #[test]
        fn test_invalid_labels_rejected() {
            assert!(BucketLabel::new("").is_err());
            assert!(BucketLabel::new(".").is_err());
            assert!(BucketLabel::new("..").is_err());
            assert!(BucketLabel::new("a/b").is_err());
            assert!(BucketLabel::new("a\\b").is_err());
            assert!(BucketLabel::new("x".repeat(17)).is_err());
        }
    }
}
