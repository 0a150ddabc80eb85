//! Sorting session: the queue plus everything the UI asks of it

use crate::domain::{
    BucketLabel, BucketSorter, ExtensionSet, ImageQueue, PathScanner, SortError, SortOutcome,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What a drop batch did to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropOutcome {
    /// Images appended by this batch
    pub added: usize,
    /// The queue was empty before and now shows its first image
    pub became_non_empty: bool,
}

/// Counters shown in the end-of-session summary
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatistics {
    pub discovered: usize,
    pub sorted: BTreeMap<BucketLabel, usize>,
    pub failed: usize,
    pub remaining: usize,
}

impl SessionStatistics {
    pub fn total_sorted(&self) -> usize {
        self.sorted.values().sum()
    }
}

/// Owns the image queue for the lifetime of the application.
///
/// Every mutating call takes `&mut self`, so queue updates can never
/// interleave.
#[derive(Debug)]
pub struct Session {
    queue: ImageQueue,
    extensions: ExtensionSet,
    discovered: usize,
    sorted: BTreeMap<BucketLabel, usize>,
    failed: usize,
}

impl Session {
    pub fn new(extensions: ExtensionSet) -> Self {
        Self {
            queue: ImageQueue::new(),
            extensions,
            discovered: 0,
            sorted: BTreeMap::new(),
            failed: 0,
        }
    }

    /// Scans every dropped root and appends the results in order
    pub fn drop_paths<I, P>(&mut self, roots: I) -> DropOutcome
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let scanner = PathScanner::new(&self.extensions);
        let found: Vec<PathBuf> = roots
            .into_iter()
            .flat_map(|root| scanner.scan(root.as_ref()))
            .collect();

        let added = found.len();
        let became_non_empty = self.queue.append(found);
        self.discovered += added;

        tracing::info!("Drop added {} image(s), {} queued", added, self.queue.len());
        DropOutcome {
            added,
            became_non_empty,
        }
    }

    pub fn next(&mut self) -> bool {
        self.queue.advance()
    }

    pub fn previous(&mut self) -> bool {
        self.queue.retreat()
    }

    /// Moves the current image into bucket `label` and advances
    pub fn sort(&mut self, label: &BucketLabel) -> Result<SortOutcome, SortError> {
        match BucketSorter::sort(&mut self.queue, label) {
            Ok(outcome) => {
                if matches!(outcome, SortOutcome::Moved { .. }) {
                    *self.sorted.entry(label.clone()).or_insert(0) += 1;
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("Sort into bucket {} failed: {}", label, e);
                self.failed += 1;
                Err(e)
            }
        }
    }

    pub fn current(&self) -> Option<&Path> {
        self.queue.current()
    }

    pub fn page_label(&self) -> String {
        self.queue.page_label()
    }

    pub fn queue(&self) -> &ImageQueue {
        &self.queue
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn statistics(&self) -> SessionStatistics {
        SessionStatistics {
            discovered: self.discovered,
            sorted: self.sorted.clone(),
            failed: self.failed,
            remaining: self.queue.len(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ExtensionSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_dir() -> TempDir {
        tempfile::Builder::new().prefix("session").tempdir().unwrap()
    }

    fn label(s: &str) -> BucketLabel {
        BucketLabel::new(s).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::default();
        assert!(session.current().is_none());
        assert_eq!(session.page_label(), "");
        assert_eq!(session.statistics(), SessionStatistics::default());
    }

    #[test]
    fn test_empty_session_sort_is_noop() {
        let mut session = Session::default();
        let outcome = session.sort(&label("1")).unwrap();
        assert_eq!(outcome, SortOutcome::NothingToSort);
        assert_eq!(session.statistics().total_sorted(), 0);
    }

    #[test]
    fn test_drop_reports_transition_once() {
        let temp_dir = test_dir();
        let dir = temp_dir.path();
        fs::write(dir.join("a.png"), b"a").unwrap();
        fs::write(dir.join("b.jpg"), b"b").unwrap();

        let mut session = Session::default();
        let first = session.drop_paths([dir.join("a.png")]);
        let second = session.drop_paths([dir.join("b.jpg")]);

        assert_eq!(
            first,
            DropOutcome {
                added: 1,
                became_non_empty: true
            }
        );
        assert_eq!(
            second,
            DropOutcome {
                added: 1,
                became_non_empty: false
            }
        );
        assert_eq!(session.page_label(), "1 / 2");
    }

    #[test]
    fn test_drop_of_nothing_useful() {
        let temp_dir = test_dir();
        let dir = temp_dir.path();
        fs::write(dir.join("readme.txt"), b"r").unwrap();

        let mut session = Session::default();
        let outcome = session.drop_paths([dir.join("readme.txt"), dir.join("missing.png")]);

        assert_eq!(outcome, DropOutcome::default());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_drop_concatenates_roots_in_order() {
        let temp_dir = test_dir();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("first")).unwrap();
        fs::create_dir(dir.join("second")).unwrap();
        fs::write(dir.join("first").join("z.png"), b"z").unwrap();
        fs::write(dir.join("second").join("a.png"), b"a").unwrap();

        let mut session = Session::default();
        session.drop_paths([dir.join("second"), dir.join("first")]);

        let order: Vec<_> = session.queue().iter().map(Path::to_path_buf).collect();
        assert_eq!(
            order,
            vec![dir.join("second").join("a.png"), dir.join("first").join("z.png")]
        );
    }

    #[test]
    fn test_sort_updates_statistics() {
        let temp_dir = test_dir();
        let dir = temp_dir.path();
        for name in ["a.png", "b.png", "c.png"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::write(dir.join("9"), b"blocks bucket 9").unwrap();

        let mut session = Session::default();
        session.drop_paths([dir]);

        session.sort(&label("1")).unwrap();
        session.sort(&label("1")).unwrap();
        assert!(session.sort(&label("9")).is_err());

        let stats = session.statistics();
        assert_eq!(stats.discovered, 3);
        assert_eq!(stats.sorted.get(&label("1")), Some(&2));
        assert_eq!(stats.total_sorted(), 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.remaining, 1);
    }

    #[test]
    fn test_navigation_reports_changes() {
        let temp_dir = test_dir();
        let dir = temp_dir.path();
        fs::write(dir.join("a.png"), b"a").unwrap();
        fs::write(dir.join("b.png"), b"b").unwrap();

        let mut session = Session::default();
        session.drop_paths([dir]);

        assert!(!session.previous());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.page_label(), "2 / 2");
    }
}
