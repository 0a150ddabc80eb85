use std::path::{Path, PathBuf};

/// Position of the current entry in an [`ImageQueue`].
///
/// `At(len)` is the past-the-end state left behind by removing the last
/// entry. It is normalized to the first entry before anything reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Empty,
    At(usize),
}

/// Ordered images awaiting a decision, plus the cursor over them
#[derive(Debug, Default)]
pub struct ImageQueue {
    images: Vec<PathBuf>,
    cursor: Cursor,
}

impl ImageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends paths in scan order.
    ///
    /// Returns `true` when the queue went from empty to non-empty, in which
    /// case the cursor now points at the first new entry.
    pub fn append<I>(&mut self, paths: I) -> bool
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let was_empty = self.images.is_empty();
        self.images.extend(paths);

        if was_empty && !self.images.is_empty() {
            self.cursor = Cursor::At(0);
            return true;
        }
        false
    }

    /// The path under the cursor, or `None` for an empty queue
    pub fn current(&self) -> Option<&Path> {
        self.position().map(|index| self.images[index].as_path())
    }

    /// Status text such as `"2 / 3"`; empty when there is nothing queued
    pub fn page_label(&self) -> String {
        match self.position() {
            Some(index) => format!("{} / {}", index + 1, self.images.len()),
            None => String::new(),
        }
    }

    /// Moves to the next entry. Returns `false` at the last entry (no wrap).
    pub fn advance(&mut self) -> bool {
        match self.position() {
            Some(index) if index + 1 < self.images.len() => {
                self.cursor = Cursor::At(index + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves to the previous entry. Returns `false` at the first entry.
    pub fn retreat(&mut self) -> bool {
        match self.position() {
            Some(index) if index > 0 => {
                self.cursor = Cursor::At(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Removes the entry under the cursor and returns the new current path.
    ///
    /// The cursor lands on the entry that followed the removed one. Removing
    /// the last entry wraps the cursor to the first one.
    pub fn remove_current(&mut self) -> Option<&Path> {
        let index = self.position()?;
        self.images.remove(index);

        self.cursor = if self.images.is_empty() {
            Cursor::Empty
        } else {
            Cursor::At(index)
        };
        self.normalize();

        self.current()
    }

    /// Zero-based index of the current entry after normalization
    pub fn position(&self) -> Option<usize> {
        match self.cursor {
            Cursor::Empty => None,
            Cursor::At(_) if self.images.is_empty() => None,
            Cursor::At(index) if index >= self.images.len() => Some(0),
            Cursor::At(index) => Some(index),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.images.iter().map(PathBuf::as_path)
    }

    /// Rewrites a past-the-end cursor to the first entry
    fn normalize(&mut self) {
        self.cursor = match self.position() {
            Some(index) => Cursor::At(index),
            None => Cursor::Empty,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(names: &[&str]) -> ImageQueue {
        let mut queue = ImageQueue::new();
        queue.append(names.iter().map(|n| PathBuf::from(format!("/photos/{n}"))));
        queue
    }

    fn current_name(queue: &ImageQueue) -> Option<String> {
        queue
            .current()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    mod empty_queue_tests {
        use super::*;

        #[test]
        fn test_empty_queue_reads() {
            let queue = ImageQueue::new();
            assert!(queue.current().is_none());
            assert_eq!(queue.page_label(), "");
            assert_eq!(queue.cursor(), Cursor::Empty);
            assert!(queue.is_empty());
        }

        #[test]
        fn test_empty_queue_navigation_is_noop() {
            let mut queue = ImageQueue::new();
            assert!(!queue.advance());
            assert!(!queue.retreat());
            assert!(queue.remove_current().is_none());
            assert_eq!(queue.cursor(), Cursor::Empty);
        }

        #[test]
        fn test_append_nothing_keeps_queue_empty() {
            let mut queue = ImageQueue::new();
            assert!(!queue.append(Vec::new()));
            assert_eq!(queue.cursor(), Cursor::Empty);
        }
    }

    mod append_tests {
        use super::*;

        #[test]
        fn test_append_to_empty_selects_first() {
            let mut queue = ImageQueue::new();
            let became_non_empty = queue.append(vec![
                PathBuf::from("/photos/a.png"),
                PathBuf::from("/photos/b.jpg"),
            ]);

            assert!(became_non_empty);
            assert_eq!(queue.current(), Some(Path::new("/photos/a.png")));
            assert_eq!(queue.page_label(), "1 / 2");
        }

        #[test]
        fn test_append_to_non_empty_keeps_cursor() {
            let mut queue = queue_of(&["a.png", "b.jpg"]);
            queue.advance();

            let became_non_empty = queue.append(vec![PathBuf::from("/photos/c.jpeg")]);

            assert!(!became_non_empty);
            assert_eq!(current_name(&queue).as_deref(), Some("b.jpg"));
            assert_eq!(queue.page_label(), "2 / 3");
        }

        #[test]
        fn test_append_keeps_duplicates() {
            let queue = queue_of(&["a.png", "a.png"]);
            assert_eq!(queue.len(), 2);
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_advance_and_retreat() {
            let mut queue = queue_of(&["a.png", "b.jpg", "c.jpeg"]);

            assert!(queue.advance());
            assert_eq!(current_name(&queue).as_deref(), Some("b.jpg"));
            assert_eq!(queue.page_label(), "2 / 3");

            assert!(queue.retreat());
            assert_eq!(current_name(&queue).as_deref(), Some("a.png"));
        }

        #[test]
        fn test_advance_at_last_is_idempotent() {
            let mut queue = queue_of(&["a.png", "b.jpg"]);
            queue.advance();

            for _ in 0..3 {
                assert!(!queue.advance());
                assert_eq!(current_name(&queue).as_deref(), Some("b.jpg"));
            }
        }

        #[test]
        fn test_retreat_at_first_is_idempotent() {
            let mut queue = queue_of(&["a.png", "b.jpg"]);

            for _ in 0..3 {
                assert!(!queue.retreat());
                assert_eq!(current_name(&queue).as_deref(), Some("a.png"));
            }
        }
    }

    mod removal_tests {
        use super::*;

        #[test]
        fn test_remove_middle_moves_to_follower() {
            let mut queue = queue_of(&["a.png", "b.jpg", "c.jpeg", "d.png"]);
            queue.advance();
            assert_eq!(queue.page_label(), "2 / 4");

            let next = queue.remove_current().map(Path::to_path_buf);

            assert_eq!(next, Some(PathBuf::from("/photos/c.jpeg")));
            assert_eq!(queue.len(), 3);
            assert_eq!(queue.page_label(), "2 / 3");
        }

        #[test]
        fn test_remove_last_wraps_to_first() {
            let mut queue = queue_of(&["a.png", "b.jpg", "c.jpeg"]);
            queue.advance();
            queue.advance();

            let next = queue.remove_current().map(Path::to_path_buf);

            assert_eq!(next, Some(PathBuf::from("/photos/a.png")));
            assert_eq!(queue.cursor(), Cursor::At(0));
            assert_eq!(queue.page_label(), "1 / 2");
        }

        #[test]
        fn test_remove_only_entry_empties_queue() {
            let mut queue = queue_of(&["a.png"]);

            assert!(queue.remove_current().is_none());
            assert!(queue.is_empty());
            assert_eq!(queue.cursor(), Cursor::Empty);
            assert_eq!(queue.page_label(), "");
        }

        #[test]
        fn test_refill_after_emptying_selects_first_new_entry() {
            let mut queue = queue_of(&["a.png"]);
            queue.remove_current();

            assert!(queue.append(vec![PathBuf::from("/photos/z.png")]));
            assert_eq!(current_name(&queue).as_deref(), Some("z.png"));
        }

        #[test]
        fn test_cursor_always_resolves_after_removals() {
            let mut queue = queue_of(&["a.png", "b.png", "c.png", "d.png", "e.png"]);
            queue.advance();
            queue.advance();

            while !queue.is_empty() {
                let index = queue.position().unwrap();
                assert!(index < queue.len());
                queue.remove_current();
            }
            assert!(queue.current().is_none());
        }
    }
}
