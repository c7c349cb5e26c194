//! Bounded in-memory history with most-recent-first indexing.
//!
//! Entries are pushed to the front; once the capacity is reached the oldest
//! entry is evicted. Index 0 is always the newest entry, which is how Up/Down
//! navigation in the line reader addresses them.

use std::collections::VecDeque;

/// Bounded history store.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

/// History of parsed commands (token sequences).
pub type CommandHistory = History<Vec<String>>;

/// History of raw lines, used by [`LineReader::read_line`](crate::LineReader::read_line).
pub type LineHistory = History<String>;

impl<T> History<T> {
    /// Create an empty history holding at most `capacity` entries.
    ///
    /// A capacity of zero stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Add an entry as the newest, evicting the oldest beyond capacity.
    pub fn put(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }

        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Entry at `index`, 0 being the most recent.
    pub fn entry(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }
}
