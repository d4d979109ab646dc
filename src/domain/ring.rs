//! Fixed-capacity, insertion-ordered buffer with drop-oldest eviction.

use std::collections::VecDeque;

/// Bounded FIFO buffer. Pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `item` as the newest entry, returning the evicted oldest one.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Entries from newest to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }

    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Owned copy of the entries, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}
