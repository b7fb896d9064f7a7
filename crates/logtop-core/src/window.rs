use std::collections::VecDeque;

use crate::store::TokenId;

/// Fixed-capacity FIFO of line occurrences, oldest first
#[derive(Debug)]
pub struct RecencyQueue {
    /// Internal storage
    occurrences: VecDeque<TokenId>,

    /// Maximum capacity
    capacity: usize,

    /// Occurrences pushed since creation
    pushed: u64,
}

impl RecencyQueue {
    /// Create a new queue with the given capacity
    ///
    /// The capacity is validated by [`Engine`](crate::Engine); a zero here
    /// means the caller skipped that check.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "recency queue capacity must be at least 1");
        Self {
            occurrences: VecDeque::with_capacity(capacity.min(1 << 16) + 1),
            capacity,
            pushed: 0,
        }
    }

    /// Append an occurrence, returning the evicted oldest one when the window
    /// overflows
    pub fn push(&mut self, token: TokenId) -> Option<TokenId> {
        self.occurrences.push_back(token);
        self.pushed += 1;

        assert!(
            self.occurrences.len() <= self.capacity + 1,
            "recency queue overflowed by more than one occurrence"
        );
        if self.occurrences.len() > self.capacity {
            self.occurrences.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total pushes, including evicted occurrences
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Arrival sequence number (0-based) of the oldest live occurrence
    pub fn oldest_seq(&self) -> Option<u64> {
        if self.occurrences.is_empty() {
            None
        } else {
            Some(self.pushed - self.occurrences.len() as u64)
        }
    }

    /// Iterate live occurrences, oldest first
    pub fn iter(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.occurrences.iter().copied()
    }

    pub fn clear(&mut self) {
        self.occurrences.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TokenStore;

    fn ids(n: usize) -> Vec<TokenId> {
        let mut store = TokenStore::new();
        (0..n).map(|i| store.intern(format!("line {}", i).as_bytes())).collect()
    }

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let ids = ids(3);
        let mut queue = RecencyQueue::new(3);
        for id in &ids {
            assert_eq!(queue.push(*id), None);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_push_over_capacity_evicts_oldest() {
        let ids = ids(4);
        let mut queue = RecencyQueue::new(3);
        for id in &ids[..3] {
            queue.push(*id);
        }
        assert_eq!(queue.push(ids[3]), Some(ids[0]));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().collect::<Vec<_>>(), ids[1..].to_vec());
    }

    #[test]
    fn test_capacity_one_evicts_same_token() {
        let ids = ids(1);
        let mut queue = RecencyQueue::new(1);
        assert_eq!(queue.push(ids[0]), None);
        assert_eq!(queue.push(ids[0]), Some(ids[0]));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_sequence_numbers() {
        let ids = ids(5);
        let mut queue = RecencyQueue::new(2);
        assert_eq!(queue.oldest_seq(), None);
        for id in &ids {
            queue.push(*id);
        }
        assert_eq!(queue.pushed(), 5);
        assert_eq!(queue.oldest_seq(), Some(3));
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_zero_capacity_panics() {
        RecencyQueue::new(0);
    }
}
