use std::collections::HashMap;

use tracing::{debug, trace};

use logtop_types::{RankedLine, TopSnapshot};

use crate::error::EngineError;
use crate::frequency::FrequencyTable;
use crate::rank::{RankStrategy, RankView};
use crate::store::TokenStore;
use crate::window::RecencyQueue;

/// Sliding-window frequency engine
///
/// Keeps the last `capacity` lines fed and ranks the distinct ones by how
/// often they occur in that window. All mutation goes through [`feed`];
/// queries never mutate.
///
/// [`feed`]: Engine::feed
#[derive(Debug)]
pub struct Engine {
    store: TokenStore,
    window: RecencyQueue,
    table: FrequencyTable,
    rank: Box<dyn RankView>,
    strategy: RankStrategy,
}

impl Engine {
    /// Create an engine using the default rank strategy
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        Self::with_strategy(capacity, RankStrategy::default())
    }

    pub fn with_strategy(capacity: usize, strategy: RankStrategy) -> Result<Self, EngineError> {
        if capacity == 0 {
            return Err(EngineError::ZeroCapacity);
        }

        Ok(Self {
            store: TokenStore::new(),
            window: RecencyQueue::new(capacity),
            table: FrequencyTable::new(),
            rank: strategy.build(),
            strategy,
        })
    }

    /// Record one line
    ///
    /// The evicted occurrence is decremented before the new one is counted, so
    /// a line re-fed exactly at the eviction boundary keeps a stable count.
    pub fn feed(&mut self, line: &[u8]) {
        let id = self.store.intern(line);

        if let Some(evicted) = self.window.push(id) {
            let node = self.table.decrement(evicted);
            self.rank.update(node, &self.store);
            trace!(token = evicted.index(), count = node.count, "evicted oldest occurrence");

            if node.removed() && evicted != id {
                trace!(token = evicted.index(), "released evicted line");
                self.store.release(evicted);
            }
        }

        let node = self.table.increment(id);
        self.rank.update(node, &self.store);
    }

    /// The `n` most frequent lines of the current window
    pub fn top(&self, n: usize) -> Vec<RankedLine> {
        let window_len = self.window.len();

        self.rank
            .top(n, &self.table, &self.store)
            .into_iter()
            .enumerate()
            .map(|(i, (id, count))| {
                let Some(line) = self.store.shared(id) else {
                    panic!("ranked token {:?} missing from the store", id);
                };
                RankedLine::new(i + 1, line, count, window_len)
            })
            .collect()
    }

    /// `top(n)` together with the window statistics
    pub fn snapshot(&self, n: usize) -> TopSnapshot {
        TopSnapshot {
            rows: self.top(n),
            window_len: self.window.len(),
            capacity: self.window.capacity(),
            distinct: self.table.distinct(),
            total_fed: self.window.pushed(),
        }
    }

    /// Occurrences currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Distinct lines currently in the window
    pub fn distinct(&self) -> usize {
        self.table.distinct()
    }

    /// Lines fed since creation, including evicted ones
    pub fn total_fed(&self) -> u64 {
        self.window.pushed()
    }

    pub fn strategy(&self) -> RankStrategy {
        self.strategy
    }

    /// Live count of `line` in the window, 0 if absent
    pub fn count_of(&self, line: &[u8]) -> usize {
        self.store
            .lookup(line)
            .map_or(0, |id| self.table.count(id))
    }

    /// Verify the cross-structure invariants, panicking on the first violation
    pub fn check_invariants(&self) {
        assert!(
            self.window.len() <= self.window.capacity(),
            "window holds {} occurrences, capacity is {}",
            self.window.len(),
            self.window.capacity()
        );
        assert_eq!(
            self.table.total(),
            self.window.len(),
            "sum of counts differs from window size"
        );

        let mut expected: HashMap<_, usize> = HashMap::new();
        for id in self.window.iter() {
            *expected.entry(id).or_default() += 1;
        }
        assert_eq!(
            expected.len(),
            self.table.distinct(),
            "node count differs from distinct lines in the window"
        );
        for (id, count) in self.table.iter() {
            assert!(count > 0, "node {:?} kept with zero count", id);
            assert_eq!(
                expected.get(&id).copied(),
                Some(count),
                "count of {:?} differs from its occurrences",
                id
            );
            assert!(self.store.get(id).is_some(), "live node {:?} has no content", id);
        }
        assert_eq!(
            self.store.len(),
            self.table.distinct(),
            "store keeps lines that are no longer in the window"
        );
    }

    /// Release every occurrence, node and line
    pub fn teardown(mut self) {
        debug!(
            window = self.window.len(),
            distinct = self.table.distinct(),
            total_fed = self.window.pushed(),
            "tearing down engine"
        );
        self.window.clear();
        self.table.clear();
        self.rank.clear();
        self.store.clear();
    }
}
