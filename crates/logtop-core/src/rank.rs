use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EngineError;
use crate::frequency::{FrequencyTable, NodeHandle};
use crate::store::{TokenId, TokenStore};

/// Answers "top N by count" over the frequency table
///
/// Results are ordered by descending count; equal counts are ordered by line
/// content, ascending bytewise. Every implementation must return the same
/// sequence for the same table.
pub trait RankView: Send + fmt::Debug {
    /// Called after every count change, before the token can be released
    fn update(&mut self, node: NodeHandle, store: &TokenStore);

    /// The `n` highest-count live tokens
    fn top(&self, n: usize, table: &FrequencyTable, store: &TokenStore) -> Vec<(TokenId, usize)>;

    fn clear(&mut self);
}

/// Which [`RankView`] an engine uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankStrategy {
    /// Keep no order, scan all live nodes per query
    #[default]
    Scan,
    /// Keep nodes sorted on every update
    Ordered,
}

impl RankStrategy {
    pub fn build(self) -> Box<dyn RankView> {
        match self {
            RankStrategy::Scan => Box::new(ScanRank),
            RankStrategy::Ordered => Box::new(OrderedRank::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankStrategy::Scan => "scan",
            RankStrategy::Ordered => "ordered",
        }
    }
}

impl fmt::Display for RankStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(RankStrategy::Scan),
            "ordered" => Ok(RankStrategy::Ordered),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

// ============================================================================
// Scan at query time
// ============================================================================

/// Rank view that does no work per feed and O(distinct) work per query
///
/// Queries are rate-limited by the display interval while feeds arrive
/// continuously, so this is the default.
#[derive(Debug, Default)]
pub struct ScanRank;

impl RankView for ScanRank {
    fn update(&mut self, _node: NodeHandle, _store: &TokenStore) {}

    fn top(&self, n: usize, table: &FrequencyTable, store: &TokenStore) -> Vec<(TokenId, usize)> {
        if n == 0 {
            return Vec::new();
        }

        let by_rank = |a: &(TokenId, usize), b: &(TokenId, usize)| -> Ordering {
            b.1.cmp(&a.1).then_with(|| {
                let left = store.get(a.0).unwrap_or_default();
                let right = store.get(b.0).unwrap_or_default();
                left.cmp(right)
            })
        };

        let mut nodes: Vec<(TokenId, usize)> = table.iter().collect();
        if n < nodes.len() {
            nodes.select_nth_unstable_by(n - 1, by_rank);
            nodes.truncate(n);
        }
        nodes.sort_unstable_by(by_rank);
        nodes
    }

    fn clear(&mut self) {}
}

// ============================================================================
// Maintained order
// ============================================================================

type RankKey = (Reverse<usize>, Arc<[u8]>, TokenId);

/// Rank view that keeps every live node sorted, O(log distinct) per feed
#[derive(Debug, Default)]
pub struct OrderedRank {
    order: BTreeSet<RankKey>,
}

impl OrderedRank {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RankView for OrderedRank {
    fn update(&mut self, node: NodeHandle, store: &TokenStore) {
        let Some(content) = store.shared(node.token) else {
            panic!("rank update for token {:?} missing from the store", node.token);
        };

        if node.previous > 0 {
            let removed = self
                .order
                .remove(&(Reverse(node.previous), Arc::clone(&content), node.token));
            assert!(removed, "rank order lost token {:?}", node.token);
        }
        if node.count > 0 {
            self.order.insert((Reverse(node.count), content, node.token));
        }
    }

    fn top(&self, n: usize, _table: &FrequencyTable, _store: &TokenStore) -> Vec<(TokenId, usize)> {
        self.order
            .iter()
            .take(n)
            .map(|(Reverse(count), _, token)| (*token, *count))
            .collect()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(
        view: &mut dyn RankView,
        table: &mut FrequencyTable,
        store: &mut TokenStore,
        line: &[u8],
    ) -> TokenId {
        let id = store.intern(line);
        let handle = table.increment(id);
        view.update(handle, store);
        id
    }

    fn lines(top: &[(TokenId, usize)], store: &TokenStore) -> Vec<(Vec<u8>, usize)> {
        top.iter()
            .map(|&(id, c)| (store.get(id).unwrap().to_vec(), c))
            .collect()
    }

    fn check_strategy(strategy: RankStrategy) {
        let mut view = strategy.build();
        let mut table = FrequencyTable::new();
        let mut store = TokenStore::new();

        let input: [&[u8]; 7] = [b"b", b"c", b"a", b"c", b"d", b"c", b"a"];
        for line in input {
            feed(view.as_mut(), &mut table, &mut store, line);
        }

        let top = view.top(3, &table, &store);
        assert_eq!(
            lines(&top, &store),
            vec![(b"c".to_vec(), 3), (b"a".to_vec(), 2), (b"b".to_vec(), 1)]
        );

        let all = view.top(10, &table, &store);
        assert_eq!(all.len(), 4);
        assert!(view.top(0, &table, &store).is_empty());
    }

    #[test]
    fn test_scan_rank_orders_by_count_then_content() {
        check_strategy(RankStrategy::Scan);
    }

    #[test]
    fn test_ordered_rank_orders_by_count_then_content() {
        check_strategy(RankStrategy::Ordered);
    }

    #[test]
    fn test_ordered_rank_follows_decrements() {
        let mut view = OrderedRank::default();
        let mut table = FrequencyTable::new();
        let mut store = TokenStore::new();

        let a = feed(&mut view, &mut table, &mut store, b"a");
        feed(&mut view, &mut table, &mut store, b"a");
        feed(&mut view, &mut table, &mut store, b"b");

        view.update(table.decrement(a), &store);
        view.update(table.decrement(a), &store);

        assert_eq!(view.len(), 1);
        assert_eq!(lines(&view.top(5, &table, &store), &store), vec![(b"b".to_vec(), 1)]);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("scan".parse::<RankStrategy>(), Ok(RankStrategy::Scan));
        assert_eq!(" Ordered ".parse::<RankStrategy>(), Ok(RankStrategy::Ordered));
        assert_eq!(
            "heap".parse::<RankStrategy>(),
            Err(EngineError::UnknownStrategy("heap".to_string()))
        );
        assert_eq!(RankStrategy::default().to_string(), "scan");
    }
}
