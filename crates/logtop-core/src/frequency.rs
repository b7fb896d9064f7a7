use crate::store::TokenId;

/// Live count record for one distinct token
#[derive(Clone, Copy, Debug)]
struct Node {
    count: usize,
    /// Position of the token in `FrequencyTable::live`
    slot: usize,
}

/// Result of a count update, passed on to the rank view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeHandle {
    pub token: TokenId,
    /// Count before the update (0 = node was just created)
    pub previous: usize,
    /// Count after the update (0 = node was removed)
    pub count: usize,
}

impl NodeHandle {
    pub fn created(&self) -> bool {
        self.previous == 0
    }

    pub fn removed(&self) -> bool {
        self.count == 0
    }
}

/// Per-token occurrence counts for the current window
///
/// Nodes are kept in an arena indexed by [`TokenId`], so lookups never hash.
/// `live` lists every token with a node, which keeps scans proportional to
/// the number of distinct lines rather than the arena size.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    nodes: Vec<Option<Node>>,
    live: Vec<TokenId>,
    total: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `token`, creating its node if needed
    pub fn increment(&mut self, token: TokenId) -> NodeHandle {
        let idx = token.index();
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
        }
        self.total += 1;

        match &mut self.nodes[idx] {
            Some(node) => {
                node.count += 1;
                NodeHandle {
                    token,
                    previous: node.count - 1,
                    count: node.count,
                }
            }
            empty => {
                *empty = Some(Node {
                    count: 1,
                    slot: self.live.len(),
                });
                self.live.push(token);
                NodeHandle {
                    token,
                    previous: 0,
                    count: 1,
                }
            }
        }
    }

    /// Remove one occurrence of `token`, dropping its node at zero
    ///
    /// Panics if `token` has no live node: every decrement must pair with an
    /// earlier increment.
    pub fn decrement(&mut self, token: TokenId) -> NodeHandle {
        let node = self
            .nodes
            .get_mut(token.index())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("decrement of token {:?} with no live node", token));

        node.count -= 1;
        self.total -= 1;
        let handle = NodeHandle {
            token,
            previous: node.count + 1,
            count: node.count,
        };

        if node.count == 0 {
            let slot = node.slot;
            self.nodes[token.index()] = None;
            self.live.swap_remove(slot);
            if let Some(&moved) = self.live.get(slot) {
                if let Some(moved_node) = self.nodes[moved.index()].as_mut() {
                    moved_node.slot = slot;
                }
            }
        }

        handle
    }

    /// Live count for `token`, 0 if absent
    pub fn count(&self, token: TokenId) -> usize {
        self.nodes
            .get(token.index())
            .and_then(|n| n.as_ref())
            .map_or(0, |n| n.count)
    }

    pub fn contains(&self, token: TokenId) -> bool {
        self.count(token) > 0
    }

    /// Number of distinct live tokens
    pub fn distinct(&self) -> usize {
        self.live.len()
    }

    /// Sum of all live counts
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Iterate `(token, count)` for every live node, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, usize)> + '_ {
        self.live.iter().map(|&t| (t, self.count(t)))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.live.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TokenStore;

    fn tokens(n: usize) -> Vec<TokenId> {
        let mut store = TokenStore::new();
        (0..n).map(|i| store.intern(&[b'a' + i as u8])).collect()
    }

    #[test]
    fn test_increment_creates_then_counts() {
        let t = tokens(1);
        let mut table = FrequencyTable::new();

        let first = table.increment(t[0]);
        assert!(first.created());
        assert_eq!(first.count, 1);

        let second = table.increment(t[0]);
        assert!(!second.created());
        assert_eq!((second.previous, second.count), (1, 2));
        assert_eq!(table.count(t[0]), 2);
        assert_eq!(table.total(), 2);
        assert_eq!(table.distinct(), 1);
    }

    #[test]
    fn test_decrement_to_zero_removes_node() {
        let t = tokens(1);
        let mut table = FrequencyTable::new();
        table.increment(t[0]);

        let handle = table.decrement(t[0]);
        assert!(handle.removed());
        assert!(!table.contains(t[0]));
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_removal_keeps_live_list_consistent() {
        let t = tokens(4);
        let mut table = FrequencyTable::new();
        for &id in &t {
            table.increment(id);
        }
        table.increment(t[3]);

        // Removing the first live entry moves the last one into its slot
        table.decrement(t[0]);
        table.decrement(t[3]);
        table.decrement(t[3]);

        let mut live: Vec<_> = table.iter().collect();
        live.sort();
        assert_eq!(live, vec![(t[1], 1), (t[2], 1)]);
        assert_eq!(table.total(), 2);
    }

    #[test]
    #[should_panic(expected = "with no live node")]
    fn test_decrement_absent_panics() {
        let t = tokens(1);
        let mut table = FrequencyTable::new();
        table.decrement(t[0]);
    }
}
