use std::collections::HashMap;
use std::sync::Arc;

/// Stable handle for an interned line
///
/// Handles are slot indices and get recycled once a token is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating owner of line contents
///
/// Each distinct line is stored once; the slot table and the lookup index
/// share the same allocation.
#[derive(Debug, Default)]
pub struct TokenStore {
    /// Content per handle (None = free slot)
    slots: Vec<Option<Arc<[u8]>>>,

    /// Content to handle lookup
    index: HashMap<Arc<[u8]>, TokenId>,

    /// Released slots ready for reuse
    free: Vec<TokenId>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `bytes`, storing a copy if the content is new
    pub fn intern(&mut self, bytes: &[u8]) -> TokenId {
        if let Some(&id) = self.index.get(bytes) {
            return id;
        }

        let content: Arc<[u8]> = Arc::from(bytes);
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(Arc::clone(&content));
                id
            }
            None => {
                let raw = u32::try_from(self.slots.len()).expect("token slot space exhausted");
                self.slots.push(Some(Arc::clone(&content)));
                TokenId(raw)
            }
        };
        self.index.insert(content, id);
        id
    }

    /// Free the content behind `id`
    ///
    /// Panics if the handle is not live: releasing twice means the engine lost
    /// track of its references.
    pub fn release(&mut self, id: TokenId) {
        let content = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("release of unknown token {:?}", id));
        self.index.remove(&content);
        self.free.push(id);
    }

    pub fn get(&self, id: TokenId) -> Option<&[u8]> {
        self.slots.get(id.index())?.as_deref()
    }

    /// Shared handle on the content, for callers that outlive the borrow
    pub fn shared(&self, id: TokenId) -> Option<Arc<[u8]>> {
        self.slots.get(id.index())?.clone()
    }

    pub fn lookup(&self, bytes: &[u8]) -> Option<TokenId> {
        self.index.get(bytes).copied()
    }

    /// Number of live tokens
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.free.clear();
    }
}
