use std::sync::Arc;

use parking_lot::Mutex;

use logtop_types::{RankedLine, TopSnapshot};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::rank::RankStrategy;

/// Thread-safe handle on an [`Engine`]
///
/// Every call takes the lock once for its whole duration; feeds and queries
/// are bounded, so no finer locking is needed. Clones share the same engine.
#[derive(Clone, Debug)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(capacity: usize, strategy: RankStrategy) -> Result<Self, EngineError> {
        Ok(Self::from_engine(Engine::with_strategy(capacity, strategy)?))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn feed(&self, line: &[u8]) {
        self.inner.lock().feed(line);
    }

    /// Feed several lines under a single lock
    pub fn feed_batch<I, L>(&self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut engine = self.inner.lock();
        for line in lines {
            engine.feed(line.as_ref());
        }
    }

    pub fn top(&self, n: usize) -> Vec<RankedLine> {
        self.inner.lock().top(n)
    }

    pub fn snapshot(&self, n: usize) -> TopSnapshot {
        self.inner.lock().snapshot(n)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take the engine back, if this is the last handle
    pub fn into_inner(self) -> Option<Engine> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let shared = SharedEngine::new(10, RankStrategy::Scan).unwrap();
        let other = shared.clone();
        shared.feed(b"a");
        other.feed(b"a");
        assert_eq!(shared.top(1)[0].count, 2);
    }

    #[test]
    fn test_concurrent_feeds_and_queries() {
        let shared = SharedEngine::new(50, RankStrategy::Ordered).unwrap();

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let engine = shared.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        engine.feed(format!("writer {} line {}", w, i % 5).as_bytes());
                    }
                })
            })
            .collect();

        let reader = {
            let engine = shared.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = engine.snapshot(5);
                    assert!(snapshot.window_len <= 50);
                    assert!(snapshot.rows.len() <= 5);
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        assert_eq!(shared.len(), 50);
        let engine = shared.into_inner().unwrap();
        engine.check_invariants();
        assert_eq!(engine.total_fed(), 2000);
    }

    #[test]
    fn test_feed_batch() {
        let shared = SharedEngine::new(3, RankStrategy::Scan).unwrap();
        shared.feed_batch(vec![b"x".to_vec(), b"y".to_vec(), b"x".to_vec()]);
        let top = shared.top(2);
        assert_eq!(&*top[0].line, b"x");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_into_inner_with_live_clone() {
        let shared = SharedEngine::new(3, RankStrategy::Scan).unwrap();
        let _other = shared.clone();
        assert!(shared.into_inner().is_none());
    }
}
