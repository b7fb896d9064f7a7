//! Sliding-window line frequency engine for logtop
//!
//! This crate keeps the last N lines of a stream and answers "which lines are
//! the most frequent right now" queries.
//!
//! ```text
//! feed ──► TokenStore ──► RecencyQueue ──► FrequencyTable ──► RankView ──► top
//! ```

mod engine;
mod error;
mod frequency;
mod rank;
mod shared;
mod store;
mod window;

pub use engine::Engine;
pub use error::EngineError;
pub use frequency::{FrequencyTable, NodeHandle};
pub use rank::{OrderedRank, RankStrategy, RankView, ScanRank};
pub use shared::SharedEngine;
pub use store::{TokenId, TokenStore};
pub use window::RecencyQueue;

// Re-export types used in our public API
pub use logtop_types::{RankedLine, TopSnapshot};
