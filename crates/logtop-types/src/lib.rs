//! Shared types for logtop
//!
//! This crate contains data structures used across multiple logtop crates.

use std::sync::Arc;

/// Default number of lines kept in the sliding window
pub const DEFAULT_WINDOW_SIZE: usize = 10_000;

/// Character shown in place of bytes that cannot be displayed
pub const PLACEHOLDER: char = '.';

// ============================================================================
// Ranking Types
// ============================================================================

/// One row of a top query
#[derive(Clone, Debug, PartialEq)]
pub struct RankedLine {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Raw line content, exactly as fed
    pub line: Arc<[u8]>,
    /// Occurrences of the line inside the current window
    pub count: usize,
    /// Share of the current window, in percent
    pub frequency: f64,
}

impl RankedLine {
    pub fn new(rank: usize, line: Arc<[u8]>, count: usize, window_len: usize) -> Self {
        Self {
            rank,
            line,
            count,
            frequency: percent(count, window_len),
        }
    }

    /// Share of the current window as a fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        self.frequency / 100.0
    }

    /// Line content with non-printable bytes replaced
    pub fn display(&self) -> String {
        printable(&self.line)
    }
}

/// A top query together with the window statistics it was taken from
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopSnapshot {
    pub rows: Vec<RankedLine>,
    /// Occurrences currently in the window
    pub window_len: usize,
    /// Maximum occurrences the window can hold
    pub capacity: usize,
    /// Distinct lines currently in the window
    pub distinct: usize,
    /// Lines fed since start, including evicted ones
    pub total_fed: u64,
}

impl TopSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Presentation helpers
// ============================================================================

/// Percentage of `count` over `total`, 0 when the total is empty
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

/// Render raw line bytes for display.
///
/// Valid UTF-8 is kept, control characters become [`PLACEHOLDER`] and every
/// byte of an invalid sequence becomes one [`PLACEHOLDER`].
pub fn printable(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            if c.is_control() {
                out.push(PLACEHOLDER);
            } else {
                out.push(c);
            }
        }
        for _ in chunk.invalid() {
            out.push(PLACEHOLDER);
        }
    }
    out
}
