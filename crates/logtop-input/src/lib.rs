//! Line input for logtop
//!
//! This crate reads newline-separated records from stdin (or any async
//! reader) and hands them to the main loop in batches.

mod reader;

pub use reader::{strip_line_ending, LineBatch, LineReader, BATCH_SIZE, CHANNEL_DEPTH};
