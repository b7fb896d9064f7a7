//! Terminal UI handling

mod event;
mod terminal;

pub use event::{Event, EventHandler, MAX_TICK_RATE};
pub use terminal::Tui;
