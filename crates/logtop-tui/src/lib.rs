//! Terminal UI for logtop
//!
//! This crate provides the full-screen top view, its keybindings and event
//! handling, and the plain-text reports written to stdout.

pub mod app;
pub mod config;
pub mod report;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use report::{format_line_by_line, format_summary, write_line_by_line, write_summary};
pub use tui::{Event, EventHandler, Tui, MAX_TICK_RATE};
pub use ui::components::{HelpOverlay, StatusBar};
pub use ui::screens::TopScreen;
pub use ui::{Layout, Theme};
