use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};

use logtop_types::TopSnapshot;

use super::Action;
use crate::config::KeyContext;

/// State of the interactive top view
pub struct AppState {
    /// Last snapshot taken from the engine
    pub snapshot: TopSnapshot,

    /// Help overlay visibility
    pub help_visible: bool,

    /// Keep showing the current snapshot while lines keep being counted
    pub paused: bool,

    pub should_quit: bool,

    /// Quit was asked for with Ctrl+C
    pub interrupted: bool,

    /// Wipe the terminal before the next draw
    pub clear_requested: bool,

    /// Time between refreshes
    pub interval: Duration,

    pub started_at: DateTime<Local>,

    /// When `snapshot` was taken
    pub refreshed_at: DateTime<Local>,
}

impl AppState {
    pub fn new(interval: Duration) -> Self {
        let now = Local::now();
        Self {
            snapshot: TopSnapshot::default(),
            help_visible: false,
            paused: false,
            should_quit: false,
            interrupted: false,
            clear_requested: false,
            interval,
            started_at: now,
            refreshed_at: now,
        }
    }

    /// Replace the displayed snapshot unless paused
    pub fn refresh(&mut self, snapshot: TopSnapshot) {
        if self.paused {
            return;
        }
        self.snapshot = snapshot;
        self.refreshed_at = Local::now();
    }

    /// Apply an action, returning true when the screen should be redrawn
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                false
            }
            Action::Interrupt => {
                self.should_quit = true;
                self.interrupted = true;
                false
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                true
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                true
            }
            Action::Redraw => {
                self.clear_requested = true;
                true
            }
        }
    }

    /// Whether the next draw must start from a cleared terminal, resetting the request
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }

    /// Which keybindings apply right now
    pub fn key_context(&self) -> KeyContext {
        if self.help_visible {
            KeyContext::Help
        } else {
            KeyContext::Top
        }
    }

    /// Time since start, as of the last refresh
    pub fn elapsed(&self) -> TimeDelta {
        self.refreshed_at - self.started_at
    }

    /// Average lines read per second since start
    pub fn rate(&self) -> f64 {
        let millis = self.elapsed().num_milliseconds();
        if millis <= 0 {
            return 0.0;
        }
        self.snapshot.total_fed as f64 * 1000.0 / millis as f64
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn elapsed_label(&self) -> String {
        let secs = self.elapsed().num_seconds().max(0);
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total_fed: u64) -> TopSnapshot {
        TopSnapshot {
            total_fed,
            ..Default::default()
        }
    }

    #[test]
    fn test_pause_freezes_snapshot() {
        let mut state = AppState::new(Duration::from_secs(1));
        state.refresh(snapshot(10));
        assert!(state.apply(Action::TogglePause));

        state.refresh(snapshot(20));
        assert_eq!(state.snapshot.total_fed, 10);

        state.apply(Action::TogglePause);
        state.refresh(snapshot(30));
        assert_eq!(state.snapshot.total_fed, 30);
    }

    #[test]
    fn test_help_changes_key_context() {
        let mut state = AppState::new(Duration::from_secs(1));
        assert_eq!(state.key_context(), KeyContext::Top);
        state.apply(Action::ToggleHelp);
        assert_eq!(state.key_context(), KeyContext::Help);
    }

    #[test]
    fn test_quit() {
        let mut state = AppState::new(Duration::from_secs(1));
        assert!(!state.apply(Action::Quit));
        assert!(state.should_quit);
    }

    #[test]
    fn test_interrupt_quits_and_is_remembered() {
        let mut state = AppState::new(Duration::from_secs(1));
        assert!(!state.apply(Action::Interrupt));
        assert!(state.should_quit);
        assert!(state.interrupted);
    }

    #[test]
    fn test_redraw_requests_one_clear() {
        let mut state = AppState::new(Duration::from_secs(1));
        assert!(!state.take_clear_request());
        assert!(state.apply(Action::Redraw));
        assert!(state.take_clear_request());
        assert!(!state.take_clear_request());
    }

    #[test]
    fn test_rate_and_elapsed() {
        let mut state = AppState::new(Duration::from_secs(1));
        state.snapshot = snapshot(500);
        state.refreshed_at = state.started_at + TimeDelta::seconds(3725);
        assert_eq!(state.elapsed_label(), "01:02:05");
        assert!((state.rate() - 500.0 / 3725.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_before_first_refresh() {
        let state = AppState::new(Duration::from_secs(1));
        assert_eq!(state.rate(), 0.0);
    }
}
