use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Longest supported refresh period
pub const MAX_TICK_RATE: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest supported refresh period
const MIN_TICK_RATE: Duration = Duration::from_millis(1);

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Refresh tick (display interval elapsed)
    Tick,
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Error occurred
    Error(String),
}

/// Event handler producing refresh ticks and, when attached to a terminal,
/// key and resize events
pub struct EventHandler {
    /// Event receiver
    receiver: mpsc::UnboundedReceiver<Event>,
    /// Cancellation token for graceful shutdown
    cancel: CancellationToken,
    /// Task handle
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// Ticks plus terminal input, for the interactive view
    pub fn new(tick_rate: Duration) -> Self {
        Self::spawn(tick_rate, true)
    }

    /// Ticks only, for output modes that do not own the terminal
    pub fn ticks_only(tick_rate: Duration) -> Self {
        Self::spawn(tick_rate, false)
    }

    fn spawn(tick_rate: Duration, with_terminal: bool) -> Self {
        // Tokio panics on a zero period and on deadlines past the end of time
        let tick_rate = tick_rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let mut reader = with_terminal.then(EventStream::new);
                let now = tokio::time::Instant::now();
                let mut tick_interval =
                    tokio::time::interval_at(now.checked_add(tick_rate).unwrap_or(now), tick_rate);
                tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    let tick = tick_interval.tick();
                    let crossterm_event = async {
                        match reader.as_mut() {
                            Some(reader) => reader.next().await,
                            None => std::future::pending().await,
                        }
                    }
                    .fuse();

                    tokio::select! {
                        _ = cancel.cancelled() => break,

                        _ = tick => {
                            if sender.send(Event::Tick).is_err() {
                                break;
                            }
                        }

                        maybe_event = crossterm_event => {
                            match maybe_event {
                                Some(Ok(evt)) => {
                                    match evt {
                                        CrosstermEvent::Key(key) => {
                                            // Filter out release events (important for Windows)
                                            if key.kind == KeyEventKind::Press {
                                                let _ = sender.send(Event::Key(key));
                                            }
                                        }
                                        CrosstermEvent::Resize(w, h) => {
                                            let _ = sender.send(Event::Resize(w, h));
                                        }
                                        _ => {}
                                    }
                                }
                                Some(Err(e)) => {
                                    let _ = sender.send(Event::Error(e.to_string()));
                                }
                                None => break,
                            }
                        }
                    }
                }
            })
        };

        Self {
            receiver,
            cancel,
            task,
        }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Shutdown the event handler
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
