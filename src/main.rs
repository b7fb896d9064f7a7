mod config;

use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info, warn};

use logtop_core::{Engine, RankStrategy};
use logtop_input::LineReader;
use logtop_tui::{
    write_line_by_line, write_summary, AppState, Event, EventHandler, KeyBindings, Layout,
    TopScreen, Tui,
};

use crate::config::{FileConfig, Overrides, Settings};

/// logtop - realtime top of the most frequent lines read from stdin
#[derive(Parser, Debug)]
#[command(name = "logtop")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of most recent lines kept in the window [default: 10000]
    #[arg(short, long, value_name = "NUM")]
    size: Option<usize>,

    /// Quiet, only display a top 10 at exit
    #[arg(short, long)]
    quiet: bool,

    /// Print NUM "count frequency line" groups per line on stdout instead
    /// of the full-screen view
    #[arg(short = 'l', long, value_name = "NUM")]
    line_by_line: Option<usize>,

    /// Seconds between display updates [default: 1]
    #[arg(short, long, value_name = "SECS")]
    interval: Option<u64>,

    /// Configuration file (default: $XDG_CONFIG_HOME/logtop/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ranking strategy: scan or ordered
    #[arg(long, value_name = "STRATEGY")]
    rank: Option<RankStrategy>,

    /// Write debug logs to $TMPDIR/logtop-debug.log
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            size: self.size,
            quiet: self.quiet,
            line_by_line: self.line_by_line,
            interval: self.interval,
            rank: self.rank,
        }
    }
}

fn main() {
    let args = Args::parse();

    if io::stdin().is_terminal() {
        eprintln!(
            "{}\n\nlogtop reads lines from a pipe, e.g. `tail -f access.log | logtop`",
            Args::command().render_usage()
        );
        std::process::exit(1);
    }

    match try_main(args) {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Why the main loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    EndOfInput,
    QuitKey,
    Interrupted,
}

impl Exit {
    /// Exit asked for from the top view, if any
    fn requested(state: &AppState) -> Option<Exit> {
        match (state.should_quit, state.interrupted) {
            (false, _) => None,
            (true, false) => Some(Exit::QuitKey),
            (true, true) => Some(Exit::Interrupted),
        }
    }

    /// Process exit status, 128 + SIGINT after an interrupt like a shell expects
    fn code(self) -> i32 {
        match self {
            Exit::EndOfInput | Exit::QuitKey => 0,
            Exit::Interrupted => 130,
        }
    }
}

fn try_main(args: Args) -> Result<Exit> {
    init_tracing(args.debug)?;

    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(file, &args.overrides())?;

    // Stdin is read on a blocking thread that only returns once a line arrives,
    // so the runtime must not wait for it on the way out.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let result = runtime.block_on(run_app(settings));
    runtime.shutdown_background();

    result
}

fn init_tracing(debug: bool) -> Result<()> {
    if debug {
        let path = std::env::temp_dir().join("logtop-debug.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}

async fn run_app(settings: Settings) -> Result<Exit> {
    let mut engine = Engine::with_strategy(settings.window_size, settings.rank)?;
    info!(
        capacity = engine.capacity(),
        strategy = %engine.strategy(),
        interval = ?settings.interval,
        "logtop started"
    );

    // Input
    let (line_tx, mut line_rx) = LineReader::channel();
    let mut reader = LineReader::stdin(line_tx);

    // Display
    let mut tui = if settings.interactive() {
        Some(Tui::new().context("failed to set up the terminal")?)
    } else {
        None
    };
    let mut events = if tui.is_some() {
        EventHandler::new(settings.interval)
    } else {
        EventHandler::ticks_only(settings.interval)
    };
    let keybindings = KeyBindings::new();
    let mut state = AppState::new(settings.interval);
    let mut stdout = io::stdout();

    if let Some(tui) = tui.as_mut() {
        render(tui, &mut state, &engine)?;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Main event loop
    let exit = loop {
        tokio::select! {
            // Handle incoming lines
            batch = line_rx.recv() => {
                match batch {
                    Some(batch) => {
                        for line in &batch {
                            engine.feed(line);
                        }
                    }
                    None => {
                        debug!(total = engine.total_fed(), "input ended");
                        break Exit::EndOfInput;
                    }
                }
            }

            // Handle refresh ticks and terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Tick => match tui.as_mut() {
                        Some(tui) => render(tui, &mut state, &engine)?,
                        None => write_tick(&mut stdout, &engine, &settings)
                            .context("failed to write to stdout")?,
                    },
                    Event::Key(key) => {
                        if let Some(action) = keybindings.get_action(state.key_context(), &key) {
                            if state.apply(action) {
                                if let Some(tui) = tui.as_mut() {
                                    render(tui, &mut state, &engine)?;
                                }
                            }
                        }
                    }
                    Event::Resize(_, _) => {
                        if let Some(tui) = tui.as_mut() {
                            render(tui, &mut state, &engine)?;
                        }
                    }
                    Event::Error(e) => {
                        warn!(error = %e, "terminal event error");
                    }
                }
            }

            _ = &mut ctrl_c => {
                debug!("interrupted");
                break Exit::Interrupted;
            }
        }

        if let Some(exit) = Exit::requested(&state) {
            break exit;
        }
    };

    // Cleanup
    events.shutdown();
    reader.stop();
    if let Some(mut tui) = tui.take() {
        tui.restore().context("failed to restore the terminal")?;
    }

    finish(&mut stdout.lock(), engine, &settings).context("failed to write to stdout")?;
    Ok(exit)
}

/// Periodic output when the full-screen view is off: one line-by-line report,
/// or nothing in quiet mode
fn write_tick<W: Write>(out: &mut W, engine: &Engine, settings: &Settings) -> io::Result<()> {
    match settings.line_by_line {
        Some(groups) if !settings.quiet => write_line_by_line(out, &engine.top(groups)),
        _ => Ok(()),
    }
}

/// Write the exit report, then tear the engine down
fn finish<W: Write>(out: &mut W, engine: Engine, settings: &Settings) -> io::Result<()> {
    let written = match settings.line_by_line {
        Some(groups) => write_line_by_line(out, &engine.top(groups)),
        None => write_summary(out, &engine.snapshot(settings.summary_rows)),
    };
    engine.teardown();
    written
}

/// Take a fresh snapshot sized to the terminal and draw it
fn render(tui: &mut Tui, state: &mut AppState, engine: &Engine) -> Result<()> {
    let rows = Layout::table_rows(tui.size()?.height);
    state.refresh(engine.snapshot(rows));
    if state.take_clear_request() {
        tui.terminal().clear()?;
    }
    tui.terminal().draw(|frame| TopScreen::render(frame, state))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use logtop_tui::Action;

    #[test]
    fn test_args_short_flags() {
        let args = Args::try_parse_from(["logtop", "-s", "500", "-q", "-l", "3", "-i", "2"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.size, Some(500));
        assert!(overrides.quiet);
        assert_eq!(overrides.line_by_line, Some(3));
        assert_eq!(overrides.interval, Some(2));
        assert_eq!(overrides.rank, None);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::try_parse_from([
            "logtop",
            "--size",
            "64",
            "--rank",
            "ordered",
            "--config",
            "/tmp/logtop.toml",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.size, Some(64));
        assert_eq!(args.rank, Some(RankStrategy::Ordered));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/logtop.toml")));
        assert!(args.debug);
    }

    #[test]
    fn test_args_reject_unknown_rank() {
        assert!(Args::try_parse_from(["logtop", "--rank", "heap"]).is_err());
    }

    #[test]
    fn test_args_defaults_resolve() {
        let args = Args::try_parse_from(["logtop"]).unwrap();
        let settings = Settings::resolve(FileConfig::default(), &args.overrides()).unwrap();
        assert!(settings.interactive());
        assert_eq!(settings.window_size, 10_000);
    }

    fn settings(cli: Overrides) -> Settings {
        Settings::resolve(FileConfig::default(), &cli).unwrap()
    }

    fn engine_with(lines: &[&str]) -> Engine {
        let mut engine = Engine::new(4).unwrap();
        for line in lines {
            engine.feed(line.as_bytes());
        }
        engine
    }

    fn output<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tick_writes_line_by_line_report() {
        let engine = engine_with(&["a", "b", "a"]);
        let settings = settings(Overrides {
            line_by_line: Some(1),
            ..Default::default()
        });

        let text = output(|out| write_tick(out, &engine, &settings));
        assert_eq!(text, "2 0.666667 a\t\n");
    }

    #[test]
    fn test_tick_silent_when_quiet() {
        let engine = engine_with(&["a", "b", "a"]);
        let quiet_lines = settings(Overrides {
            quiet: true,
            line_by_line: Some(2),
            ..Default::default()
        });
        let quiet_summary = settings(Overrides {
            quiet: true,
            ..Default::default()
        });

        assert_eq!(output(|out| write_tick(out, &engine, &quiet_lines)), "");
        assert_eq!(output(|out| write_tick(out, &engine, &quiet_summary)), "");
    }

    #[test]
    fn test_finish_prints_line_by_line_groups() {
        let settings = settings(Overrides {
            quiet: true,
            line_by_line: Some(2),
            ..Default::default()
        });
        let engine = engine_with(&["x", "y", "x", "z", "x"]);

        // Window of 4 keeps y, x, z, x
        let text = output(|out| finish(out, engine, &settings));
        assert_eq!(text, "2 0.500000 x\t1 0.250000 y\t\n");
    }

    #[test]
    fn test_finish_prints_summary_limited_to_summary_rows() {
        let mut file = FileConfig::default();
        file.display.summary_rows = 2;
        let settings = Settings::resolve(file, &Overrides::default()).unwrap();
        let engine = engine_with(&["c", "b", "a", "a"]);

        let text = output(|out| finish(out, engine, &settings));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "4 lines in window (capacity 4), 3 distinct, 4 read");
        assert_eq!(lines[1], "1 2  50.0% a");
        assert_eq!(lines[2], "2 1  25.0% b");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_quit_keys_map_to_exit() {
        let mut state = AppState::new(Duration::from_secs(1));
        assert_eq!(Exit::requested(&state), None);

        state.apply(Action::Quit);
        assert_eq!(Exit::requested(&state), Some(Exit::QuitKey));

        let mut state = AppState::new(Duration::from_secs(1));
        state.apply(Action::Interrupt);
        assert_eq!(Exit::requested(&state), Some(Exit::Interrupted));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Exit::EndOfInput.code(), 0);
        assert_eq!(Exit::QuitKey.code(), 0);
        assert_eq!(Exit::Interrupted.code(), 130);
    }

    #[test]
    fn test_args_reject_oversized_interval() {
        let args = Args::try_parse_from(["logtop", "-i", "18446744073709551615"]).unwrap();
        assert!(Settings::resolve(FileConfig::default(), &args.overrides()).is_err());
    }

    #[test]
    fn test_args_command_is_valid() {
        Args::command().debug_assert();
    }
}
