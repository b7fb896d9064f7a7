//! Configuration for the logtop binary.
//!
//! [`FileConfig::load`] reads `config.toml` (see [`config_path`]); a missing
//! file yields the defaults. [`Settings::resolve`] layers command line flags on
//! top and validates the result.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use logtop_core::{EngineError, RankStrategy};
use logtop_tui::MAX_TICK_RATE;
use logtop_types::DEFAULT_WINDOW_SIZE;

/// Rows printed in the exit summary
pub const DEFAULT_SUMMARY_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("window size must be at least 1")]
    ZeroWindow,

    #[error("line-by-line output needs at least 1 group per line")]
    ZeroGroups,

    #[error("display interval must be at least 1 second")]
    ZeroInterval,

    #[error("display interval must be at most {max} seconds")]
    IntervalTooLong { max: u64 },

    #[error(transparent)]
    Strategy(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub window: WindowConfig,
    pub display: DisplayConfig,
}

/// `[window]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub size: usize,
    pub rank: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            rank: RankStrategy::default().to_string(),
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Seconds between refreshes
    pub interval: u64,
    pub quiet: bool,
    /// Groups per line-by-line report, 0 for the full-screen view
    pub line_by_line: usize,
    pub summary_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            quiet: false,
            line_by_line: 0,
            summary_rows: DEFAULT_SUMMARY_ROWS,
        }
    }
}

impl FileConfig {
    /// Load `path`, or the default location when `None`.
    ///
    /// An explicit path must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match config_path(|key| std::env::var(key).ok()) {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::ReadFile { path, source }),
        }
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the configuration file lives: `$LOGTOP_CONFIG`, else
/// `$XDG_CONFIG_HOME/logtop/config.toml`, else `$HOME/.config/logtop/config.toml`
pub fn config_path<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(path) = non_empty("LOGTOP_CONFIG") {
        return Some(PathBuf::from(path));
    }

    non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("logtop").join("config.toml"))
}

// ---------------------------------------------------------------------------
// Resolved settings
// ---------------------------------------------------------------------------

/// Values given on the command line, each overriding the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub size: Option<usize>,
    pub quiet: bool,
    pub line_by_line: Option<usize>,
    pub interval: Option<u64>,
    pub rank: Option<RankStrategy>,
}

/// Everything the binary needs to run, validated
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub window_size: usize,
    pub rank: RankStrategy,
    pub interval: Duration,
    pub quiet: bool,
    /// Groups per line in line-by-line mode
    pub line_by_line: Option<usize>,
    pub summary_rows: usize,
}

impl Settings {
    pub fn resolve(file: FileConfig, cli: &Overrides) -> Result<Self, ConfigError> {
        let window_size = cli.size.unwrap_or(file.window.size);
        if window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }

        let rank = match cli.rank {
            Some(rank) => rank,
            None => file.window.rank.parse()?,
        };

        let interval = cli.interval.unwrap_or(file.display.interval);
        if interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if interval > MAX_TICK_RATE.as_secs() {
            return Err(ConfigError::IntervalTooLong {
                max: MAX_TICK_RATE.as_secs(),
            });
        }

        // 0 in the file switches line-by-line off, on the command line it is a mistake
        let line_by_line = match cli.line_by_line {
            Some(0) => return Err(ConfigError::ZeroGroups),
            Some(groups) => Some(groups),
            None => (file.display.line_by_line > 0).then_some(file.display.line_by_line),
        };

        Ok(Self {
            window_size,
            rank,
            interval: Duration::from_secs(interval),
            quiet: cli.quiet || file.display.quiet,
            line_by_line,
            summary_rows: file.display.summary_rows,
        })
    }

    /// Whether the full-screen view is shown
    pub fn interactive(&self) -> bool {
        !self.quiet && self.line_by_line.is_none()
    }
}
