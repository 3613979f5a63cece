//! Rolling file logs for the quadrant engine.
//!
//! # Responsibility
//! - Start `quadrant*.log` rolling files once per process.
//! - Record panics as one-line `event=panic_captured` entries.
//!
//! # Invariants
//! - Events are metadata only (ids, counts, quadrants, durations); task
//!   titles and notes never reach the files.
//! - A running logger is never reconfigured. A second call with the same
//!   settings is a no-op, any other settings are rejected.
//! - Setup failures are returned as `LoggingError`, never raised as panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "quadrant";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const PANIC_TEXT_LIMIT: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    handle: LoggerHandle,
}

/// Validated logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: &'static str,
    /// Absolute directory holding the log files.
    pub log_dir: PathBuf,
}

impl LogSettings {
    /// Normalizes a level name (`warning` is accepted) and checks the
    /// directory is absolute.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            other => return Err(LoggingError::UnsupportedLevel(other.to_string())),
        };

        let dir = log_dir.trim();
        if dir.is_empty() || !Path::new(dir).is_absolute() {
            return Err(LoggingError::InvalidDir(dir.to_string()));
        }
        Ok(Self {
            level,
            log_dir: PathBuf::from(dir),
        })
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    /// Blank or relative log directory.
    InvalidDir(String),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// Logging already runs with other settings.
    AlreadyActive { active: LogSettings },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDir(dir) => {
                write!(f, "log directory must be a non-empty absolute path, got `{dir}`")
            }
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::AlreadyActive { active } => write!(
                f,
                "logging already active at `{}` with level `{}`",
                active.log_dir.display(),
                active.level
            ),
            Self::Backend(err) => write!(f, "log backend failed to start: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts rolling file logs under `log_dir` at `level`.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingError::AlreadyActive {
            active: active.settings.clone(),
        });
    }
    Ok(())
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// Writes buffered lines to disk. A no-op before `init_logging`.
pub fn flush_logs() {
    if let Some(active) = ACTIVE.get() {
        active.handle.flush();
    }
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    capture_panics();
    info!(
        "event=logging_init module=core status=ok version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        settings.level,
        settings.log_dir.display()
    );
    Ok(ActiveLogger { settings, handle })
}

// Runs inside the one-time logger start, so the hook is chained once.
fn capture_panics() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            one_line(&payload, PANIC_TEXT_LIMIT)
        );
        flush_logs();
        previous(panic_info);
    }));
}

/// Payload may quote task text; flatten to one line and cap it.
fn one_line(text: &str, limit: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut capped: String = flat.chars().take(limit).collect();
    capped.push_str("...");
    capped
}
