//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process with size-rotated
//!   files, optionally echoed to stderr.
//! - Record panics as flattened, length-capped log events.
//!
//! # Invariants
//! - A second `init_logging` with equal options is a no-op; different options
//!   are rejected with `LogError::Conflict`.
//! - Initialization never panics.
//! - Log lines carry ids, counts and statuses only. Topic labels and entry
//!   bodies never reach the log.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::PanicHookInfo;
use std::path::PathBuf;

const LOG_BASENAME: &str = "learning_log";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    options: LogOptions,
    _handle: LoggerHandle,
}

/// Logging setup requested by the embedding binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LevelFilter,
    /// Absolute directory for rolling log files; created if missing.
    pub log_dir: PathBuf,
    /// Duplicate `info` and above to stderr.
    pub echo_to_stderr: bool,
}

impl LogOptions {
    /// Options at the build-mode default level, without stderr echo.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_log_level(),
            log_dir: log_dir.into(),
            echo_to_stderr: false,
        }
    }
}

#[derive(Debug)]
pub enum LogError {
    UnknownLevel(String),
    RelativeLogDir(PathBuf),
    CreateLogDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logging is already running with different options.
    Conflict { active: LogOptions },
}

impl Display for LogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(raw) => write!(
                f,
                "unsupported log level `{raw}`; expected trace|debug|info|warn|error|off"
            ),
            Self::RelativeLogDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateLogDir { dir, source } => write!(
                f,
                "cannot create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(message) => write!(f, "logger backend failed to start: {message}"),
            Self::Conflict { active } => write!(
                f,
                "logging already running with level={} log_dir={} echo_to_stderr={}",
                active.level,
                active.log_dir.display(),
                active.echo_to_stderr
            ),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateLogDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses a level name, case-insensitively. `warning` is accepted for `warn`.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LogError> {
    let normalized = raw.trim().to_ascii_lowercase();
    let name = if normalized == "warning" {
        "warn"
    } else {
        normalized.as_str()
    };
    name.parse::<LevelFilter>()
        .map_err(|_| LogError::UnknownLevel(raw.to_string()))
}

/// `Debug` for debug builds, `Info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Starts logging, or confirms that logging already runs with `options`.
pub fn init_logging(options: &LogOptions) -> Result<(), LogError> {
    if !options.log_dir.is_absolute() {
        return Err(LogError::RelativeLogDir(options.log_dir.clone()));
    }

    let active = ACTIVE.get_or_try_init(|| start_backend(options))?;
    if active.options != *options {
        return Err(LogError::Conflict {
            active: active.options.clone(),
        });
    }
    Ok(())
}

/// `(level, log_dir)` of the running logger, or `None` before init.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.options.level, active.options.log_dir.clone()))
}

fn start_backend(options: &LogOptions) -> Result<ActiveLogger, LogError> {
    std::fs::create_dir_all(&options.log_dir).map_err(|source| LogError::CreateLogDir {
        dir: options.log_dir.clone(),
        source,
    })?;

    let log_spec = LogSpecification::builder().default(options.level).build();
    let echo = if options.echo_to_stderr {
        Duplicate::Info
    } else {
        Duplicate::None
    };
    let handle = Logger::with(log_spec)
        .log_to_file(
            FileSpec::default()
                .directory(&options.log_dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .duplicate_to_stderr(echo)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LogError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_init module=core status=ok level={} log_dir={} echo_to_stderr={} version={} os={}",
        options.level,
        options.log_dir.display(),
        options.echo_to_stderr,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        options: options.clone(),
        _handle: handle,
    })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let at = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic module=core status=error location={at} payload={}",
            flatten(&panic_payload(info), PANIC_PAYLOAD_LIMIT)
        );
        chained(info);
    }));
}

fn panic_payload(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string payload>".to_string())
}

/// Joins lines and caps the result at `limit` chars, marking the cut.
fn flatten(text: &str, limit: usize) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= limit {
        return single_line;
    }
    let mut capped: String = single_line.chars().take(limit).collect();
    capped.push_str("...");
    capped
}
