//! Logging setup for quill: a log file, plus stdout when asked for.
//!
//! quill's host owns the terminal, so logs go to a file by default. Stdout
//! logging is added when `QUILL_LOG` or `RUST_LOG` is set.
//!
//! ## Filter priority
//!
//! 1. **`QUILL_LOG`**: a bare level (`debug`) applies to every quill crate;
//!    anything with `=`, `:` or `,` is used as a full filter directive
//! 2. **`RUST_LOG`**: used as-is
//! 3. **Default**: `warn` globally, `info` for quill crates
//!
//! ## Log file
//!
//! `<data_local_dir>/quill/logs/quill-<pid>.log` unless a path is given. A
//! path with an extension names the file; one without names the directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose level `QUILL_LOG=<level>` sets.
const QUILL_CRATES: &[&str] = &["quill", "quill_editor", "quill_finder"];

/// Boxed error for setup failures (bad filter directive, subscriber already
/// set, unwritable log directory).
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]. Hold it for the life of the program: dropping it
/// flushes and stops the background file writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Where to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Overrides the default log file location.
    pub log_file_path: Option<PathBuf>,
}

/// Install the global subscriber: a file layer always, a stdout layer when
/// `QUILL_LOG` or `RUST_LOG` is set.
///
/// # Errors
///
/// Fails if the log directory cannot be created, a filter directive does
/// not parse, or a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<LogGuard, InitError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_filter()?);

    let stdout_layer = if env_override().is_some() {
        Some(fmt::layer().with_filter(create_filter()?))
    } else {
        None
    };

    Registry::default().with(file_layer).with(stdout_layer).try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Logging for tests: stdout only. Safe to call from every test; calls
/// after the first are no-ops.
pub fn test() {
    let _ = create_filter().and_then(|filter| {
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .map_err(InitError::from)
    });
}

/// Split the configured location into (directory, file name).
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let default_name = format!("quill-{}.log", std::process::id());

    match override_path {
        Some(path) if path.extension().is_some() => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let name = path
                .file_name()
                .map_or(default_name, |n| n.to_string_lossy().into_owned());
            (dir, name)
        }
        Some(dir) => (dir, default_name),
        None => {
            let dir = dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("quill")
                .join("logs");
            (dir, default_name)
        }
    }
}

/// Which environment variable, if any, overrides the default filter.
fn env_override() -> Option<(&'static str, String)> {
    ["QUILL_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|var| env::var(var).ok().map(|value| (var, value)))
}

fn create_filter() -> Result<EnvFilter, InitError> {
    let directives = match env_override() {
        Some(("QUILL_LOG", value)) => expand_quill_log(&value),
        Some((_, value)) => value,
        None => default_directives("info"),
    };
    Ok(EnvFilter::try_new(directives)?)
}

/// `debug` becomes `warn,quill=debug,quill_editor=debug,...`; a full
/// directive string is kept as written.
fn expand_quill_log(value: &str) -> String {
    if value.contains(['=', ':', ',']) {
        return value.to_owned();
    }
    default_directives(value)
}

fn default_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in QUILL_CRATES {
        directives.push(',');
        directives.push_str(krate);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
