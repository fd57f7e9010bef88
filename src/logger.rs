//! Run-scoped logging to stdout and a timestamped file.
//!
//! The logger is built once per run and handed to every stage by reference;
//! log statements target it with `log`'s `logger:` form instead of going
//! through a process-wide logger. Dropping it flushes the file.

use std::fmt;
use std::fs;
use std::io::{stdout, IsTerminal};
use std::path::{Path, PathBuf};

use chrono::Local;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::LoggerError;

/// Prefix of every log file name.
pub const LOG_FILE_PREFIX: &str = "sforginfo";

/// Timestamp at the start of each line.
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Timestamp embedded in the log file name.
const FILE_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

pub struct RunLogger {
    inner: Box<dyn Log>,
    file_path: PathBuf,
}

impl RunLogger {
    /// Log to stdout and to `<log_dir>/sforginfo-<YYMMDDhhmmss>.log`.
    pub fn open(log_dir: &Path, level: LevelFilter) -> Result<Self, LoggerError> {
        let file_path = log_dir.join(log_file_name());
        Self::build(file_path, level, true)
    }

    /// Log to the given file only.
    pub fn open_file(file_path: impl Into<PathBuf>, level: LevelFilter) -> Result<Self, LoggerError> {
        Self::build(file_path.into(), level, false)
    }

    #[track_caller]
    fn build(file_path: PathBuf, level: LevelFilter, echo_stdout: bool) -> Result<Self, LoggerError> {
        if let Some(dir) = file_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| LoggerError::directory(dir, e))?;
        }

        let file = fern::log_file(&file_path).map_err(|e| LoggerError::file(&file_path, e))?;

        let mut dispatch = Dispatch::new()
            .level(level)
            .chain(Dispatch::new().format(format_line).chain(file));

        if echo_stdout {
            // Color only when a terminal will interpret the escape codes.
            let colors = stdout().is_terminal().then(console_colors);
            dispatch = dispatch.chain(
                Dispatch::new()
                    .format(move |out, message, record| {
                        out.finish(format_args!(
                            "{} - {} - {}",
                            Local::now().format(LINE_TIMESTAMP_FORMAT),
                            render_level(record.level(), colors.as_ref()),
                            message
                        ))
                    })
                    .chain(stdout()),
            );
        }

        let (max_level, inner) = dispatch.into_log();
        // The log macros check the global max level even when given an explicit logger.
        if log::max_level() < max_level {
            log::set_max_level(max_level);
        }

        Ok(Self { inner, file_path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.inner.flush();
    }
}

impl fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLogger")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

fn log_file_name() -> String {
    format!(
        "{LOG_FILE_PREFIX}-{}.log",
        Local::now().format(FILE_TIMESTAMP_FORMAT)
    )
}

fn format_line(out: FormatCallback<'_>, message: &fmt::Arguments<'_>, record: &Record<'_>) {
    out.finish(format_args!(
        "{} - {} - {}",
        Local::now().format(LINE_TIMESTAMP_FORMAT),
        level_name(record.level()),
        message
    ))
}

fn console_colors() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta)
}

/// `WARNING` rather than `log`'s `WARN`; the other names are unchanged.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn render_level(level: Level, colors: Option<&ColoredLevelConfig>) -> String {
    match colors {
        Some(colors) => format!(
            "\x1B[{}m{}\x1B[0m",
            colors.get_color(&level).to_fg_str(),
            level_name(level)
        ),
        None => level_name(level).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{debug, error, info, warn};

    #[test]
    fn lines_follow_timestamp_level_message_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let logger = RunLogger::open_file(&path, LevelFilter::Debug).unwrap();
        info!(logger: logger, "Script started.");
        warn!(logger: logger, "Something soft failed.");
        drop(logger);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parts: Vec<&str> = lines[0].splitn(3, " - ").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), "2026-01-01 00:00:00,000".len());
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "Script started.");
        assert!(lines[1].contains(" - WARNING - Something soft failed."));
    }

    #[test]
    fn console_level_is_plain_without_a_terminal() {
        assert_eq!(render_level(Level::Warn, None), "WARNING");
        assert_eq!(render_level(Level::Info, None), "INFO");

        let colored = render_level(Level::Error, Some(&console_colors()));
        assert!(colored.starts_with("\x1B["));
        assert!(colored.contains("ERROR"));
        assert!(colored.ends_with("\x1B[0m"));
    }

    #[test]
    fn level_filter_drops_quieter_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiet.log");

        let logger = RunLogger::open_file(&path, LevelFilter::Info).unwrap();
        debug!(logger: logger, "hidden detail");
        error!(logger: logger, "visible failure");
        drop(logger);

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("hidden detail"));
        assert!(content.contains(" - ERROR - visible failure"));
    }

    #[test]
    fn missing_log_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("nested");

        let logger = RunLogger::open(&nested, LevelFilter::Info).unwrap();
        let name = logger.file_path().file_name().unwrap().to_string_lossy().into_owned();

        assert!(logger.file_path().starts_with(&nested));
        assert!(name.starts_with("sforginfo-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "sforginfo-".len() + 12 + ".log".len());
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let result = RunLogger::open_file("/dev/null/invalid-path/run.log", LevelFilter::Info);

        assert!(matches!(result, Err(LoggerError::Directory { .. })));
    }
}
