//! Logging infrastructure for the fpath library.
//!
//! The library emits records through the `log` facade. This module provides
//! a simple stderr backend for programs that do not bring their own, with
//! configurable log levels.

use std::env;
use std::fmt;

use log::{LevelFilter, Log, Metadata, Record};

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use fpath::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Everything, including debug and trace records.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("invalid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` filter matching this level.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Off,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Trace,
        }
    }
}

/// A stderr backend for the `log` facade.
///
/// # Examples
///
/// ```
/// use fpath::{LogLevel, Logger};
/// use log::Log;
///
/// let logger = Logger::new(LogLevel::Normal);
/// let debug = log::Metadata::builder().level(log::Level::Debug).build();
/// assert!(!logger.enabled(&debug));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Decide the log level from flags and the environment.
///
/// The priority order is:
/// 1. Flags (`verbose` wins over `quiet`)
/// 2. `FPATH_LOG_MODE` environment variable
/// 3. Default (Normal)
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    env::var("FPATH_LOG_MODE")
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .unwrap_or(LogLevel::Normal)
}

/// Install the stderr logger as the global `log` backend.
///
/// If another backend is already installed it is kept, and only the maximum
/// level is adjusted. Returns the level in effect.
///
/// # Examples
///
/// ```
/// use fpath::{init_logger, LogLevel};
///
/// let level = init_logger(false, true);
/// assert_eq!(level, LogLevel::Quiet);
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    let logger: &'static Logger = Box::leak(Box::new(Logger::new(level)));
    if log::set_logger(logger).is_err() {
        log::debug!("a logger is already installed, keeping it");
    }
    log::set_max_level(level.filter());
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard(Option<String>);

    impl EnvGuard {
        fn set(value: Option<&str>) -> Self {
            let saved = env::var("FPATH_LOG_MODE").ok();
            match value {
                Some(value) => env::set_var("FPATH_LOG_MODE", value),
                None => env::remove_var("FPATH_LOG_MODE"),
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match self.0.take() {
                Some(value) => env::set_var("FPATH_LOG_MODE", value),
                None => env::remove_var("FPATH_LOG_MODE"),
            }
        }
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Quiet < LogLevel::Normal);
        assert!(LogLevel::Normal < LogLevel::Verbose);
    }

    #[test]
    fn test_log_level_display_and_parse() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse("Normal").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Quiet.filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Normal.filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Verbose.filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_logger_enabled() {
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let trace = Metadata::builder().level(log::Level::Trace).build();

        assert!(Logger::default().enabled(&warn));
        assert!(!Logger::default().enabled(&trace));
        assert!(Logger::new(LogLevel::Verbose).enabled(&trace));
        assert!(!Logger::new(LogLevel::Quiet).enabled(&warn));
    }

    #[test]
    #[serial]
    fn test_resolve_level_defaults() {
        let _guard = EnvGuard::set(None);
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_resolve_level_flags_win() {
        let _guard = EnvGuard::set(Some("quiet"));
        assert_eq!(resolve_level(true, false), LogLevel::Verbose);
        assert_eq!(resolve_level(true, true), LogLevel::Verbose);
        assert_eq!(resolve_level(false, true), LogLevel::Quiet);
    }

    #[test]
    #[serial]
    fn test_resolve_level_from_env() {
        let _guard = EnvGuard::set(Some("verbose"));
        assert_eq!(resolve_level(false, false), LogLevel::Verbose);
    }

    #[test]
    #[serial]
    fn test_resolve_level_env_invalid_fallback() {
        let _guard = EnvGuard::set(Some("chatty"));
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
    }
}
