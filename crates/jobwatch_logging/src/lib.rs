#![deny(missing_docs)]
//! Shared logging utilities for the jobwatch workspace.
//!
//! This crate provides the `watch_*` logging macros used across the codebase,
//! the logger setup used by the binary, and a minimal test initializer for the
//! global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Facade re-export used by the macros below.
#[doc(hidden)]
pub use log as __log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file, truncating it first.
    File(PathBuf),
    /// Write to the terminal.
    Terminal,
    /// Write to both the terminal and the given file.
    Both(PathBuf),
}

/// Initializes the global logger for the binary.
///
/// A file that cannot be created is reported on stderr and skipped, so a
/// `Both` destination degrades to terminal-only. Calling this twice is a no-op.
pub fn initialize(destination: &LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )],
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
