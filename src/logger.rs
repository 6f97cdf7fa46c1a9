//! Where the logger lives
//!
//! The core of the crate only ever talks to the `log` facade. This module provides the logger
//! that the terminal host installs behind it: everything goes to a single file, if one has been
//! set, and is dropped otherwise.

use std::fs::File;
use std::io::Write;
use std::mem;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use lazy_static::lazy_static;
use log::{Metadata, Record};

use crate::error::Error;

lazy_static! {
    /// The global log file
    ///
    /// This lock is provided both to sync writes to whatever log file we're using, AND to allow
    /// changing the file at runtime.
    static ref LOG: Arc<Mutex<Option<File>>> = Arc::new(Mutex::new(None));
}

const DEFAULT_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

// A panic while holding the lock can't leave the `Option<File>` in a bad state, so a poisoned
// lock is fine to keep using.
fn log_file() -> MutexGuard<'static, Option<File>> {
    match LOG.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Initializes the logging utilities, setting the global logger to the one given here
///
/// This should only ever be called once; subsequent calls return an error.
pub fn init() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(DEFAULT_LEVEL);
    Ok(())
}

/// Sets the log file to the given file handle, returning the old one, if it was present
pub fn set_file(file: File) -> Option<File> {
    mem::replace(&mut log_file(), Some(file))
}

/// Creates (or truncates) the file at `path` and starts logging to it
///
/// On failure, whatever file was already being logged to is kept.
pub fn open_file(path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|err| Error::Log {
        path: path.to_owned(),
        err,
    })?;

    set_file(file);
    Ok(())
}

/// Sets the logging level, returning the previous one
pub fn set_level(level: log::LevelFilter) -> log::LevelFilter {
    let previous = log::max_level();
    log::set_max_level(level);
    previous
}

/// Returns whether there is currently a file being logged to
pub fn logging() -> bool {
    log_file().is_some()
}

/// Utility function for grabbing the log level from a string
///
/// The string should be one of: "Trace", "Debug", "Info", "Warn", "Error", "Off". The command-line
/// parser restricts the argument to these already, but `None` is returned for anything else.
pub fn level_filter_from_str(s: &str) -> Option<log::LevelFilter> {
    match s {
        "Trace" => Some(log::LevelFilter::Trace),
        "Debug" => Some(log::LevelFilter::Debug),
        "Info" => Some(log::LevelFilter::Info),
        "Warn" => Some(log::LevelFilter::Warn),
        "Error" => Some(log::LevelFilter::Error),
        "Off" => Some(log::LevelFilter::Off),
        _ => None,
    }
}

/// The public-facing logger. This is an empty struct that uses the internal functions of the
/// rest of the logging utilities to perform the logging.
pub struct Logger;

/// A dummy value that allows a static reference to a global logger.
pub static LOGGER: Logger = Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut guard = log_file();

        // We only log if we actually have a file to log to
        if let Some(file) = guard.as_mut() {
            let res = writeln!(
                file,
                "{:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );

            // There's nowhere left to report a failure to log. We stop trying, so that a full
            // disk doesn't slow down every single edit.
            if res.is_err() {
                *guard = None;
            }
        }
    }

    fn flush(&self) {
        let mut guard = log_file();
        if let Some(file) = guard.as_mut() {
            if file.flush().is_err() {
                *guard = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        static CASES: &[(&str, Option<log::LevelFilter>)] = &[
            ("Trace", Some(log::LevelFilter::Trace)),
            ("Warn", Some(log::LevelFilter::Warn)),
            ("Off", Some(log::LevelFilter::Off)),
            ("warn", None),
            ("", None),
        ];

        for (s, expected) in CASES {
            assert_eq!(level_filter_from_str(s), *expected, "input {:?}", s);
        }
    }

    #[test]
    fn unopenable_file() {
        let res = open_file(Path::new("/nonexistent/tagedit/tagedit.log"));
        assert!(matches!(res, Err(Error::Log { .. })));
        assert!(!logging());
    }
}
