//! The crate-wide [`Error`] type
//!
//! Each module has its own, more specific error type; this just gathers them up so that callers
//! juggling several of them (like the terminal host) can use `?` throughout.

use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::edit::EditError;

#[derive(Debug)]
pub enum Error {
    Edit(EditError),
    Config(ConfigError),
    /// The log file couldn't be opened
    Log { path: PathBuf, err: io::Error },
    /// The terminal couldn't be set up, read from, or drawn to
    Terminal(crossterm::ErrorKind),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::Edit(e) => write!(f, "edit rejected: {}", e),
            Error::Config(e) => e.fmt(f),
            Error::Log { path, err } => write!(
                f,
                "failed to open logging file '{}': {}",
                path.display(),
                err
            ),
            Error::Terminal(e) => write!(f, "terminal error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Edit(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Log { err, .. } => Some(err),
            Error::Terminal(e) => Some(e),
        }
    }
}

impl From<EditError> for Error {
    fn from(e: EditError) -> Self {
        Error::Edit(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<crossterm::ErrorKind> for Error {
    fn from(e: crossterm::ErrorKind) -> Self {
        Error::Terminal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err: Error = EditError::InsertOutOfBounds { at: 4, len: 2 }.into();
        assert_eq!(
            err.to_string(),
            "edit rejected: cannot insert at offset 4 in buffer of length 2"
        );

        let err = Error::Log {
            path: PathBuf::from("/tmp/t.log"),
            err: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "failed to open logging file '/tmp/t.log': denied"
        );

        let err: Error = ConfigError::InvalidDelimiter('\n').into();
        assert_eq!(err.to_string(), "invalid delimiter '\\n': must be printable");
    }
}
