//! Configuration for the control and its terminal host
//!
//! Configuration is read from a YAML file into a [`ConfigBuilder`], where every field is
//! optional. Builders from several sources (the file, then the command line) are merged, and the
//! result is turned into a full [`Config`] by filling in defaults for anything still missing.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crate::control::Strategy;
use crate::utils::{XFrom, XInto};
use crate::DEFAULT_DELIMITER;

/// The narrowest chip that can still show a character between its two edges
pub const MIN_CHIP_WIDTH: usize = 3;

const DEFAULT_CHIP_WIDTH: usize = 14;
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

/// The key that commits pending text as a tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKey {
    Enter,
    Tab,
}

/// The complete configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The reserved character separating tags
    pub delimiter: char,
    pub strategy: Strategy,
    pub commit_key: CommitKey,
    /// The fixed width, in terminal cells, of every rendered chip
    pub chip_width: usize,
    pub log_level: log::LevelFilter,
    /// The file to log to. Nothing is logged if this is absent.
    pub log_file: Option<PathBuf>,
}

/// A partial [`Config`], as read from a file or given on the command line
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigBuilder {
    pub delimiter: Option<char>,
    pub strategy: Option<Strategy>,
    pub commit_key: Option<CommitKey>,
    pub chip_width: Option<usize>,
    pub log_level: Option<log::LevelFilter>,
    pub log_file: Option<PathBuf>,
}

/// An error from loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, err: io::Error },
    Parse(serde_yaml::Error),
    InvalidDelimiter(char),
    ChipTooNarrow { width: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use ConfigError::*;

        match self {
            Io { path, err } => write!(f, "failed to read config file '{}': {}", path.display(), err),
            Parse(err) => write!(f, "failed to parse config: {}", err),
            InvalidDelimiter(c) => write!(f, "invalid delimiter {:?}: must be printable", c),
            ChipTooNarrow { width } => write!(
                f,
                "chip width {} is too narrow; must be at least {}",
                width, MIN_CHIP_WIDTH
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { err, .. } => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().xinto()
    }
}

impl XFrom<ConfigBuilder> for Config {
    fn xfrom(builder: ConfigBuilder) -> Config {
        Config {
            delimiter: builder.delimiter.unwrap_or(DEFAULT_DELIMITER),
            strategy: builder.strategy.unwrap_or_default(),
            commit_key: builder.commit_key.unwrap_or(CommitKey::Enter),
            chip_width: builder.chip_width.unwrap_or(DEFAULT_CHIP_WIDTH),
            log_level: builder.log_level.unwrap_or(DEFAULT_LOG_LEVEL),
            log_file: builder.log_file,
        }
    }
}

impl Config {
    /// Checks the values that can't be expressed by their types alone
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiter.is_control() {
            return Err(ConfigError::InvalidDelimiter(self.delimiter));
        } else if self.chip_width < MIN_CHIP_WIDTH {
            return Err(ConfigError::ChipTooNarrow {
                width: self.chip_width,
            });
        }

        Ok(())
    }
}

impl ConfigBuilder {
    pub fn from_yaml(src: &str) -> Result<Self, ConfigError> {
        // An empty file is valid, and just means "use the defaults"
        if src.trim().is_empty() {
            return Ok(ConfigBuilder::default());
        }

        Ok(serde_yaml::from_str(src)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_owned(),
            err,
        })?;

        log::debug!("read config from '{}'", path.display());
        ConfigBuilder::from_yaml(&src)
    }

    /// Combines two builders, preferring the values from `overrides` wherever both are present
    pub fn merge(self, overrides: ConfigBuilder) -> ConfigBuilder {
        ConfigBuilder {
            delimiter: overrides.delimiter.or(self.delimiter),
            strategy: overrides.strategy.or(self.strategy),
            commit_key: overrides.commit_key.or(self.commit_key),
            chip_width: overrides.chip_width.or(self.chip_width),
            log_level: overrides.log_level.or(self.log_level),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    /// Fills in defaults and validates the result
    pub fn build(self) -> Result<Config, ConfigError> {
        let config: Config = self.xinto();
        config.validate()?;
        Ok(config)
    }
}

/// Finds the directory the configuration file should be in, if there is one
///
/// We search for the existence of a directory `$XDG_CONFIG_HOME/tagedit`, `$HOME/.config/tagedit`,
/// and then `$HOME/.tagedit`, returning the first that exists.
pub fn find_default_directory_location() -> Option<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").map(|dir| PathBuf::from(dir).join("tagedit"));
    let home = env::var_os("HOME").map(PathBuf::from);

    let candidates = xdg.into_iter().chain(
        home.into_iter()
            .flat_map(|h| vec![h.join(".config").join("tagedit"), h.join(".tagedit")]),
    );

    for dir in candidates {
        if dir.is_dir() {
            return Some(dir);
        }
    }

    None
}
