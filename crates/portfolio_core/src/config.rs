//! Runtime configuration for the backoffice process.
//!
//! # Responsibility
//! - Normalize logging level and directory input.
//! - Read configuration from `PORTFOLIO_LOG_LEVEL` / `PORTFOLIO_LOG_DIR`.
//!
//! # Invariants
//! - Configuration only governs logging; store behavior is not configurable.
//! - A configured log directory is always absolute.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const LOG_LEVEL_ENV: &str = "PORTFOLIO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PORTFOLIO_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLevel(String),
    EmptyLogDir,
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log_dir cannot be empty"),
            Self::RelativeLogDir(dir) => {
                write!(f, "log_dir must be an absolute path, got `{dir}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Logging settings. `log_dir = None` disables file logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds a config from raw user input.
    pub fn new(level: &str, log_dir: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: log_dir.map(normalize_log_dir).transpose()?,
        })
    }

    /// Reads configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset level falls back to
    /// `default_log_level()`, blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let level = non_blank(LOG_LEVEL_ENV);
        let log_dir = non_blank(LOG_DIR_ENV);
        Self::new(
            level.as_deref().unwrap_or(default_log_level()),
            log_dir.as_deref(),
        )
    }
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLevel(other.to_string())),
    }
}

pub(crate) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyLogDir);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(ConfigError::RelativeLogDir(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}
