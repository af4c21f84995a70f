//! Initialization options and the validated configuration record

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::caller::{BacktraceCaller, CallerResolver};
use crate::clock::{Clock, SystemClock};
use crate::console::Console;
use crate::errors::Result;

/// One initialization option; options apply in order, later ones win
#[derive(Clone)]
pub enum LogOption {
    /// Mirror every line to standard output
    Stdout(bool),
    /// Extra frames to skip when resolving the call site
    CallerSkip(usize),
    /// Time source for headers and rotation
    Clock(Arc<dyn Clock>),
    /// Call-site resolution strategy
    Resolver(Arc<dyn CallerResolver>),
    /// Where mirrored lines and diagnostics go instead of standard output
    Console(Console),
}

impl fmt::Debug for LogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOption::Stdout(b) => f.debug_tuple("Stdout").field(b).finish(),
            LogOption::CallerSkip(n) => f.debug_tuple("CallerSkip").field(n).finish(),
            LogOption::Clock(_) => f.write_str("Clock(..)"),
            LogOption::Resolver(_) => f.write_str("Resolver(..)"),
            LogOption::Console(c) => f.debug_tuple("Console").field(c).finish(),
        }
    }
}

/// Options folded into their final values
pub(crate) struct Settings {
    pub(crate) stdout: bool,
    pub(crate) caller_skip: usize,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) resolver: Arc<dyn CallerResolver>,
    pub(crate) console: Console,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stdout: false,
            caller_skip: 0,
            clock: Arc::new(SystemClock),
            resolver: Arc::new(BacktraceCaller),
            console: Console::stdout(),
        }
    }
}

impl Settings {
    pub(crate) fn from_options(opts: impl IntoIterator<Item = LogOption>) -> Self {
        opts.into_iter().fold(Self::default(), |mut s, opt| {
            match opt {
                LogOption::Stdout(b) => s.stdout = b,
                LogOption::CallerSkip(n) => s.caller_skip = n,
                LogOption::Clock(c) => s.clock = c,
                LogOption::Resolver(r) => s.resolver = r,
                LogOption::Console(c) => s.console = c,
            }
            s
        })
    }
}

fn default_level() -> String {
    "debug".to_string()
}

/// Validated logger configuration, as produced by an external loader
///
/// ```
/// use xlog::LogConfig;
///
/// let config = LogConfig::from_toml_str(r#"
///     dir = "./logs"
///     level = "info"
///     stdout = true
/// "#).unwrap();
/// assert_eq!(config.level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Base directory; hourly files go to `<dir>/<YYYYMMDD>/<HH>.log`
    pub dir: PathBuf,
    /// Level name; unrecognized names keep the default (DEBUG)
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub stdout: bool,
    #[serde(default)]
    pub caller_skip: usize,
}

impl LogConfig {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            level: default_level(),
            stdout: false,
            caller_skip: 0,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    /// Parse a TOML table with `dir`, `level`, `stdout` and `caller_skip`
    ///
    /// # Errors
    ///
    /// Returns [`XlogError::InvalidConfig`](crate::XlogError::InvalidConfig)
    /// when the text is not valid TOML or `dir` is missing.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The record expressed as initialization options
    pub fn options(&self) -> Vec<LogOption> {
        vec![
            LogOption::Stdout(self.stdout),
            LogOption::CallerSkip(self.caller_skip),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_from_toml_defaults() {
        let config = LogConfig::from_toml_str(r#"dir = "/tmp/app""#).unwrap();
        assert_eq!(config, LogConfig::new("/tmp/app"));
        assert_eq!(config.level, "debug");
        assert!(!config.stdout);
    }

    #[test]
    fn test_from_toml_full() {
        let config = LogConfig::from_toml_str(
            r#"
            dir = "logs"
            level = "WARN"
            stdout = true
            caller_skip = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.dir, PathBuf::from("logs"));
        assert_eq!(config.level, "WARN");
        assert!(config.stdout);
        assert_eq!(config.caller_skip, 2);
    }

    #[test]
    fn test_from_toml_missing_dir() {
        let err = LogConfig::from_toml_str(r#"level = "info""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_options_apply_in_order() {
        let settings = Settings::from_options([
            LogOption::Stdout(true),
            LogOption::CallerSkip(3),
            LogOption::Stdout(false),
        ]);
        assert!(!settings.stdout);
        assert_eq!(settings.caller_skip, 3);
    }

    #[test]
    fn test_config_options() {
        let config = LogConfig::new("x").with_stdout(true);
        let settings = Settings::from_options(config.options());
        assert!(settings.stdout);
        assert_eq!(settings.caller_skip, 0);
    }
}
