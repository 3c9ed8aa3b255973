//! Sorter configuration.
//!
//! [`SorterConfig`] carries the time-scale and the thread parameters for the
//! sort tasks. It can be built in code, loaded from TOML (with the default
//! `config-file` feature), and overlaid with environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `SLEEPSORT_TIME_STEP` | `time_step` (duration string, e.g. `"250us"`) |
//! | `SLEEPSORT_THREAD_NAME` | `thread_name` |
//! | `SLEEPSORT_STACK_SIZE` | `stack_size` (bytes) |
//!
//! ```toml
//! time_step = "2ms"
//! thread_name = "sorter"
//! stack_size = 131072
//! ```

use crate::time::{DurationParseError, parse_duration};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`SorterConfig::time_step`].
pub const ENV_TIME_STEP: &str = "SLEEPSORT_TIME_STEP";
/// Environment variable overriding [`SorterConfig::thread_name`].
pub const ENV_THREAD_NAME: &str = "SLEEPSORT_THREAD_NAME";
/// Environment variable overriding [`SorterConfig::stack_size`].
pub const ENV_STACK_SIZE: &str = "SLEEPSORT_STACK_SIZE";

/// Errors raised while loading or validating a [`SorterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    #[cfg(feature = "config-file")]
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// A duration field did not parse.
    #[error("invalid duration for {field}")]
    InvalidDuration {
        /// The offending field or variable.
        field: &'static str,
        /// The parse failure.
        #[source]
        source: DurationParseError,
    },
    /// A field holds a value outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// The offending field or variable.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Configuration for a [`SleepSorter`](crate::sorter::SleepSorter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SorterConfig {
    /// Sleep per unit of value. A task holding `v` sleeps `v × time_step`.
    pub time_step: Duration,
    /// Prefix for sort task thread names; the task index is appended.
    pub thread_name: String,
    /// Stack size for sort task threads, or `None` for the platform default.
    pub stack_size: Option<usize>,
}

impl SorterConfig {
    /// Default time-scale.
    pub const DEFAULT_TIME_STEP: Duration = Duration::from_millis(1);
    /// Default thread name prefix.
    pub const DEFAULT_THREAD_NAME: &'static str = "sleepsort-task";
    /// Default task stack size. Tasks only park and send, so this stays small.
    pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time-scale.
    #[must_use]
    pub fn with_time_step(mut self, time_step: Duration) -> Self {
        self.time_step = time_step;
        self
    }

    /// Sets the thread name prefix.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Sets the task stack size; `None` uses the platform default.
    #[must_use]
    pub fn with_stack_size(mut self, stack_size: Option<usize>) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "thread_name",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.stack_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "stack_size",
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }

    /// Overlays `SLEEPSORT_*` environment variables.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlays variables looked up through `lookup`.
    ///
    /// Same rules as [`apply_env`](Self::apply_env), with the lookup made
    /// explicit so callers can supply their own variable table.
    pub fn apply_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(ENV_TIME_STEP) {
            self.time_step = parse_duration(&raw).map_err(|source| {
                ConfigError::InvalidDuration {
                    field: ENV_TIME_STEP,
                    source,
                }
            })?;
        }
        if let Some(raw) = lookup(ENV_THREAD_NAME) {
            self.thread_name = raw;
        }
        if let Some(raw) = lookup(ENV_STACK_SIZE) {
            let size = raw
                .trim()
                .parse::<usize>()
                .map_err(|err| ConfigError::InvalidValue {
                    field: ENV_STACK_SIZE,
                    reason: err.to_string(),
                })?;
            self.stack_size = Some(size);
        }
        self.validate()?;
        Ok(self)
    }
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            time_step: Self::DEFAULT_TIME_STEP,
            thread_name: Self::DEFAULT_THREAD_NAME.to_owned(),
            stack_size: Some(Self::DEFAULT_STACK_SIZE),
        }
    }
}

#[cfg(feature = "config-file")]
mod file {
    use super::{ConfigError, SorterConfig, parse_duration};
    use serde::Deserialize;
    use std::path::Path;

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct RawConfig {
        time_step: Option<String>,
        thread_name: Option<String>,
        stack_size: Option<usize>,
    }

    impl SorterConfig {
        /// Parses a TOML document. Missing fields keep their defaults.
        pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
            let raw: RawConfig = toml::from_str(text)?;
            let mut config = Self::default();
            if let Some(step) = raw.time_step {
                config.time_step = parse_duration(&step).map_err(|source| {
                    ConfigError::InvalidDuration {
                        field: "time_step",
                        source,
                    }
                })?;
            }
            if let Some(name) = raw.thread_name {
                config.thread_name = name;
            }
            if let Some(size) = raw.stack_size {
                config.stack_size = Some(size);
            }
            config.validate()?;
            Ok(config)
        }

        /// Reads and parses a TOML file.
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&text)
        }
    }
}

/// Loads a config file if one is given, then overlays the environment.
///
/// Without the `config-file` feature a path is rejected.
pub fn load(path: Option<&Path>) -> Result<SorterConfig, ConfigError> {
    let base = match path {
        #[cfg(feature = "config-file")]
        Some(path) => SorterConfig::from_toml_file(path)?,
        #[cfg(not(feature = "config-file"))]
        Some(path) => {
            return Err(ConfigError::InvalidValue {
                field: "config",
                reason: format!(
                    "cannot load {}: built without the config-file feature",
                    path.display()
                ),
            });
        }
        None => SorterConfig::default(),
    };
    base.apply_env()
}
