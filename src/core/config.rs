//! Generator configuration
//!
//! Holds everything the emission loop needs to know: message length bounds,
//! pacing, trace id and time zone options, the wire format and how many
//! producers share the work. Values are checked once by [`GeneratorConfig::validate`]
//! before a generator is built, so nothing downstream has to re-check them.

use super::error::{GeneratorError, Result};
use super::output_format::OutputFormat;
use super::timestamp::ZoneMode;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MIN_LOG_LENGTH: usize = 90;
pub const DEFAULT_MAX_LOG_LENGTH: usize = 100;
pub const DEFAULT_LINES_PER_SECOND: f64 = 1.0;
/// File used when file output is requested without a path
pub const DEFAULT_OUTPUT_FILE: &str = "fake.log";

/// Configuration for a [`Generator`](crate::Generator)
///
/// # Examples
///
/// ```
/// use fake_log_generator::{GeneratorConfig, OutputFormat, ZoneMode};
///
/// let config = GeneratorConfig::new()
///     .with_length_range(20, 40)
///     .with_lines_per_second(50.0)
///     .with_zone_mode(ZoneMode::Utc)
///     .with_format(OutputFormat::Logfmt);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Shortest message, inclusive
    pub min_log_length: usize,
    /// Longest message, inclusive
    pub max_log_length: usize,
    /// Aggregate emission rate across all producers
    pub lines_per_second: f64,
    /// Prefix trace ids with the process id
    pub include_pid: bool,
    pub zone_mode: ZoneMode,
    pub format: OutputFormat,
    /// Number of concurrent producer threads
    pub producers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_log_length: DEFAULT_MIN_LOG_LENGTH,
            max_log_length: DEFAULT_MAX_LOG_LENGTH,
            lines_per_second: DEFAULT_LINES_PER_SECOND,
            include_pid: true,
            zone_mode: ZoneMode::default(),
            format: OutputFormat::default(),
            producers: 1,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_length_range(mut self, min: usize, max: usize) -> Self {
        self.min_log_length = min;
        self.max_log_length = max;
        self
    }

    #[must_use]
    pub fn with_lines_per_second(mut self, rate: f64) -> Self {
        self.lines_per_second = rate;
        self
    }

    #[must_use]
    pub fn with_include_pid(mut self, include: bool) -> Self {
        self.include_pid = include;
        self
    }

    #[must_use]
    pub fn with_zone_mode(mut self, zone_mode: ZoneMode) -> Self {
        self.zone_mode = zone_mode;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    /// Reject settings the generator cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.min_log_length > self.max_log_length {
            return Err(GeneratorError::config(
                "GeneratorConfig",
                format!(
                    "min_log_length ({}) must not exceed max_log_length ({})",
                    self.min_log_length, self.max_log_length
                ),
            ));
        }
        if !self.lines_per_second.is_finite() || self.lines_per_second <= 0.0 {
            return Err(GeneratorError::config(
                "GeneratorConfig",
                format!(
                    "lines_per_second must be a positive number, got {}",
                    self.lines_per_second
                ),
            ));
        }
        if self.producers == 0 {
            return Err(GeneratorError::config(
                "GeneratorConfig",
                "producers must be at least 1",
            ));
        }
        if self.checked_interval().is_none() {
            return Err(GeneratorError::config(
                "GeneratorConfig",
                format!(
                    "lines_per_second {} gives a delay too long to represent",
                    self.lines_per_second
                ),
            ));
        }
        if self.checked_producer_interval().is_none() {
            return Err(GeneratorError::config(
                "GeneratorConfig",
                format!(
                    "{} producers at {} lines per second give a per-producer delay too long to represent",
                    self.producers, self.lines_per_second
                ),
            ));
        }
        Ok(())
    }

    fn checked_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.lines_per_second).ok()
    }

    fn checked_producer_interval(&self) -> Option<Duration> {
        let producers = u32::try_from(self.producers.max(1)).ok()?;
        self.checked_interval()?.checked_mul(producers)
    }

    /// Delay between two consecutive lines of the whole generator
    ///
    /// Saturates at [`Duration::MAX`] for settings [`validate`](Self::validate)
    /// rejects.
    pub fn interval(&self) -> Duration {
        self.checked_interval().unwrap_or(Duration::MAX)
    }

    /// Delay each producer waits between its own lines
    ///
    /// Saturates at [`Duration::MAX`] for settings [`validate`](Self::validate)
    /// rejects.
    pub fn producer_interval(&self) -> Duration {
        self.checked_producer_interval().unwrap_or(Duration::MAX)
    }
}

/// Where rendered lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTargets {
    pub stdout: bool,
    pub file: Option<PathBuf>,
}

impl OutputTargets {
    /// Resolve an output selector (`stdout` or `file`, any case) and an
    /// optional path.
    ///
    /// Giving a path always enables file output, alongside stdout when the
    /// selector is `stdout`. Selecting `file` without a path writes to
    /// [`DEFAULT_OUTPUT_FILE`].
    pub fn resolve(output: &str, file: Option<PathBuf>) -> Result<Self> {
        let output = output.to_lowercase();
        let stdout = output == "stdout";
        let file = match file {
            Some(path) => Some(path),
            None if output == "file" => Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            None => None,
        };

        if !stdout && file.is_none() {
            return Err(GeneratorError::config(
                "output",
                format!("unknown output '{}' (expected 'stdout' or 'file')", output),
            ));
        }
        Ok(Self { stdout, file })
    }
}
