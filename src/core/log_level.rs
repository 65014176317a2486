//! Log level definitions

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity carried by a synthesized record.
///
/// Only the four levels the generator emits exist here; the declaration
/// order matches the order in which they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    Info,
    Error,
    Debug,
    Warn,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Info, LogLevel::Error, LogLevel::Debug, LogLevel::Warn];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
            LogLevel::Warn => "WARN",
        }
    }

    /// Lowercase name, as used in Apache error log module tags (`core:error`)
    pub fn to_lowercase_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Error => "error",
            LogLevel::Debug => "debug",
            LogLevel::Warn => "warn",
        }
    }
}

impl Distribution<LogLevel> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LogLevel {
        LogLevel::ALL[rng.gen_range(0..LogLevel::ALL.len())]
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INFO" => Ok(LogLevel::Info),
            "ERROR" => Ok(LogLevel::Error),
            "DEBUG" => Ok(LogLevel::Debug),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Error.to_str(), "ERROR");
        assert_eq!(LogLevel::Error.to_lowercase_str(), "error");
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_sampling_covers_all_levels() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<LogLevel> = (0..200).map(|_| rng.gen::<LogLevel>()).collect();
        assert_eq!(seen.len(), LogLevel::ALL.len());
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"INFO\"");
    }
}
