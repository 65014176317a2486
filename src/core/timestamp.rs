//! Timestamp capture and formatting
//!
//! A record's instant is captured once, truncated to microseconds, and
//! every wire format reformats that same instant. The formats here are the
//! fixed set the renderers need: ISO 8601 for structured formats, the
//! Apache access and error log layouts, and the two syslog layouts.

use chrono::{DateTime, FixedOffset, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time zone applied to captured timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneMode {
    /// Keep UTC; ISO 8601 text ends in `Z`
    Utc,

    /// Convert to the host's local offset; ISO 8601 text ends in `+HH:MM`
    #[default]
    Local,
}

impl fmt::Display for ZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneMode::Utc => write!(f, "UTC"),
            ZoneMode::Local => write!(f, "local"),
        }
    }
}

impl FromStr for ZoneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utc" => Ok(ZoneMode::Utc),
            "local" => Ok(ZoneMode::Local),
            _ => Err(format!("Invalid time zone: '{}' (expected 'local' or 'UTC')", s)),
        }
    }
}

/// A captured instant with microsecond precision and its zone mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    zone: ZoneMode,
}

impl Timestamp {
    /// Read the wall clock once and convert it according to `zone`
    #[must_use]
    pub fn capture(zone: ZoneMode) -> Self {
        Self::from_utc(Utc::now(), zone)
    }

    /// Build a timestamp from a UTC instant, converting to local time if asked
    #[must_use]
    pub fn from_utc(now: DateTime<Utc>, zone: ZoneMode) -> Self {
        let instant = match zone {
            ZoneMode::Utc => now.fixed_offset(),
            ZoneMode::Local => now.with_timezone(&Local).fixed_offset(),
        };
        Self {
            instant: instant.trunc_subsecs(6),
            zone,
        }
    }

    /// Build a timestamp at an explicit offset.
    ///
    /// In `Utc` mode the instant is normalized to `+00:00`.
    #[must_use]
    pub fn from_fixed(instant: DateTime<FixedOffset>, zone: ZoneMode) -> Self {
        let instant = match zone {
            ZoneMode::Utc => instant.with_timezone(&Utc).fixed_offset(),
            ZoneMode::Local => instant,
        };
        Self {
            instant: instant.trunc_subsecs(6),
            zone,
        }
    }

    pub fn instant(&self) -> &DateTime<FixedOffset> {
        &self.instant
    }

    pub fn zone(&self) -> ZoneMode {
        self.zone
    }

    #[must_use]
    pub fn format(&self, format: TimestampFormat) -> String {
        format.format(self)
    }
}

/// Timestamp layouts used by the wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2023-10-11T14:32:52.123456Z` in UTC mode,
    /// `2023-10-11T16:32:52.123456+02:00` in local mode
    Iso8601Micros,

    /// `11/Oct/2023:14:32:52 +0000`
    ///
    /// Wall-clock fields of the record's zone, seconds precision. The
    /// offset is always written as `+0000`.
    ApacheAccess,

    /// `Wed Oct 11 14:32:52.123456 2023`
    ApacheError,

    /// `Oct 11 14:32:52`
    BsdSyslog,

    /// `2023-10-11T14:32:52.123456Z`, always converted to UTC
    Rfc5424,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, timestamp: &Timestamp) -> String {
        let instant = &timestamp.instant;
        match self {
            TimestampFormat::Iso8601Micros => match timestamp.zone {
                ZoneMode::Utc => instant.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
                ZoneMode::Local => instant.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string(),
            },
            TimestampFormat::ApacheAccess => instant.format("%d/%b/%Y:%H:%M:%S +0000").to_string(),
            TimestampFormat::ApacheError => instant.format("%a %b %d %H:%M:%S%.6f %Y").to_string(),
            TimestampFormat::BsdSyslog => instant.format("%b %d %H:%M:%S").to_string(),
            TimestampFormat::Rfc5424 => instant
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.6fZ")
                .to_string(),
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Iso8601Micros => "ISO 8601 with microseconds (2023-10-11T14:32:52.123456Z)",
            TimestampFormat::ApacheAccess => "Apache access log (11/Oct/2023:14:32:52 +0000)",
            TimestampFormat::ApacheError => "Apache error log (Wed Oct 11 14:32:52.123456 2023)",
            TimestampFormat::BsdSyslog => "BSD syslog (Oct 11 14:32:52)",
            TimestampFormat::Rfc5424 => "RFC 5424 in UTC (2023-10-11T14:32:52.123456Z)",
        }
    }
}
