//! Log record structure

use super::log_level::LogLevel;
use super::timestamp::{Timestamp, TimestampFormat};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One synthesized event, prior to format-specific rendering
///
/// Records are immutable: every field is fixed at construction and the
/// message length is derived from the message on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: Timestamp,
    level: LogLevel,
    trace_id: String,
    message: String,
}

impl LogRecord {
    /// Keep every rendered record on a single line
    ///
    /// Newlines, carriage returns and tabs become single spaces, so the
    /// message keeps its character count.
    fn sanitize_message(message: &str) -> String {
        message.replace(['\n', '\r', '\t'], " ")
    }

    pub fn new(
        timestamp: Timestamp,
        level: LogLevel,
        trace_id: impl Into<String>,
        message: impl AsRef<str>,
    ) -> Self {
        Self {
            timestamp,
            level,
            trace_id: trace_id.into(),
            message: Self::sanitize_message(message.as_ref()),
        }
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Character count of the message
    pub fn length(&self) -> usize {
        self.message.chars().count()
    }

    /// The ISO 8601 text used by the structured formats
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TimestampFormat::Iso8601Micros)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LogRecord", 5)?;
        state.serialize_field("timestamp", &self.timestamp_text())?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("trace_id", &self.trace_id)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("length", &self.length())?;
        state.end()
    }
}
