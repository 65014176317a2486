//! Record construction

use super::config::GeneratorConfig;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::message::MessageGenerator;
use super::timestamp::{Timestamp, ZoneMode};
use super::trace_id::TraceIdAllocator;
use rand::Rng;
use std::sync::Arc;

/// Produces one well-formed [`LogRecord`] per call
///
/// Cloning is cheap and clones share the trace id allocator, so several
/// producers can build records without ever repeating an id.
#[derive(Debug, Clone)]
pub struct RecordFactory {
    trace_ids: Arc<TraceIdAllocator>,
    messages: MessageGenerator,
    min_len: usize,
    max_len: usize,
    zone_mode: ZoneMode,
    include_pid: bool,
}

impl RecordFactory {
    pub fn new(trace_ids: Arc<TraceIdAllocator>) -> Self {
        let defaults = GeneratorConfig::default();
        Self {
            trace_ids,
            messages: MessageGenerator::new(),
            min_len: defaults.min_log_length,
            max_len: defaults.max_log_length,
            zone_mode: defaults.zone_mode,
            include_pid: defaults.include_pid,
        }
    }

    /// Factory using the length, zone and pid settings of a validated config
    pub fn from_config(config: &GeneratorConfig, trace_ids: Arc<TraceIdAllocator>) -> Self {
        Self::new(trace_ids)
            .with_length_range(config.min_log_length, config.max_log_length)
            .with_zone_mode(config.zone_mode)
            .with_include_pid(config.include_pid)
    }

    /// Inclusive message length bounds. A `max` below `min` is raised to `min`.
    #[must_use]
    pub fn with_length_range(mut self, min: usize, max: usize) -> Self {
        self.min_len = min;
        self.max_len = max.max(min);
        self
    }

    #[must_use]
    pub fn with_zone_mode(mut self, zone_mode: ZoneMode) -> Self {
        self.zone_mode = zone_mode;
        self
    }

    #[must_use]
    pub fn with_include_pid(mut self, include: bool) -> Self {
        self.include_pid = include;
        self
    }

    pub fn trace_ids(&self) -> &Arc<TraceIdAllocator> {
        &self.trace_ids
    }

    /// Uniform draw from the configured length range
    pub fn message_length<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min_len..=self.max_len)
    }

    pub fn next_record<R: Rng + ?Sized>(&self, rng: &mut R) -> LogRecord {
        let level: LogLevel = rng.gen();
        let trace_id = self.trace_ids.next_trace_id(self.include_pid);
        let length = self.message_length(rng);
        let message = self.messages.generate(rng, length);
        let timestamp = Timestamp::capture(self.zone_mode);
        LogRecord::new(timestamp, level, trace_id, message)
    }
}
