//! Generator metrics
//!
//! Counters for monitoring a running generator: how many lines went out,
//! how many bytes reached the sinks, and how many sink writes were tried
//! and failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for generator observability
///
/// # Example
///
/// ```
/// use fake_log_generator::GeneratorMetrics;
///
/// let metrics = GeneratorMetrics::new();
///
/// metrics.record_write_attempts(2);
/// metrics.record_write_failure();
/// metrics.record_emitted(120);
///
/// assert_eq!(metrics.lines_emitted(), 1);
/// assert_eq!(metrics.bytes_written(), 120);
/// assert_eq!(metrics.write_failures(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct GeneratorMetrics {
    /// Lines rendered and handed to the sinks
    lines_emitted: AtomicU64,

    /// Bytes written across all sinks, newlines included
    bytes_written: AtomicU64,

    /// Sink writes tried, one per line per sink
    write_attempts: AtomicU64,

    /// Sink writes that returned an error
    write_failures: AtomicU64,
}

impl GeneratorMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_emitted: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_attempts: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_attempts(&self) -> u64 {
        self.write_attempts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Record one emitted line and the bytes it took across sinks
    #[inline]
    pub fn record_emitted(&self, bytes: u64) -> u64 {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        self.lines_emitted.fetch_add(1, Ordering::Relaxed)
    }

    /// Record sink writes about to be tried
    #[inline]
    pub fn record_write_attempts(&self, count: u64) -> u64 {
        self.write_attempts.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage of sink writes (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.write_attempts() as f64;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_emitted.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_attempts.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for GeneratorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GeneratorMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_emitted: AtomicU64::new(self.lines_emitted()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            write_attempts: AtomicU64::new(self.write_attempts()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}
