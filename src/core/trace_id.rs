//! Trace id allocation
//!
//! Trace ids come from a single counter shared by every producer. The
//! allocator is passed explicitly to whoever builds records, so tests can
//! start from a known value instead of depending on process-wide state.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic trace id source
///
/// # Example
///
/// ```
/// use fake_log_generator::TraceIdAllocator;
///
/// let ids = TraceIdAllocator::new().with_process_id(Some(42));
/// assert_eq!(ids.next_trace_id(true), "42-00000001");
/// assert_eq!(ids.next_trace_id(false), "00000002");
/// ```
#[derive(Debug)]
pub struct TraceIdAllocator {
    next: AtomicU64,
    process_id: Option<u32>,
}

impl TraceIdAllocator {
    /// Counter starting at 1, tagged with the current process id
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
            process_id: Some(std::process::id()),
        }
    }

    /// Override the process id used as prefix (`None` disables the prefix)
    #[must_use]
    pub fn with_process_id(mut self, process_id: Option<u32>) -> Self {
        self.process_id = process_id;
        self
    }

    pub fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    /// Allocate the next counter value
    #[inline]
    pub fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Allocate and format the next trace id.
    ///
    /// `{pid}-{counter:08}` when `include_process_id` is set and a process id
    /// is known, `{counter:08}` otherwise.
    pub fn next_trace_id(&self, include_process_id: bool) -> String {
        let value = self.next_value();
        match self.process_id {
            Some(pid) if include_process_id => format!("{}-{:08}", pid, value),
            _ => format!("{:08}", value),
        }
    }

    /// Value the next allocation will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for TraceIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
