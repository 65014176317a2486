//! # Fake Log Generator
//!
//! Synthesizes realistic log records at a configurable rate and renders each
//! one in a well-known log wire format, to feed log pipelines, parsers and
//! dashboards with plausible traffic.
//!
//! ## Features
//!
//! - **Seven Formats**: JSON, logfmt, Apache common/combined/error, BSD syslog, RFC 5424 syslog
//! - **Injectable Randomness**: pass a seeded RNG to get reproducible output
//! - **Concurrent Producers**: unique trace ids and whole-line writes across threads
//! - **Multiple Appenders**: stdout and lock-protected files
//!
//! ```
//! use fake_log_generator::prelude::*;
//! use std::sync::Arc;
//!
//! let factory = RecordFactory::new(Arc::new(TraceIdAllocator::new()))
//!     .with_zone_mode(ZoneMode::Utc);
//! let mut rng = rand::thread_rng();
//! let record = factory.next_record(&mut rng);
//! let line = OutputFormat::from_name("Apache error").render(&record, &mut rng);
//! assert!(line.ends_with(record.message()));
//! ```

pub mod appenders;
pub mod core;

pub mod prelude {
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::FileAppender;
    pub use crate::core::{
        render, Appender, Generator, GeneratorBuilder, GeneratorConfig, GeneratorError,
        GeneratorMetrics, LogLevel, LogRecord, MessageGenerator, OutputFormat, OutputTargets,
        RecordFactory, Result, ShutdownHandle, Timestamp, TimestampFormat, TraceIdAllocator, ZoneMode,
    };
}

pub use appenders::ConsoleAppender;
#[cfg(feature = "file")]
pub use appenders::FileAppender;
pub use core::{
    render, Appender, Generator, GeneratorBuilder, GeneratorConfig, GeneratorError,
    GeneratorMetrics, LogLevel, LogRecord, MessageGenerator, OutputFormat, OutputTargets,
    RecordFactory, Result, ShutdownHandle, Timestamp, TimestampFormat, TraceIdAllocator, ZoneMode,
};
