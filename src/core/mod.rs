//! Core generator types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod generator;
pub mod log_level;
pub mod log_record;
pub mod message;
pub mod metrics;
pub mod output_format;
pub mod record_factory;
pub mod timestamp;
pub mod trace_id;

pub use appender::Appender;
pub use config::{GeneratorConfig, OutputTargets};
pub use error::{GeneratorError, Result};
pub use generator::{Generator, GeneratorBuilder, ShutdownHandle};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use message::MessageGenerator;
pub use metrics::GeneratorMetrics;
pub use output_format::{render, OutputFormat};
pub use record_factory::RecordFactory;
pub use timestamp::{Timestamp, TimestampFormat, ZoneMode};
pub use trace_id::TraceIdAllocator;
