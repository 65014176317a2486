//! Appender implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;

pub use console::ConsoleAppender;
#[cfg(feature = "file")]
pub use file::FileAppender;

pub use crate::core::Appender;
