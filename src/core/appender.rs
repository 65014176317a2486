//! Appender trait for rendered line destinations

use super::error::Result;

/// A sink for rendered lines
///
/// `append` receives one line without its trailing newline and must write
/// the line and the newline as a single unit.
pub trait Appender: Send + Sync {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
