//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::{self, Write};

/// Which standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes each line, newline-terminated, to stdout or stderr
///
/// The stream is locked for the duration of one line and the line is
/// written with its newline in a single call, so lines from different
/// threads never interleave.
pub struct ConsoleAppender {
    target: ConsoleTarget,
    buffer: Vec<u8>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_target(ConsoleTarget::Stdout)
    }

    pub fn with_target(target: ConsoleTarget) -> Self {
        Self {
            target,
            buffer: Vec::with_capacity(256),
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.buffer.clear();
        self.buffer.extend_from_slice(line.as_bytes());
        self.buffer.push(b'\n');

        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(&self.buffer)?;
                out.flush()?;
            }
            ConsoleTarget::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(&self.buffer)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush()?,
            ConsoleTarget::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
