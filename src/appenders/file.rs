//! File appender implementation

use crate::core::{Appender, GeneratorError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends lines to a file
///
/// Missing parent directories are created on open. Every line is written
/// together with its newline while holding an exclusive advisory lock, so
/// several generators (threads or processes) can share one file without
/// interleaving partial lines.
pub struct FileAppender {
    file: File,
    path: PathBuf,
    buffer: Vec<u8>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Self::ensure_parent(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| GeneratorError::file_appender(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            file,
            path,
            buffer: Vec::with_capacity(256),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| {
                    GeneratorError::io_operation(
                        "creating log directory",
                        format!("cannot create '{}'", parent.display()),
                        e,
                    )
                })
            }
            _ => Ok(()),
        }
    }

    fn write_locked(&mut self) -> Result<()> {
        self.file
            .lock_exclusive()
            .map_err(|_| GeneratorError::file_lock(self.path.display().to_string()))?;

        let result = self.file.write_all(&self.buffer);
        let unlock = self.file.unlock();

        result?;
        unlock?;
        Ok(())
    }
}

impl Appender for FileAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.buffer.clear();
        self.buffer.extend_from_slice(line.as_bytes());
        self.buffer.push(b'\n');
        self.write_locked()
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
