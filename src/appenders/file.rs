//! File appender implementation

use crate::core::{Appender, LoggerError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-mode file destination
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    lock: bool,
}

impl FileAppender {
    /// Open (or create) `path` for appending
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("{}: {}", path.display(), e),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            lock: false,
        })
    }

    /// Hold an exclusive advisory lock around every line.
    ///
    /// Each locked write is flushed before the lock is released, so other
    /// processes appending to the same file see whole lines only.
    #[must_use]
    pub fn with_locking(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_locked(writer: &mut BufWriter<File>, path: &Path, bytes: &[u8]) -> Result<()> {
        writer
            .get_ref()
            .lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        let written = writer.write_all(bytes).and_then(|()| writer.flush());
        let unlocked = FileExt::unlock(writer.get_ref());

        written?;
        unlocked.map_err(|_| LoggerError::file_lock(path.display().to_string()))
    }
}

impl Appender for FileAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        let mut output = String::with_capacity(line.len() + 1);
        output.push_str(line);
        output.push('\n');

        if self.lock {
            Self::write_locked(writer, &self.path, output.as_bytes())
        } else {
            writer.write_all(output.as_bytes())?;
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
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
