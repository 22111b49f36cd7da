//! Destinations backed by any `io::Write`

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writes each line, newline included, with a single `write_all`
pub struct WriterAppender<W: Write + Send> {
    name: String,
    writer: W,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut output = Vec::with_capacity(line.len() + 1);
        output.extend_from_slice(line.as_bytes());
        output.push(b'\n');
        self.writer.write_all(&output)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Hand one clone to a [`WriterAppender`] and keep another to read what
/// the logger wrote.
///
/// # Example
///
/// ```
/// use logex::appenders::{SharedBuffer, WriterAppender};
/// use logex::Appender;
///
/// let buffer = SharedBuffer::new();
/// let mut appender = WriterAppender::new("memory", buffer.clone());
/// appender.append("hello").unwrap();
///
/// assert_eq!(buffer.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
