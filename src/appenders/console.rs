//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::{self, Write};

/// Standard output destination.
///
/// Always reports itself as a console, so it receives styled lines
/// unless an explicit policy says otherwise.
#[derive(Debug, Default)]
pub struct ConsoleAppender;

impl ConsoleAppender {
    pub fn new() -> Self {
        Self
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn is_console(&self) -> bool {
        true
    }
}
