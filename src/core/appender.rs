//! Appender trait for log output destinations

use super::error::Result;

/// A destination that accepts finished lines.
///
/// The logger renders (or serializes) each record before handing it over;
/// `append` receives one line without its terminator and must write it,
/// newline included, as a single unit.
pub trait Appender: Send {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Console destinations always receive styled output
    fn is_console(&self) -> bool {
        false
    }
}
