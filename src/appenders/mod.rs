//! Appender implementations

pub mod channel;
#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod syslog;
pub mod writer;

pub use channel::ChannelAppender;
#[cfg(feature = "console")]
pub use console::ConsoleAppender;
#[cfg(feature = "file")]
pub use file::FileAppender;
pub use syslog::{platform_backend, SyslogBackend, SyslogSink};
#[cfg(all(unix, feature = "syslog"))]
pub use syslog::PosixSyslog;
pub use writer::{SharedBuffer, WriterAppender};

pub use crate::core::Appender;
