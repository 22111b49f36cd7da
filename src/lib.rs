//! # Logex
//!
//! A styled, template-driven logging library.
//!
//! ## Features
//!
//! - **Templates**: `{datetime}`, `{level}`, `{prefix}` and `{msg}` placeholders,
//!   each computed only when the template uses it
//! - **Queued dispatch**: callers enqueue, one worker thread per logger renders and writes
//! - **Fan-out**: console, file, writer, channel and syslog destinations, each with
//!   a styled, plain or serialized rendering policy
//! - **Record codec**: one-line text form of a record and its style that decodes back
//!
//! ## Example
//!
//! ```
//! use logex::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .properties(Properties::default().with_format("[{level}] ({prefix}): {msg}"))
//!     .appender(WriterAppender::new("memory", buffer.clone()))
//!     .build()
//!     .unwrap();
//!
//! logger.warn("disk at 91%").unwrap();
//! logger.flush().unwrap();
//!
//! assert_eq!(buffer.contents(), "[Warning] (App): disk at 91%\n");
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ChannelAppender, SharedBuffer, WriterAppender};
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::FileAppender;
    pub use crate::core::{
        Appender, Color, DispatchMode, Emphasis, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, LoggerRegistry, Properties, RenderPolicy, Result, Style,
        TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use appenders::{ChannelAppender, SharedBuffer, WriterAppender};
#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
#[cfg(feature = "file")]
pub use appenders::FileAppender;
pub use core::{
    Appender, Clock, Color, DefaultStyles, DispatchMode, Emphasis, ErrorCallback, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggerRegistry, Placeholder,
    Properties, RenderPolicy, Result, Style, SyslogSeverity, SystemClock, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_TEMPLATE,
};
