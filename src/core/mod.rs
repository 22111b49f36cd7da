//! Core logger types and traits

pub mod appender;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod properties;
pub mod registry;
pub mod sink;
pub mod style;
pub mod template;
pub mod timestamp;

pub use appender::Appender;
pub use dispatch::DispatchQueue;
pub use error::{LoggerError, Result};
pub use log_level::{LogLevel, SyslogSeverity};
pub use log_record::LogRecord;
pub use logger::{DispatchMode, Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use properties::{DefaultStyles, Properties};
pub use registry::{LoggerRegistry, GLOBAL_LOGGER};
pub use sink::{ErrorCallback, RenderPolicy};
pub use style::{Color, Emphasis, Style};
pub use template::{Placeholder, RenderContext, DEFAULT_TEMPLATE};
pub use timestamp::{Clock, SystemClock, TimestampFormat, DEFAULT_DATE_TIME_PATTERN};
