//! Main logger implementation

use super::{
    appender::Appender,
    dispatch::{spawn_worker, DispatchQueue},
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    properties::Properties,
    sink::{ErrorCallback, FanOut, RenderPolicy, Sink},
    style::Style,
    template,
    timestamp::{Clock, SystemClock, TimestampFormat},
};
use crate::appenders::syslog::{platform_backend, SyslogBackend, SyslogSink};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Where rendering and writing happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchMode {
    /// On the calling thread, under the fan-out lock
    Inline,
    /// On the logger's worker thread; callers only enqueue
    #[default]
    Queued,
}

struct Shared {
    properties: RwLock<Arc<Properties>>,
    fan_out: FanOut,
}

impl Shared {
    fn snapshot(&self) -> Arc<Properties> {
        Arc::clone(&self.properties.read())
    }
}

/// A named logger with its own destinations and (in queued mode) worker
///
/// # Example
///
/// ```
/// use logex::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .properties(Properties::default().with_format("{level}: {msg}"))
///     .appender(WriterAppender::new("memory", buffer.clone()))
///     .build()
///     .unwrap();
///
/// logger.info("service started").unwrap();
/// logger.flush().unwrap();
/// assert_eq!(buffer.lines(), vec!["Info: service started".to_string()]);
/// ```
pub struct Logger {
    shared: Arc<Shared>,
    metrics: Arc<LoggerMetrics>,
    queue: Option<Arc<DispatchQueue>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    stopped: AtomicBool,
    mode: DispatchMode,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> String {
        self.shared.snapshot().name.clone()
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Log `message` with the level's current default style
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        let props = self.shared.snapshot();
        let record = LogRecord::new(level, message).with_style(props.default_style(level));
        self.submit(record, &props)
    }

    /// Log with an explicit style instead of the level default
    pub fn log_styled(&self, level: LogLevel, message: impl Into<String>, style: Style) -> Result<()> {
        let props = self.shared.snapshot();
        self.submit(LogRecord::new(level, message).with_style(style), &props)
    }

    /// Log with a per-record prefix in place of the default prefix
    pub fn log_prefixed(
        &self,
        level: LogLevel,
        prefix: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        let props = self.shared.snapshot();
        let record = LogRecord::new(level, message)
            .with_prefix(prefix)
            .with_style(props.default_style(level));
        self.submit(record, &props)
    }

    /// Log a fully built record; its style is used as given
    pub fn log_record(&self, record: LogRecord) -> Result<()> {
        let props = self.shared.snapshot();
        self.submit(record, &props)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn verbose(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Verbose, message)
    }

    fn submit(&self, record: LogRecord, props: &Properties) -> Result<()> {
        template::validate(&props.format)?;

        if !record.level.is_enabled(props.verbose) {
            self.metrics.record_filtered();
            return Ok(());
        }

        match &self.queue {
            Some(queue) => queue.enqueue(record).map_err(|e| {
                self.metrics.record_rejected();
                e
            }),
            None => {
                if self.stopped.load(Ordering::Acquire) {
                    self.metrics.record_rejected();
                    return Err(LoggerError::LoggerStopped);
                }
                self.shared.fan_out.dispatch(&record, props);
                Ok(())
            }
        }
    }

    /// Current configuration snapshot
    pub fn properties(&self) -> Arc<Properties> {
        self.shared.snapshot()
    }

    /// Replace the whole configuration; rejected if the template lacks `{msg}`
    pub fn set_properties(&self, properties: Properties) -> Result<()> {
        template::validate(&properties.format)?;
        *self.shared.properties.write() = Arc::new(properties);
        Ok(())
    }

    /// Edit a copy of the configuration and swap it in if still valid
    pub fn update_properties<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Properties),
    {
        let mut current = self.shared.properties.write();
        let mut next = Properties::clone(&current);
        edit(&mut next);
        template::validate(&next.format)?;
        *current = Arc::new(next);
        Ok(())
    }

    fn replace_properties<F>(&self, edit: F)
    where
        F: FnOnce(&mut Properties),
    {
        let mut current = self.shared.properties.write();
        let mut next = Properties::clone(&current);
        edit(&mut next);
        *current = Arc::new(next);
    }

    pub fn set_format(&self, format: impl Into<String>) -> Result<()> {
        let format = format.into();
        template::validate(&format)?;
        self.replace_properties(|props| props.format = format);
        Ok(())
    }

    pub fn set_default_prefix(&self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.replace_properties(|props| props.default_prefix = prefix);
    }

    pub fn set_date_time_format(&self, format: impl Into<TimestampFormat>) {
        let format = format.into();
        self.replace_properties(|props| props.date_time_format = format);
    }

    /// Change the default style of `level` for calls made from now on
    pub fn set_default_style(&self, level: LogLevel, style: Style) {
        self.replace_properties(|props| props.default_styles.set(level, style));
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.replace_properties(|props| props.verbose = verbose);
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.shared.fan_out.add_sink(Sink::new(appender));
    }

    pub fn add_appender_with_policy(&self, appender: Box<dyn Appender>, policy: RenderPolicy) {
        self.shared
            .fan_out
            .add_sink(Sink::with_policy(appender, policy));
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Most recent destination failure, as `"<destination>: <error>"`
    pub fn last_error(&self) -> Option<String> {
        self.shared.fan_out.last_error()
    }

    /// Records accepted but not yet picked up by the worker
    pub fn pending(&self) -> usize {
        self.queue.as_ref().map_or(0, |queue| queue.len())
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Wait for queued records to be written, then flush every destination
    pub fn flush(&self) -> Result<()> {
        if let Some(queue) = &self.queue {
            if !queue.wait_idle(DEFAULT_SHUTDOWN_TIMEOUT) {
                return Err(LoggerError::other(format!(
                    "queued records not written within {:?}",
                    DEFAULT_SHUTDOWN_TIMEOUT
                )));
            }
        }
        self.shared.fan_out.flush_all()
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// New calls are rejected with [`LoggerError::LoggerStopped`]; records
    /// accepted earlier are drained by the worker before it exits.
    ///
    /// **Note**: When the logger is dropped without calling `shutdown()` explicitly,
    /// it uses [`DEFAULT_SHUTDOWN_TIMEOUT`] (5 seconds).
    ///
    /// # Returns
    ///
    /// `true` if shutdown completed successfully within timeout, `false` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use logex::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder().build().unwrap();
    /// logger.info("Important message").unwrap();
    ///
    /// assert!(logger.shutdown(Duration::from_secs(10)));
    /// assert!(logger.info("too late").is_err());
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.stopped.store(true, Ordering::Release);
        if let Some(queue) = &self.queue {
            queue.shutdown();
        }

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let start = Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Dispatch worker panicked during shutdown: {:?}", e);
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Dispatch worker did not finish within {:?}. \
                         Some records may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.shared.fan_out.flush_all() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }

        true
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.is_running() || self.worker.lock().is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
        self.shared.fan_out.close_syslog();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logex::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .properties(Properties::default().with_default_prefix("api"))
///     .appender_with_policy(WriterAppender::new("audit", Vec::<u8>::new()), RenderPolicy::Serialized)
///     .mode(DispatchMode::Inline)
///     .on_error(Arc::new(|name: &str, err: &LoggerError| {
///         eprintln!("{} failed: {}", name, err)
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.mode(), DispatchMode::Inline);
/// ```
pub struct LoggerBuilder {
    properties: Properties,
    sinks: Vec<Sink>,
    mode: DispatchMode,
    clock: Arc<dyn Clock>,
    on_error: Option<ErrorCallback>,
    syslog_backend: Option<Box<dyn SyslogBackend>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            properties: Properties::default(),
            sinks: Vec::new(),
            mode: DispatchMode::default(),
            clock: Arc::new(SystemClock),
            on_error: None,
            syslog_backend: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Add an appender; its policy follows the properties
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.sinks.push(Sink::new(Box::new(appender)));
        self
    }

    /// Add an appender with a fixed render policy
    #[must_use = "builder methods return a new value"]
    pub fn appender_with_policy<A: Appender + 'static>(
        mut self,
        appender: A,
        policy: RenderPolicy,
    ) -> Self {
        self.sinks.push(Sink::with_policy(Box::new(appender), policy));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Time source for `{datetime}`
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Receive destination failures instead of the stderr report
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Syslog backend used when `properties.syslog` is set; defaults to the platform one
    #[must_use = "builder methods return a new value"]
    pub fn syslog_backend(mut self, backend: Box<dyn SyslogBackend>) -> Self {
        self.syslog_backend = Some(backend);
        self
    }

    /// Build the Logger
    ///
    /// Fails if the template has no `{msg}`, the syslog session cannot be
    /// opened, or the worker thread cannot be started.
    pub fn build(self) -> Result<Logger> {
        template::validate(&self.properties.format)?;

        let metrics = Arc::new(LoggerMetrics::new());
        let fan_out = FanOut::new(self.clock, Arc::clone(&metrics), self.on_error);
        for sink in self.sinks {
            fan_out.add_sink(sink);
        }

        if self.properties.syslog {
            match self.syslog_backend.or_else(platform_backend) {
                Some(backend) => fan_out.set_syslog(SyslogSink::open(backend, &self.properties.name)?),
                None => eprintln!(
                    "[LOGGER WARNING] Syslog requested for '{}' but not available on this platform",
                    self.properties.name
                ),
            }
        }

        let worker_name = format!("logex-{}", self.properties.name);
        let shared = Arc::new(Shared {
            properties: RwLock::new(Arc::new(self.properties)),
            fan_out,
        });

        let (queue, worker) = match self.mode {
            DispatchMode::Inline => (None, None),
            DispatchMode::Queued => {
                let queue = Arc::new(DispatchQueue::new());
                let worker_shared = Arc::clone(&shared);
                let handle = spawn_worker(worker_name, Arc::clone(&queue), move |record| {
                    let props = worker_shared.snapshot();
                    worker_shared.fan_out.dispatch(&record, &props);
                })
                .map_err(|e| {
                    LoggerError::io_operation("spawn dispatch worker", e.to_string(), e)
                })?;
                (Some(queue), Some(handle))
            }
        };

        Ok(Logger {
            shared,
            metrics,
            queue,
            worker: Mutex::new(worker),
            stopped: AtomicBool::new(false),
            mode: self.mode,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
