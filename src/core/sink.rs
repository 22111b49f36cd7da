//! Fan-out of one record to every configured destination
//!
//! Each destination is written under a single lock, so lines from
//! different records never interleave. A destination that fails or
//! panics is reported and skipped; the rest still receive the line.

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::metrics::LoggerMetrics;
use super::properties::Properties;
use super::template::{self, RenderContext};
use super::timestamp::Clock;
use crate::appenders::syslog::SyslogSink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// How a destination receives a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderPolicy {
    /// Rendered line painted with the record's style
    Styled,
    /// Rendered line without escape sequences
    Plain,
    /// Record codec text
    Serialized,
}

impl RenderPolicy {
    /// Policy for a destination with no explicit choice.
    ///
    /// Console destinations are always styled; everything else follows
    /// `serialize_to_non_console`, then `write_style_to_non_console`.
    pub fn resolve(explicit: Option<RenderPolicy>, is_console: bool, props: &Properties) -> Self {
        match explicit {
            Some(policy) => policy,
            None if is_console => RenderPolicy::Styled,
            None if props.serialize_to_non_console => RenderPolicy::Serialized,
            None if props.write_style_to_non_console => RenderPolicy::Styled,
            None => RenderPolicy::Plain,
        }
    }
}

/// Callback for destination failures: `(destination name, error)`.
///
/// Runs on the dispatching thread while destinations are locked; it must
/// not log through the same logger. A panic inside it is caught and
/// reported on stderr.
pub type ErrorCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

/// A destination and its optional explicit policy
pub struct Sink {
    appender: Box<dyn Appender>,
    policy: Option<RenderPolicy>,
}

impl Sink {
    pub fn new(appender: Box<dyn Appender>) -> Self {
        Self {
            appender,
            policy: None,
        }
    }

    pub fn with_policy(appender: Box<dyn Appender>, policy: RenderPolicy) -> Self {
        Self {
            appender,
            policy: Some(policy),
        }
    }

    pub fn name(&self) -> &str {
        self.appender.name()
    }

    pub fn policy(&self, props: &Properties) -> RenderPolicy {
        RenderPolicy::resolve(self.policy, self.appender.is_console(), props)
    }
}

struct Destinations {
    sinks: Vec<Sink>,
    syslog: Option<SyslogSink>,
}

/// Per-record output forms, each computed at most once
struct Forms<'a> {
    record: &'a LogRecord,
    format: &'a str,
    ctx: RenderContext<'a>,
    plain: Option<String>,
    styled: Option<String>,
    serialized: Option<String>,
}

impl<'a> Forms<'a> {
    fn new(record: &'a LogRecord, props: &'a Properties, clock: &'a dyn Clock) -> Self {
        Self {
            record,
            format: &props.format,
            ctx: RenderContext {
                default_prefix: &props.default_prefix,
                date_time_format: &props.date_time_format,
                clock,
            },
            plain: None,
            styled: None,
            serialized: None,
        }
    }

    fn plain(&mut self) -> Result<&str> {
        if self.plain.is_none() {
            self.plain = Some(template::render(self.format, self.record, &self.ctx)?);
        }
        Ok(self.plain.as_deref().unwrap_or_default())
    }

    fn styled(&mut self) -> Result<&str> {
        if self.styled.is_none() {
            let style = self.record.style;
            let painted = style.paint(self.plain()?);
            self.styled = Some(painted);
        }
        Ok(self.styled.as_deref().unwrap_or_default())
    }

    fn serialized(&mut self) -> &str {
        let record = self.record;
        self.serialized.get_or_insert_with(|| record.to_serialized())
    }

    fn line(&mut self, policy: RenderPolicy) -> Result<&str> {
        match policy {
            RenderPolicy::Styled => self.styled(),
            RenderPolicy::Plain => self.plain(),
            RenderPolicy::Serialized => Ok(self.serialized()),
        }
    }

    fn syslog(&self, painted: bool) -> Result<String> {
        let text = template::render(template::syslog_template(self.format), self.record, &self.ctx)?;
        Ok(if painted {
            self.record.style.paint(&text)
        } else {
            text
        })
    }
}

/// The destination set of one logger
pub struct FanOut {
    destinations: Mutex<Destinations>,
    clock: Arc<dyn Clock>,
    metrics: Arc<LoggerMetrics>,
    on_error: Option<ErrorCallback>,
    last_error: Mutex<Option<String>>,
}

impl FanOut {
    pub fn new(
        clock: Arc<dyn Clock>,
        metrics: Arc<LoggerMetrics>,
        on_error: Option<ErrorCallback>,
    ) -> Self {
        Self {
            destinations: Mutex::new(Destinations {
                sinks: Vec::new(),
                syslog: None,
            }),
            clock,
            metrics,
            on_error,
            last_error: Mutex::new(None),
        }
    }

    pub fn add_sink(&self, sink: Sink) {
        self.destinations.lock().sinks.push(sink);
    }

    pub fn set_syslog(&self, syslog: SyslogSink) {
        self.destinations.lock().syslog = Some(syslog);
    }

    /// Close the syslog session, if one is open
    pub fn close_syslog(&self) {
        if let Some(mut syslog) = self.destinations.lock().syslog.take() {
            syslog.close();
        }
    }

    pub fn has_syslog(&self) -> bool {
        self.destinations.lock().syslog.is_some()
    }

    /// Most recent destination failure, as `"<destination>: <error>"`
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Render and write `record` to every destination.
    ///
    /// Filtered levels do no work at all. An invalid template is reported
    /// before any destination is touched. The record counts as dispatched
    /// once at least one destination accepted it.
    pub fn dispatch(&self, record: &LogRecord, props: &Properties) {
        if !record.level.is_enabled(props.verbose) {
            self.metrics.record_filtered();
            return;
        }
        if let Err(e) = template::validate(&props.format) {
            self.report("template", &e);
            return;
        }

        let mut forms = Forms::new(record, props, self.clock.as_ref());
        let mut guard = self.destinations.lock();
        let destinations = &mut *guard;
        let mut delivered = false;

        for sink in destinations.sinks.iter_mut() {
            let policy = sink.policy(props);
            let result = match forms.line(policy) {
                Ok(line) => guarded(|| sink.appender.append(line)),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => delivered = true,
                Err(e) => self.report(sink.appender.name(), &e),
            }
        }

        if let Some(syslog) = destinations.syslog.as_mut() {
            let result = forms
                .syslog(props.write_style_to_non_console)
                .and_then(|text| guarded(|| syslog.write(record.level, &text)));
            match result {
                Ok(()) => delivered = true,
                Err(e) => self.report("syslog", &e),
            }
        }

        if delivered {
            self.metrics.record_dispatched();
        }
    }

    /// Flush every destination; returns the first failure after trying all
    pub fn flush_all(&self) -> Result<()> {
        let mut destinations = self.destinations.lock();
        let mut first_error = None;

        for sink in destinations.sinks.iter_mut() {
            if let Err(e) = guarded(|| sink.appender.flush()) {
                self.report(sink.appender.name(), &e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn report(&self, source: &str, error: &LoggerError) {
        self.metrics.record_write_failure();
        *self.last_error.lock() = Some(format!("{}: {}", source, error));

        match &self.on_error {
            Some(callback) => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(source, error)));
                if let Err(payload) = outcome {
                    eprintln!(
                        "[LOGGER ERROR] Error callback panicked while reporting '{}': {}",
                        source,
                        panic_message(payload.as_ref())
                    );
                }
            }
            None => eprintln!("[LOGGER ERROR] Destination '{}' failed: {}", source, error),
        }
    }
}

/// Run a destination call, turning a panic into an error
fn guarded<F>(call: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(LoggerError::writer(format!(
            "panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
