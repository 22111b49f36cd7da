//! Integration tests for logex
//!
//! These tests verify:
//! - Rendering policies per destination
//! - Queued dispatch ordering and drain on shutdown
//! - Level filtering
//! - Syslog forwarding
//! - Failure isolation
//! - Named-logger registry

use chrono::{DateTime, FixedOffset, TimeZone};
use logex::appenders::{ChannelAppender, FileAppender, SharedBuffer, SyslogBackend, WriterAppender};
use logex::core::codec;
use logex::prelude::*;
use logex::{Clock, SyslogSeverity};
use parking_lot::Mutex;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 10, 17, 9, 30, 0)
            .unwrap()
    }
}

fn memory_logger(props: Properties, mode: DispatchMode) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .properties(props)
        .appender(WriterAppender::new("memory", buffer.clone()))
        .clock(Arc::new(FixedClock))
        .mode(mode)
        .build()
        .expect("Failed to build logger");
    (logger, buffer)
}

#[test]
fn test_file_receives_plain_default_template() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("plain.log");

    let logger = Logger::builder()
        .appender(FileAppender::new(&log_file).expect("Failed to create appender"))
        .clock(Arc::new(FixedClock))
        .build()
        .unwrap();

    logger.error("An error occurred").unwrap();
    logger.log_prefixed(LogLevel::Info, "db", "pool ready").unwrap();
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(
        content,
        "[2024-10-17 09:30:00] [Error] (App): An error occurred\n\
         [2024-10-17 09:30:00] [Info] (db): pool ready\n"
    );
}

#[test]
fn test_serialized_file_round_trips() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("records.log");

    let mut props = Properties::default();
    props.serialize_to_non_console = true;
    let logger = Logger::builder()
        .properties(props)
        .appender(FileAppender::new(&log_file).unwrap())
        .build()
        .unwrap();

    let custom = Style::fg(Color::AQUA) | Style::emphasis(Emphasis::BOLD | Emphasis::UNDERLINE);
    logger.log_styled(LogLevel::Warn, "queue backlog", custom).unwrap();
    logger.log_prefixed(LogLevel::Fatal, "core", "halting").unwrap();
    logger.flush().unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    let records: Vec<LogRecord> = content
        .lines()
        .map(|line| codec::deserialize_record(line).expect("line decodes"))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], LogRecord::new(LogLevel::Warn, "queue backlog").with_style(custom));
    assert_eq!(records[1].prefix.as_deref(), Some("core"));
    assert_eq!(records[1].style, Properties::default().default_style(LogLevel::Fatal));
}

#[test]
fn test_write_style_to_non_console_paints_lines() {
    let mut props = Properties::default().with_format("{msg}");
    props.write_style_to_non_console = true;
    let (logger, buffer) = memory_logger(props, DispatchMode::Inline);

    logger.info("painted").unwrap();
    let line = buffer.contents();
    assert!(line.starts_with("\x1b["));
    assert!(line.contains("painted"));
}

#[test]
fn test_styled_writer_paints_without_terminal() {
    // Same state as a daemon whose stdout is redirected
    colored::control::set_override(false);
    let mut props = Properties::default().with_format("{msg}");
    props.write_style_to_non_console = true;
    let (logger, buffer) = memory_logger(props, DispatchMode::Queued);

    logger.log_styled(LogLevel::Error, "painted?", Style::fg(Color::RED)).unwrap();
    logger.flush().unwrap();
    colored::control::unset_override();

    assert_eq!(buffer.contents(), "\x1b[38;2;255;0;0mpainted?\x1b[0m\n");
}

#[test]
fn test_explicit_policies_override_properties() {
    let plain = SharedBuffer::new();
    let serialized = SharedBuffer::new();
    let mut props = Properties::default().with_format("{level}: {msg}");
    props.serialize_to_non_console = true;

    let logger = Logger::builder()
        .properties(props)
        .appender_with_policy(WriterAppender::new("plain", plain.clone()), RenderPolicy::Plain)
        .appender(WriterAppender::new("default", serialized.clone()))
        .mode(DispatchMode::Inline)
        .build()
        .unwrap();

    logger.info("hello").unwrap();
    assert_eq!(plain.lines(), vec!["Info: hello".to_string()]);
    assert!(serialized.contents().starts_with("{message='hello';prefix=null;level=Info;"));
}

#[test]
fn test_fifo_to_every_destination() {
    let first = SharedBuffer::new();
    let (tx, rx) = crossbeam_channel::unbounded();
    let logger = Logger::builder()
        .properties(Properties::default().with_format("{msg}"))
        .appender(WriterAppender::new("first", first.clone()))
        .appender(ChannelAppender::new("second", tx))
        .build()
        .unwrap();

    for msg in ["r1", "r2", "r3"] {
        logger.info(msg).unwrap();
    }
    logger.flush().unwrap();

    assert_eq!(first.lines(), vec!["r1", "r2", "r3"]);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["r1", "r2", "r3"]);
}

#[test]
fn test_verbose_filtering() {
    let (logger, buffer) = memory_logger(Properties::default().with_format("{msg}"), DispatchMode::Queued);

    logger.verbose("off").unwrap();
    logger.flush().unwrap();
    assert!(buffer.is_empty());
    assert_eq!(logger.metrics().filtered(), 1);

    logger.set_verbose(true);
    logger.verbose("on").unwrap();
    logger.flush().unwrap();
    assert_eq!(buffer.lines(), vec!["on".to_string()]);
}

#[cfg(not(feature = "debug-level"))]
#[test]
fn test_debug_never_written_without_feature() {
    let mut props = Properties::default().with_format("{msg}");
    props.verbose = true;
    let (logger, buffer) = memory_logger(props, DispatchMode::Queued);

    logger.debug("internals").unwrap();
    logger.flush().unwrap();
    assert!(buffer.is_empty());
}

#[test]
fn test_drain_on_shutdown() {
    let (logger, buffer) = memory_logger(Properties::default().with_format("{msg}"), DispatchMode::Queued);
    for i in 0..500 {
        logger.info(format!("record {}", i)).unwrap();
    }

    assert!(logger.shutdown(Duration::from_secs(5)));
    let lines = buffer.lines();
    assert_eq!(lines.len(), 500);
    assert_eq!(lines[499], "record 499");
    assert!(logger.info("after").is_err());
}

#[test]
fn test_invalid_template_rejected_before_any_write() {
    let (logger, buffer) = memory_logger(Properties::default(), DispatchMode::Queued);

    let err = logger.set_format("[{datetime}] {level}").unwrap_err();
    assert!(matches!(err, LoggerError::Configuration { .. }));
    assert!(logger
        .set_properties(Properties::default().with_format("nothing"))
        .is_err());

    logger.flush().unwrap();
    assert!(buffer.is_empty());
    assert_eq!(logger.properties().format, "[{datetime}] [{level}] ({prefix}): {msg}");
}

#[test]
fn test_date_time_format_change() {
    let (logger, buffer) = memory_logger(
        Properties::default().with_format("{datetime} {msg}"),
        DispatchMode::Inline,
    );

    logger.set_date_time_format("%d/%m/%Y");
    logger.info("a").unwrap();
    logger.set_date_time_format(TimestampFormat::Rfc3339);
    logger.info("b").unwrap();

    assert_eq!(
        buffer.lines(),
        vec!["17/10/2024 a".to_string(), "2024-10-17T09:30:00+02:00 b".to_string()]
    );
}

#[derive(Default)]
struct SyslogJournal {
    ident: Option<String>,
    lines: Vec<(SyslogSeverity, String)>,
    closed: bool,
}

struct JournalBackend(Arc<Mutex<SyslogJournal>>);

impl SyslogBackend for JournalBackend {
    fn open(&mut self, ident: &str) -> Result<()> {
        self.0.lock().ident = Some(ident.to_string());
        Ok(())
    }

    fn write(&mut self, severity: SyslogSeverity, message: &str) -> Result<()> {
        self.0.lock().lines.push((severity, message.to_string()));
        Ok(())
    }

    fn close(&mut self) {
        self.0.lock().closed = true;
    }
}

#[test]
fn test_syslog_forwarding() {
    let journal = Arc::new(Mutex::new(SyslogJournal::default()));
    let mut props = Properties::default().with_name("billing");
    props.syslog = true;

    let logger = Logger::builder()
        .properties(props)
        .syslog_backend(Box::new(JournalBackend(Arc::clone(&journal))))
        .build()
        .unwrap();

    logger.fatal("ledger corrupt").unwrap();
    logger.info("recovered").unwrap();
    logger.flush().unwrap();
    drop(logger);

    let journal = journal.lock();
    assert_eq!(journal.ident.as_deref(), Some("billing"));
    assert_eq!(
        journal.lines,
        vec![
            (SyslogSeverity::Alert, "[App] ledger corrupt".to_string()),
            (SyslogSeverity::Info, "[App] recovered".to_string()),
        ]
    );
    assert!(journal.closed);
}

struct FailingAppender;

impl Appender for FailingAppender {
    fn append(&mut self, _line: &str) -> Result<()> {
        Err(LoggerError::writer("remote end closed"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[test]
fn test_failing_destination_is_isolated() {
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);
    let buffer = SharedBuffer::new();

    let logger = Logger::builder()
        .properties(Properties::default().with_format("{msg}"))
        .appender(FailingAppender)
        .appender(WriterAppender::new("memory", buffer.clone()))
        .on_error(Arc::new(move |name: &str, _err: &LoggerError| {
            assert_eq!(name, "failing");
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .build()
        .unwrap();

    logger.info("one").unwrap();
    logger.info("two").unwrap();
    logger.flush().unwrap();

    assert_eq!(buffer.lines(), vec!["one".to_string(), "two".to_string()]);
    assert_eq!(failures.load(Ordering::SeqCst), 2);
    assert_eq!(logger.metrics().write_failures(), 2);
    assert_eq!(
        logger.last_error().as_deref(),
        Some("failing: Writer error: remote end closed")
    );
}

#[test]
fn test_panicking_error_callback_keeps_worker_alive() {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .properties(Properties::default().with_format("{msg}"))
        .appender(FailingAppender)
        .appender(WriterAppender::new("memory", buffer.clone()))
        .on_error(Arc::new(|_: &str, _: &LoggerError| panic!("callback bug")))
        .build()
        .unwrap();

    logger.info("a").unwrap();
    logger.info("b").unwrap();
    logger.flush().unwrap();

    assert_eq!(buffer.lines(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(logger.pending(), 0);
    assert_eq!(logger.metrics().write_failures(), 2);
    assert!(logger.shutdown(Duration::from_secs(5)));
}

#[test]
fn test_registry_named_loggers() {
    let registry = LoggerRegistry::new().unwrap();
    let worker = registry.get_or_create("worker").unwrap();
    assert_eq!(worker.properties().default_prefix, "worker");
    assert!(Arc::ptr_eq(&worker, &registry.get("worker").unwrap()));

    let buffer = SharedBuffer::new();
    let audit = Logger::builder()
        .properties(Properties::default().with_format("{prefix}:{msg}").with_default_prefix("audit"))
        .appender(WriterAppender::new("memory", buffer.clone()))
        .build()
        .unwrap();
    registry.insert("audit", audit);

    let audit = registry.get("audit").unwrap();
    audit.info("granted").unwrap();
    audit.flush().unwrap();
    assert_eq!(buffer.lines(), vec!["audit:granted".to_string()]);
    assert_eq!(registry.names(), vec!["audit", "global", "worker"]);
}

#[test]
fn test_properties_from_json() {
    let props = Properties::from_json(
        r#"{"name": "ingest", "default_prefix": "ing", "format": "{prefix}>{msg}", "verbose": true}"#,
    )
    .unwrap();
    let (logger, buffer) = memory_logger(props, DispatchMode::Inline);

    logger.verbose("chunk 7").unwrap();
    assert_eq!(logger.name(), "ingest");
    assert_eq!(buffer.lines(), vec!["ing>chunk 7".to_string()]);
}
