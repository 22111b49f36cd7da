//! Platform syslog destination
//!
//! The facility is opened once when the logger is built and closed when
//! the logger is dropped. Lines are prefixed/rendered by the fan-out; the
//! backend only forwards text with a severity.

use crate::core::{LogLevel, LoggerError, Result, SyslogSeverity};

/// Open/write/close access to a syslog facility
pub trait SyslogBackend: Send {
    /// Start a session; `ident` is the program name shown by syslogd
    fn open(&mut self, ident: &str) -> Result<()>;
    fn write(&mut self, severity: SyslogSeverity, message: &str) -> Result<()>;
    fn close(&mut self);
}

/// An open syslog session tied to one logger
pub struct SyslogSink {
    backend: Box<dyn SyslogBackend>,
    open: bool,
}

impl SyslogSink {
    pub fn open(mut backend: Box<dyn SyslogBackend>, ident: &str) -> Result<Self> {
        backend.open(ident)?;
        Ok(Self {
            backend,
            open: true,
        })
    }

    /// Forward `text` with the severity mapped from `level`
    pub fn write(&mut self, level: LogLevel, text: &str) -> Result<()> {
        if !self.open {
            return Err(LoggerError::writer("syslog session already closed"));
        }
        self.backend.write(level.syslog_severity(), text)
    }

    pub fn close(&mut self) {
        if self.open {
            self.backend.close();
            self.open = false;
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        self.close();
    }
}

/// The platform backend, if this build has one
pub fn platform_backend() -> Option<Box<dyn SyslogBackend>> {
    #[cfg(all(unix, feature = "syslog"))]
    {
        Some(Box::new(posix::PosixSyslog::new()))
    }
    #[cfg(not(all(unix, feature = "syslog")))]
    {
        None
    }
}

#[cfg(all(unix, feature = "syslog"))]
pub use posix::PosixSyslog;

#[cfg(all(unix, feature = "syslog"))]
mod posix {
    use super::SyslogBackend;
    use crate::core::{LoggerError, Result, SyslogSeverity};
    use std::ffi::CString;
    use std::os::raw::c_char;

    /// POSIX `openlog`/`syslog`/`closelog` with the user facility
    #[derive(Debug, Default)]
    pub struct PosixSyslog {
        // openlog keeps the pointer, so the ident must outlive the session
        ident: Option<CString>,
    }

    impl PosixSyslog {
        pub fn new() -> Self {
            Self::default()
        }
    }

    fn c_string(text: &str) -> Result<CString> {
        CString::new(text.replace('\0', ""))
            .map_err(|e| LoggerError::writer(format!("invalid syslog text: {}", e)))
    }

    impl SyslogBackend for PosixSyslog {
        fn open(&mut self, ident: &str) -> Result<()> {
            let ident = c_string(ident)?;
            // SAFETY: `ident` is NUL-terminated and stored in `self` until closelog.
            unsafe {
                libc::openlog(ident.as_ptr(), libc::LOG_PID | libc::LOG_CONS, libc::LOG_USER);
            }
            self.ident = Some(ident);
            Ok(())
        }

        fn write(&mut self, severity: SyslogSeverity, message: &str) -> Result<()> {
            let message = c_string(message)?;
            // SAFETY: constant "%s" format with one NUL-terminated argument.
            unsafe {
                libc::syslog(
                    severity.code(),
                    b"%s\0".as_ptr() as *const c_char,
                    message.as_ptr(),
                );
            }
            Ok(())
        }

        fn close(&mut self) {
            if self.ident.take().is_some() {
                // SAFETY: closes the session opened above; no pointers outlive it.
                unsafe { libc::closelog() };
            }
        }
    }
}
