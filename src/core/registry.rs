//! Named loggers shared across an application
//!
//! The registry is an ordinary value: create one at startup and pass it
//! (or an `Arc` of it) to the code that needs named loggers.

use super::error::Result;
use super::logger::Logger;
use super::properties::Properties;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the logger every registry starts with
pub const GLOBAL_LOGGER: &str = "global";

/// Name-to-logger map with lazy creation
///
/// # Example
///
/// ```
/// use logex::LoggerRegistry;
///
/// let registry = LoggerRegistry::new().unwrap();
/// let net = registry.get_or_create("net").unwrap();
///
/// assert_eq!(net.properties().default_prefix, "net");
/// assert_eq!(registry.global().properties().default_prefix, "Global");
/// assert_eq!(registry.names(), vec!["global".to_string(), "net".to_string()]);
/// ```
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    global: Arc<Logger>,
}

impl LoggerRegistry {
    /// Create a registry holding the `"global"` logger
    pub fn new() -> Result<Self> {
        let global = Arc::new(Self::default_logger(GLOBAL_LOGGER, "Global")?);
        let mut loggers = HashMap::new();
        loggers.insert(GLOBAL_LOGGER.to_string(), Arc::clone(&global));

        Ok(Self {
            loggers: RwLock::new(loggers),
            global,
        })
    }

    /// Queued console logger whose default prefix is `prefix`
    fn default_logger(name: &str, prefix: &str) -> Result<Logger> {
        let builder = Logger::builder().properties(
            Properties::default()
                .with_name(name)
                .with_default_prefix(prefix),
        );
        #[cfg(feature = "console")]
        let builder = builder.appender(crate::appenders::ConsoleAppender::new());
        builder.build()
    }

    pub fn global(&self) -> Arc<Logger> {
        Arc::clone(&self.global)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    /// Look `name` up, creating a default logger for it on first use
    pub fn get_or_create(&self, name: &str) -> Result<Arc<Logger>> {
        if let Some(logger) = self.get(name) {
            return Ok(logger);
        }

        let mut loggers = self.loggers.write();
        // Another thread may have won the race for the write lock
        if let Some(logger) = loggers.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(Self::default_logger(name, name)?);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// Register a custom logger, returning the one it replaced.
    ///
    /// Replacing `"global"` here does not change [`LoggerRegistry::global`].
    pub fn insert(&self, name: impl Into<String>, logger: Logger) -> Option<Arc<Logger>> {
        self.loggers.write().insert(name.into(), Arc::new(logger))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.write().remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }
}
