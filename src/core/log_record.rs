//! Log record structure

use super::codec;
use super::error::Result;
use super::log_level::LogLevel;
use super::style::Style;
use serde::{Deserialize, Serialize};

/// One logged event.
///
/// Records carry no timestamp; `{datetime}` is produced when the record is
/// rendered. An unset prefix is resolved to the logger's default prefix at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default)]
    pub style: Style,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            prefix: None,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Prefix to render, falling back to `default_prefix` when unset
    pub fn prefix_or<'a>(&'a self, default_prefix: &'a str) -> &'a str {
        self.prefix.as_deref().unwrap_or(default_prefix)
    }

    /// Encode as a single serialized line
    pub fn to_serialized(&self) -> String {
        codec::serialize_record(self)
    }

    /// Decode a line produced by [`LogRecord::to_serialized`]
    pub fn from_serialized(text: &str) -> Result<Self> {
        codec::deserialize_record(text)
    }

    /// Whether this record survives a serialize/deserialize round trip.
    ///
    /// The text format does not escape its delimiters, so a message or
    /// prefix containing `'` or `;` may be cut short when decoded.
    pub fn is_serialization_safe(&self) -> bool {
        let safe = |text: &str| !text.contains(['\'', ';']);
        safe(&self.message) && self.prefix.as_deref().map_or(true, safe)
    }
}
