//! Logger configuration
//!
//! [`Properties`] is a plain value. The logger keeps it as an immutable
//! snapshot and swaps in a new one on every change, so a record is always
//! rendered against one consistent set of fields.

use super::error::Result;
use super::log_level::LogLevel;
use super::style::{Color, Emphasis, Style};
use super::template::DEFAULT_TEMPLATE;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// One default style per level, used when a call does not pass a style.
///
/// Indexed by [`LogLevel::index`]; serialized as an array in level order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultStyles([Style; LogLevel::COUNT]);

impl Default for DefaultStyles {
    fn default() -> Self {
        let italic = Style::emphasis(Emphasis::ITALIC);
        Self([
            Style::bg(Color::DARK_GREEN) | Style::fg(Color::WHITE),
            Style::bg(Color::ORANGE) | Style::fg(Color::BLACK),
            italic | Style::bg(Color::RED) | Style::fg(Color::WHITE),
            italic | Style::bg(Color::DARK_RED) | Style::fg(Color::WHITE),
            italic | Style::bg(Color::GREEN) | Style::fg(Color::WHITE),
            italic | Style::bg(Color::GRAY) | Style::fg(Color::WHITE),
        ])
    }
}

impl DefaultStyles {
    /// All styles empty, for output without any coloring
    pub fn unstyled() -> Self {
        Self([Style::default(); LogLevel::COUNT])
    }

    #[inline]
    pub fn get(&self, level: LogLevel) -> Style {
        self.0[level.index()]
    }

    pub fn set(&mut self, level: LogLevel, style: Style) {
        self.0[level.index()] = style;
    }
}

/// Logger properties
///
/// # Example
///
/// ```
/// use logex::Properties;
///
/// let props = Properties::from_json(r#"{"default_prefix": "worker", "verbose": true}"#).unwrap();
/// assert_eq!(props.default_prefix, "worker");
/// assert!(props.verbose);
/// assert_eq!(props.format, "[{datetime}] [{level}] ({prefix}): {msg}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    /// Logger name; also the syslog ident and the worker thread suffix
    pub name: String,
    /// Prefix substituted for `{prefix}` when a record carries none
    pub default_prefix: String,
    pub date_time_format: TimestampFormat,
    /// Line template, must contain `{msg}`
    pub format: String,
    pub default_styles: DefaultStyles,
    /// Non-console destinations receive serialized records
    pub serialize_to_non_console: bool,
    /// Non-console destinations (and syslog) receive styled text
    pub write_style_to_non_console: bool,
    /// Dispatch Verbose records
    pub verbose: bool,
    /// Forward records to the platform syslog; read once at construction
    pub syslog: bool,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            name: "Logex".to_string(),
            default_prefix: "App".to_string(),
            date_time_format: TimestampFormat::default(),
            format: DEFAULT_TEMPLATE.to_string(),
            default_styles: DefaultStyles::default(),
            serialize_to_non_console: false,
            write_style_to_non_console: false,
            verbose: false,
            syslog: false,
        }
    }
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn default_style(&self, level: LogLevel) -> Style {
        self.default_styles.get(level)
    }
}
