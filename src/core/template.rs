//! Line template rendering
//!
//! Templates are plain strings with four recognized placeholders:
//! `{datetime}`, `{level}`, `{prefix}` and `{msg}`. Anything else,
//! including unknown `{names}`, is copied through literally.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::{Clock, TimestampFormat};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "[{datetime}] [{level}] ({prefix}): {msg}";

/// Known substitution tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    DateTime,
    Level,
    Prefix,
    Msg,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::DateTime,
        Placeholder::Level,
        Placeholder::Prefix,
        Placeholder::Msg,
    ];

    /// Literal token, braces included
    pub const fn token(self) -> &'static str {
        match self {
            Placeholder::DateTime => "{datetime}",
            Placeholder::Level => "{level}",
            Placeholder::Prefix => "{prefix}",
            Placeholder::Msg => "{msg}",
        }
    }

    /// Whether the token appears anywhere in `template`
    #[inline]
    pub fn is_used_in(self, template: &str) -> bool {
        template.contains(self.token())
    }

    fn at_start_of(text: &str) -> Option<Placeholder> {
        Self::ALL.into_iter().find(|ph| text.starts_with(ph.token()))
    }
}

/// Logger-side inputs to rendering
pub struct RenderContext<'a> {
    /// Substituted for `{prefix}` when the record has none
    pub default_prefix: &'a str,
    pub date_time_format: &'a TimestampFormat,
    /// Only read when `{datetime}` is used
    pub clock: &'a dyn Clock,
}

/// Fail with a configuration error unless `template` contains `{msg}`
pub fn validate(template: &str) -> Result<()> {
    if Placeholder::Msg.is_used_in(template) {
        Ok(())
    } else {
        Err(LoggerError::config(
            "template",
            format!("'{}' has no {{msg}} placeholder; a message is always required", template),
        ))
    }
}

/// Expand `template` for `record`.
///
/// Each field is only computed when its placeholder occurs in the
/// template. Substitution is a single left-to-right pass, so placeholder
/// text inside the message or prefix is emitted verbatim.
pub fn render(template: &str, record: &LogRecord, ctx: &RenderContext<'_>) -> Result<String> {
    validate(template)?;

    let datetime = Placeholder::DateTime
        .is_used_in(template)
        .then(|| ctx.date_time_format.format(&ctx.clock.now()));
    let prefix = Placeholder::Prefix
        .is_used_in(template)
        .then(|| record.prefix_or(ctx.default_prefix));

    let mut out = String::with_capacity(template.len() + record.message.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];

        match Placeholder::at_start_of(rest) {
            Some(placeholder) => {
                match placeholder {
                    Placeholder::DateTime => out.push_str(datetime.as_deref().unwrap_or_default()),
                    Placeholder::Level => out.push_str(record.level.to_str()),
                    Placeholder::Prefix => out.push_str(prefix.unwrap_or_default()),
                    Placeholder::Msg => out.push_str(&record.message),
                }
                rest = &rest[placeholder.token().len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}

/// Reduced template for syslog: the facility stamps its own time and
/// severity, so only the prefix (when the logger template uses it) and
/// the message remain.
pub fn syslog_template(template: &str) -> &'static str {
    if Placeholder::Prefix.is_used_in(template) {
        "[{prefix}] {msg}"
    } else {
        "{msg}"
    }
}
