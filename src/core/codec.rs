//! Text codec for styles and log records
//!
//! A serialized record is a single line:
//!
//! ```text
//! {message='Disk full';prefix='App';level=Error;defaultStyle={foreground_color={value=16777215};background_color={null};emphasis=4}}
//! ```
//!
//! Fields appear in fixed order. An empty message and an unset prefix are
//! written as the unquoted literal `null`; present values are wrapped in
//! single quotes without escaping. A message or prefix containing `';`
//! therefore cannot be decoded faithfully; see
//! [`LogRecord::is_serialization_safe`].

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::style::{Color, Emphasis, Style};

const NULL: &str = "null";
const NULL_COLOR: &str = "{null}";

/// Encode a style as `{foreground_color=..;background_color=..;emphasis=N}`
pub fn serialize_style(style: &Style) -> String {
    format!(
        "{{foreground_color={};background_color={};emphasis={}}}",
        serialize_color(style.foreground()),
        serialize_color(style.background()),
        style.emphasis_bits().bits()
    )
}

fn serialize_color(color: Option<Color>) -> String {
    match color {
        Some(color) => format!("{{value={}}}", color.value()),
        None => NULL_COLOR.to_string(),
    }
}

/// Decode a style fragment produced by [`serialize_style`]
pub fn deserialize_style(text: &str) -> Result<Style> {
    let rest = after_key(text, "foreground_color=", "foreground_color")?;
    let fragment = balanced_fragment(rest, "foreground_color")?;
    let foreground = deserialize_color(fragment, "foreground_color")?;

    let rest = after_key(&rest[fragment.len()..], "background_color=", "background_color")?;
    let fragment = balanced_fragment(rest, "background_color")?;
    let background = deserialize_color(fragment, "background_color")?;

    let rest = after_key(&rest[fragment.len()..], "emphasis=", "emphasis")?;
    let digits = rest
        .find(['}', ';'])
        .map(|end| &rest[..end])
        .ok_or_else(|| LoggerError::decode("emphasis", "missing closing '}'"))?;
    let bits = digits.trim().parse::<u8>().map_err(|e| {
        LoggerError::decode("emphasis", format!("invalid value '{}': {}", digits, e))
    })?;

    Ok(Style::new(foreground, background, Emphasis::from_bits(bits)))
}

fn deserialize_color(fragment: &str, field: &str) -> Result<Option<Color>> {
    if fragment == NULL_COLOR {
        return Ok(None);
    }

    let rest = after_key(fragment, "value=", field)?;
    let digits = rest
        .find(['}', ';'])
        .map(|end| &rest[..end])
        .ok_or_else(|| LoggerError::decode(field, "missing closing '}'"))?;
    let value = digits.trim().parse::<u32>().map_err(|e| {
        LoggerError::decode(field, format!("invalid color value '{}': {}", digits, e))
    })?;

    Ok(Some(Color::from_value(value)))
}

/// Encode a record as one line (without the trailing newline)
pub fn serialize_record(record: &LogRecord) -> String {
    let message = if record.message.is_empty() {
        NULL.to_string()
    } else {
        format!("'{}'", record.message)
    };
    let prefix = match &record.prefix {
        Some(prefix) => format!("'{}'", prefix),
        None => NULL.to_string(),
    };

    format!(
        "{{message={};prefix={};level={};defaultStyle={}}}",
        message,
        prefix,
        record.level.to_str(),
        serialize_style(&record.style)
    )
}

/// Decode a line produced by [`serialize_record`]
///
/// Missing keys, an unknown level name, unbalanced braces or a quoted
/// value without its closing `';` all fail with [`LoggerError::Decode`].
pub fn deserialize_record(text: &str) -> Result<LogRecord> {
    let text = text.trim_end_matches(['\r', '\n']);

    let rest = after_key(text, "message=", "message")?;
    let (message, rest) = text_field(rest, "message")?;

    let rest = after_key(rest, "prefix=", "prefix")?;
    let (prefix, rest) = text_field(rest, "prefix")?;

    let rest = after_key(rest, "level=", "level")?;
    let end = rest
        .find(';')
        .ok_or_else(|| LoggerError::decode("level", "missing ';' after level"))?;
    let name = &rest[..end];
    let level = name
        .parse::<LogLevel>()
        .map_err(|e| LoggerError::decode("level", e))?;

    let rest = after_key(&rest[end..], "defaultStyle=", "defaultStyle")?;
    let fragment = balanced_fragment(rest, "defaultStyle")?;
    let style = deserialize_style(fragment)?;

    if !rest[fragment.len()..].starts_with('}') {
        return Err(LoggerError::decode("record", "missing closing '}'"));
    }

    Ok(LogRecord {
        level,
        message: message.unwrap_or_default().to_string(),
        prefix: prefix.map(str::to_string),
        style,
    })
}

/// Slice of `text` that follows the first occurrence of `key`
fn after_key<'a>(text: &'a str, key: &str, field: &str) -> Result<&'a str> {
    text.find(key)
        .map(|start| &text[start + key.len()..])
        .ok_or_else(|| LoggerError::decode(field, format!("missing key '{}'", key)))
}

/// Parse `null;` or `'<value>';`, returning the value and the text after `;`
fn text_field<'a>(text: &'a str, field: &str) -> Result<(Option<&'a str>, &'a str)> {
    if let Some(rest) = text.strip_prefix("null;") {
        return Ok((None, rest));
    }

    let quoted = text
        .strip_prefix('\'')
        .ok_or_else(|| LoggerError::decode(field, "expected quoted value or null"))?;
    let end = quoted
        .find("';")
        .ok_or_else(|| LoggerError::decode(field, "missing closing quote"))?;

    Ok((Some(&quoted[..end]), &quoted[end + 2..]))
}

/// Leading `{...}` fragment of `text`, found by brace-depth counting
fn balanced_fragment<'a>(text: &'a str, field: &str) -> Result<&'a str> {
    if !text.starts_with('{') {
        return Err(LoggerError::decode(field, "expected '{'"));
    }

    let mut depth = 0usize;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    Err(LoggerError::decode(field, "unbalanced braces"))
}
