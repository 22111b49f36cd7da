//! Text style: optional foreground/background colors plus emphasis bits
//!
//! A [`Style`] is an immutable value applied to a whole rendered line by
//! the styled destinations. Its text encoding lives in [`crate::core::codec`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::BitOr;

/// 24-bit RGB color stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xFF_FF_FF);
    pub const BLACK: Color = Color(0x00_00_00);
    pub const RED: Color = Color(0xFF_00_00);
    pub const DARK_RED: Color = Color(0x8B_00_00);
    pub const GREEN: Color = Color(0x00_80_00);
    pub const DARK_GREEN: Color = Color(0x00_64_00);
    pub const ORANGE: Color = Color(0xFF_A5_00);
    pub const YELLOW: Color = Color(0xFF_FF_00);
    pub const GRAY: Color = Color(0x80_80_80);
    pub const AQUA: Color = Color(0x00_FF_FF);
    pub const DARK_BLUE: Color = Color(0x00_00_8B);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build a color from its packed integer form; bits above 24 are discarded.
    #[must_use]
    pub const fn from_value(value: u32) -> Self {
        Color(value & 0x00FF_FFFF)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn components(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    fn to_terminal(self) -> colored::Color {
        let (r, g, b) = self.components();
        colored::Color::TrueColor { r, g, b }
    }
}

/// Emphasis bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Emphasis(u8);

impl Emphasis {
    pub const NONE: Emphasis = Emphasis(0);
    pub const BOLD: Emphasis = Emphasis(1);
    pub const FAINT: Emphasis = Emphasis(1 << 1);
    pub const ITALIC: Emphasis = Emphasis(1 << 2);
    pub const UNDERLINE: Emphasis = Emphasis(1 << 3);
    pub const BLINK: Emphasis = Emphasis(1 << 4);
    pub const REVERSE: Emphasis = Emphasis(1 << 5);
    pub const CONCEAL: Emphasis = Emphasis(1 << 6);
    pub const STRIKETHROUGH: Emphasis = Emphasis(1 << 7);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Emphasis(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Emphasis) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Emphasis {
    type Output = Emphasis;

    fn bitor(self, rhs: Emphasis) -> Emphasis {
        Emphasis(self.0 | rhs.0)
    }
}

/// Foreground, background and emphasis, each independently optional
///
/// # Example
///
/// ```
/// use logex::{Color, Emphasis, Style};
///
/// let style = Style::fg(Color::WHITE) | Style::bg(Color::RED) | Style::emphasis(Emphasis::ITALIC);
/// assert_eq!(style.foreground(), Some(Color::WHITE));
/// assert!(style.emphasis_bits().contains(Emphasis::ITALIC));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    foreground: Option<Color>,
    #[serde(default)]
    background: Option<Color>,
    #[serde(default)]
    emphasis: Emphasis,
}

impl Style {
    #[must_use]
    pub const fn new(
        foreground: Option<Color>,
        background: Option<Color>,
        emphasis: Emphasis,
    ) -> Self {
        Self {
            foreground,
            background,
            emphasis,
        }
    }

    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self::new(Some(color), None, Emphasis::NONE)
    }

    #[must_use]
    pub const fn bg(color: Color) -> Self {
        Self::new(None, Some(color), Emphasis::NONE)
    }

    #[must_use]
    pub const fn emphasis(emphasis: Emphasis) -> Self {
        Self::new(None, None, emphasis)
    }

    pub const fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    pub const fn emphasis_bits(&self) -> Emphasis {
        self.emphasis
    }

    /// True when the style carries no colors and no emphasis
    pub const fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.emphasis.is_empty()
    }

    /// Wrap `text` in ANSI escapes for this style.
    ///
    /// The text itself is never altered; an empty style returns it unchanged.
    /// Escapes are always emitted, whatever the process's terminal state.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }

        let mut codes: Vec<Cow<'static, str>> = EMPHASIS_CODES
            .iter()
            .filter(|(bit, _)| self.emphasis.contains(*bit))
            .map(|(_, code)| Cow::Borrowed(*code))
            .collect();
        if let Some(color) = self.foreground {
            codes.push(color.to_terminal().to_fg_str());
        }
        if let Some(color) = self.background {
            codes.push(color.to_terminal().to_bg_str());
        }

        format!("\x1b[{}m{}\x1b[0m", codes.join(";"), text)
    }
}

/// SGR parameter for each emphasis bit
const EMPHASIS_CODES: [(Emphasis, &str); 8] = [
    (Emphasis::BOLD, "1"),
    (Emphasis::FAINT, "2"),
    (Emphasis::ITALIC, "3"),
    (Emphasis::UNDERLINE, "4"),
    (Emphasis::BLINK, "5"),
    (Emphasis::REVERSE, "7"),
    (Emphasis::CONCEAL, "8"),
    (Emphasis::STRIKETHROUGH, "9"),
];

/// Combine two styles; colors from the right side win, emphasis bits are merged.
impl BitOr for Style {
    type Output = Style;

    fn bitor(self, rhs: Style) -> Style {
        Style {
            foreground: rhs.foreground.or(self.foreground),
            background: rhs.background.or(self.background),
            emphasis: self.emphasis | rhs.emphasis,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::core::codec::serialize_style(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let color = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(color.value(), 0x123456);
        assert_eq!(color.components(), (0x12, 0x34, 0x56));
        assert_eq!(Color::from_value(0xFF12_3456), color);
    }

    #[test]
    fn test_style_combination() {
        let style = Style::fg(Color::BLACK)
            | Style::emphasis(Emphasis::BOLD)
            | Style::bg(Color::AQUA)
            | Style::emphasis(Emphasis::UNDERLINE);

        assert_eq!(style.foreground(), Some(Color::BLACK));
        assert_eq!(style.background(), Some(Color::AQUA));
        assert_eq!(style.emphasis_bits().bits(), 1 | 8);

        let overridden = style | Style::fg(Color::RED);
        assert_eq!(overridden.foreground(), Some(Color::RED));
        assert_eq!(overridden.background(), Some(Color::AQUA));
    }

    #[test]
    fn test_empty_style_leaves_text_alone() {
        assert!(Style::default().is_empty());
        assert_eq!(Style::default().paint("plain text"), "plain text");
    }

    #[test]
    fn test_paint_wraps_text_verbatim() {
        let style = Style::fg(Color::WHITE) | Style::bg(Color::RED) | Style::emphasis(Emphasis::ITALIC);
        let painted = style.paint("disk {full}");

        assert!(painted.contains("disk {full}"));
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("38;2;255;255;255"));
        assert!(painted.contains("48;2;255;0;0"));
        assert!(painted.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_paint_exact_sequence() {
        assert_eq!(Style::fg(Color::RED).paint("x"), "\x1b[38;2;255;0;0mx\x1b[0m");
        assert_eq!(
            (Style::bg(Color::BLACK) | Style::emphasis(Emphasis::BOLD | Emphasis::STRIKETHROUGH))
                .paint("y"),
            "\x1b[1;9;48;2;0;0;0my\x1b[0m"
        );
    }

    #[test]
    fn test_paint_ignores_colorize_control() {
        colored::control::set_override(false);
        let painted = Style::emphasis(Emphasis::UNDERLINE).paint("z");
        colored::control::unset_override();
        assert_eq!(painted, "\x1b[4mz\x1b[0m");
    }
}
