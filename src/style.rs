//! Immutable text style descriptor.

use crate::color::Color;

/// Style attributes for a piece of text.
///
/// Styles are immutable value types: every setter consumes `self` and
/// returns a new `Style`. Two styles are equal iff every field matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
    /// Strikethrough text.
    pub strikethrough: bool,
    /// Dim/faint text.
    pub dim: bool,
    /// Reverse video.
    pub reverse: bool,
    /// Blink.
    pub blink: bool,
}

impl Style {
    /// Create an empty style with no attributes set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set bold.
    #[must_use]
    pub fn bold(mut self, val: bool) -> Self {
        self.bold = val;
        self
    }

    /// Set italic.
    #[must_use]
    pub fn italic(mut self, val: bool) -> Self {
        self.italic = val;
        self
    }

    /// Set underline.
    #[must_use]
    pub fn underline(mut self, val: bool) -> Self {
        self.underline = val;
        self
    }

    /// Set strikethrough.
    #[must_use]
    pub fn strikethrough(mut self, val: bool) -> Self {
        self.strikethrough = val;
        self
    }

    /// Set dim/faint.
    #[must_use]
    pub fn dim(mut self, val: bool) -> Self {
        self.dim = val;
        self
    }

    /// Set reverse video.
    #[must_use]
    pub fn reverse(mut self, val: bool) -> Self {
        self.reverse = val;
        self
    }

    /// Set blink.
    #[must_use]
    pub fn blink(mut self, val: bool) -> Self {
        self.blink = val;
        self
    }

    /// Compose `self` with `other`, with fields set in `other` taking
    /// priority. Boolean attributes are OR'd; colors prefer `other`'s value
    /// when present.
    #[must_use]
    pub fn over(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            dim: self.dim || other.dim,
            reverse: self.reverse || other.reverse,
            blink: self.blink || other.blink,
        }
    }

    /// Returns true if no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Style> for crossterm::style::ContentStyle {
    fn from(style: &Style) -> Self {
        use crossterm::style::{Attribute, ContentStyle};

        let mut cs = ContentStyle::new();
        if let Some(fg) = style.fg {
            cs.foreground_color = Some(fg.into());
        }
        if let Some(bg) = style.bg {
            cs.background_color = Some(bg.into());
        }
        if style.bold {
            cs.attributes.set(Attribute::Bold);
        }
        if style.italic {
            cs.attributes.set(Attribute::Italic);
        }
        if style.underline {
            cs.attributes.set(Attribute::Underlined);
        }
        if style.strikethrough {
            cs.attributes.set(Attribute::CrossedOut);
        }
        if style.dim {
            cs.attributes.set(Attribute::Dim);
        }
        if style.reverse {
            cs.attributes.set(Attribute::Reverse);
        }
        if style.blink {
            cs.attributes.set(Attribute::SlowBlink);
        }
        cs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_pattern() {
        let s = Style::new().fg(Color::Ansi16(1)).bold(true).italic(true);
        assert_eq!(s.fg, Some(Color::Ansi16(1)));
        assert!(s.bold);
        assert!(s.italic);
        assert!(!s.underline);
    }

    #[test]
    fn default_is_empty() {
        assert!(Style::new().is_empty());
    }

    #[test]
    fn non_empty_style() {
        assert!(!Style::new().bold(true).is_empty());
    }

    #[test]
    fn over_overrides_fg() {
        let base = Style::new().fg(Color::Ansi16(1));
        let top = Style::new().fg(Color::Ansi16(4));
        let merged = base.over(&top);
        assert_eq!(merged.fg, Some(Color::Ansi16(4)));
    }

    #[test]
    fn over_preserves_unset_fields() {
        let base = Style::new().fg(Color::Ansi16(1)).bold(true);
        let top = Style::new().italic(true);
        let merged = base.over(&top);
        assert_eq!(merged.fg, Some(Color::Ansi16(1)));
        assert!(merged.bold);
        assert!(merged.italic);
    }

    #[test]
    fn equal_styles_are_equal() {
        let a = Style::new().fg(Color::Ansi16(1)).bold(true);
        let b = Style::new().fg(Color::Ansi16(1)).bold(true);
        assert_eq!(a, b);
    }

    #[test]
    fn crossterm_conversion() {
        let s = Style::new().fg(Color::Rgb(1, 2, 3)).bold(true);
        let cs: crossterm::style::ContentStyle = (&s).into();
        assert_eq!(
            cs.foreground_color,
            Some(crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 })
        );
    }
}
