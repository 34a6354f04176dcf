//! Terminal color values.

use crossterm::style::Color as CtColor;

/// A terminal color.
///
/// `Default` lets the terminal's own foreground/background show through
/// (emitted as SGR `39`/`49`). `Ansi16` indexes the 16 classic ANSI colors
/// (0-7 normal, 8-15 bright). `Ansi256` indexes the extended 256-color
/// palette. `Rgb` is 24-bit true color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Terminal default foreground/background.
    #[default]
    Default,
    /// One of the 16 standard ANSI colors (0-15).
    Ansi16(u8),
    /// One of the 256 extended palette colors.
    Ansi256(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Build an RGB color from a `#rrggbb` hex string.
    ///
    /// Returns `None` if the string isn't exactly 7 bytes starting with `#`
    /// and followed by six hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }
}

impl From<Color> for CtColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Default => CtColor::Reset,
            Color::Ansi16(n) => ansi16_to_crossterm(n),
            Color::Ansi256(n) => CtColor::AnsiValue(n),
            Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
        }
    }
}

fn ansi16_to_crossterm(n: u8) -> CtColor {
    match n & 0x0F {
        0 => CtColor::Black,
        1 => CtColor::DarkRed,
        2 => CtColor::DarkGreen,
        3 => CtColor::DarkYellow,
        4 => CtColor::DarkBlue,
        5 => CtColor::DarkMagenta,
        6 => CtColor::DarkCyan,
        7 => CtColor::Grey,
        8 => CtColor::DarkGrey,
        9 => CtColor::Red,
        10 => CtColor::Green,
        11 => CtColor::Yellow,
        12 => CtColor::Blue,
        13 => CtColor::Magenta,
        14 => CtColor::Cyan,
        _ => CtColor::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_default_variant() {
        assert_eq!(Color::default(), Color::Default);
    }

    #[test]
    fn from_hex_parses_valid_colors() {
        assert_eq!(Color::from_hex("#ff0080"), Some(Color::Rgb(0xff, 0x00, 0x80)));
        assert_eq!(Color::from_hex("#000000"), Some(Color::Rgb(0, 0, 0)));
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert_eq!(Color::from_hex("ff0080"), None);
        assert_eq!(Color::from_hex("#ff00"), None);
        assert_eq!(Color::from_hex("#gg0080"), None);
    }

    #[test]
    fn ansi16_round_trips_to_crossterm() {
        assert_eq!(CtColor::from(Color::Ansi16(1)), CtColor::DarkRed);
        assert_eq!(CtColor::from(Color::Ansi16(9)), CtColor::Red);
    }

    #[test]
    fn rgb_converts_directly() {
        assert_eq!(
            CtColor::from(Color::Rgb(10, 20, 30)),
            CtColor::Rgb { r: 10, g: 20, b: 30 }
        );
    }
}
