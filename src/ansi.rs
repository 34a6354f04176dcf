//! Stateful ANSI/SGR byte encoder.
//!
//! Tracks cursor position and active style so that repeated calls only ever
//! emit the bytes needed to transition from the previous state, never a
//! full re-encoding.

use std::fmt::Write as _;

use crate::color::Color;
use crate::style::Style;

/// Accumulates terminal-control bytes for one frame.
///
/// An `Encoder` is cheap to construct per frame; callers typically create
/// one, drive it through a sequence of moves/styles/writes, then take its
/// buffer with [`Encoder::finish`].
#[derive(Debug)]
pub struct Encoder {
    out: String,
    cursor: Option<(u16, u16)>,
    style: Style,
    style_active: bool,
}

impl Encoder {
    /// Start a new, empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: String::new(),
            cursor: None,
            style: Style::default(),
            style_active: false,
        }
    }

    /// Move the cursor to an absolute `(x, y)` position, 0-based. No-op
    /// (emits nothing) if already there.
    pub fn move_to(&mut self, x: u16, y: u16) {
        if self.cursor == Some((x, y)) {
            return;
        }
        let _ = write!(self.out, "\x1b[{};{}H", y + 1, x + 1);
        self.cursor = Some((x, y));
    }

    /// Transition the active style to `style`, emitting only the SGR
    /// parameters needed. A no-op if `style` equals the currently active
    /// style.
    pub fn set_style(&mut self, style: &Style) {
        if self.style_active && self.style == *style {
            return;
        }

        if !self.style_active || needs_full_reset(&self.style, style) {
            if self.style_active && !self.style.is_empty() {
                self.out.push_str("\x1b[0m");
            }
            self.write_full_style(style);
        } else {
            self.write_style_delta(style);
        }

        self.style = *style;
        self.style_active = true;
    }

    /// Write a single already-segmented grapheme cluster and advance the
    /// tracked cursor by its width.
    pub fn write_cluster(&mut self, cluster: &str, width: u8) {
        self.out.push_str(cluster);
        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x + u16::from(width), y));
        }
    }

    /// Emit a final SGR reset if any non-default style is currently active.
    pub fn reset_style(&mut self) {
        if self.style_active && !self.style.is_empty() {
            self.out.push_str("\x1b[0m");
        }
        self.style = Style::default();
        self.style_active = false;
    }

    /// `CSI 2 J`: clear the whole screen.
    pub fn clear_screen(&mut self) {
        self.out.push_str("\x1b[2J");
    }

    /// `CSI 2 K`: clear the current line.
    pub fn clear_line(&mut self) {
        self.out.push_str("\x1b[2K");
    }

    /// `CSI 0 K`: clear from the cursor to the end of the line.
    pub fn clear_to_end_of_line(&mut self) {
        self.out.push_str("\x1b[0K");
    }

    /// `CSI ?25 l`: hide the cursor.
    pub fn hide_cursor(&mut self) {
        self.out.push_str("\x1b[?25l");
    }

    /// `CSI ?25 h`: show the cursor.
    pub fn show_cursor(&mut self) {
        self.out.push_str("\x1b[?25h");
    }

    /// `CSI ?1049 h`: enter the alternate screen.
    pub fn enter_alt_screen(&mut self) {
        self.out.push_str("\x1b[?1049h");
    }

    /// `CSI ?1049 l`: exit the alternate screen.
    pub fn exit_alt_screen(&mut self) {
        self.out.push_str("\x1b[?1049l");
    }

    /// `CSI ?2026 h` / `l`: begin/end a synchronized-output batch.
    pub fn begin_synchronized(&mut self) {
        self.out.push_str("\x1b[?2026h");
    }

    /// End a synchronized-output batch.
    pub fn end_synchronized(&mut self) {
        self.out.push_str("\x1b[?2026l");
    }

    /// Consume the encoder, returning the accumulated byte (UTF-8) stream.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    /// True if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    fn write_full_style(&mut self, style: &Style) {
        if let Some(fg) = style.fg {
            write_fg(&mut self.out, fg);
        }
        if let Some(bg) = style.bg {
            write_bg(&mut self.out, bg);
        }
        write_attrs(&mut self.out, style);
    }

    fn write_style_delta(&mut self, next: &Style) {
        if self.style.fg != next.fg {
            if let Some(fg) = next.fg {
                write_fg(&mut self.out, fg);
            } else {
                self.out.push_str("\x1b[39m");
            }
        }
        if self.style.bg != next.bg {
            if let Some(bg) = next.bg {
                write_bg(&mut self.out, bg);
            } else {
                self.out.push_str("\x1b[49m");
            }
        }
        if !self.style.bold && next.bold {
            self.out.push_str("\x1b[1m");
        }
        if !self.style.dim && next.dim {
            self.out.push_str("\x1b[2m");
        }
        if !self.style.italic && next.italic {
            self.out.push_str("\x1b[3m");
        }
        if !self.style.underline && next.underline {
            self.out.push_str("\x1b[4m");
        }
        if !self.style.blink && next.blink {
            self.out.push_str("\x1b[5m");
        }
        if !self.style.reverse && next.reverse {
            self.out.push_str("\x1b[7m");
        }
        if !self.style.strikethrough && next.strikethrough {
            self.out.push_str("\x1b[9m");
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `prev -> next` requires a full SGR reset: true whenever an
/// attribute must be turned *off*, since SGR has no single negating code
/// for an arbitrary subset.
fn needs_full_reset(prev: &Style, next: &Style) -> bool {
    (prev.bold && !next.bold)
        || (prev.dim && !next.dim)
        || (prev.italic && !next.italic)
        || (prev.underline && !next.underline)
        || (prev.blink && !next.blink)
        || (prev.reverse && !next.reverse)
        || (prev.strikethrough && !next.strikethrough)
}

fn write_attrs(out: &mut String, style: &Style) {
    if style.bold {
        out.push_str("\x1b[1m");
    }
    if style.dim {
        out.push_str("\x1b[2m");
    }
    if style.italic {
        out.push_str("\x1b[3m");
    }
    if style.underline {
        out.push_str("\x1b[4m");
    }
    if style.blink {
        out.push_str("\x1b[5m");
    }
    if style.reverse {
        out.push_str("\x1b[7m");
    }
    if style.strikethrough {
        out.push_str("\x1b[9m");
    }
}

fn write_fg(out: &mut String, color: Color) {
    match color {
        Color::Default => out.push_str("\x1b[39m"),
        Color::Ansi16(n) => {
            let code = if n < 8 { 30 + n } else { 90 + (n - 8) };
            let _ = write!(out, "\x1b[{code}m");
        }
        Color::Ansi256(n) => {
            let _ = write!(out, "\x1b[38;5;{n}m");
        }
        Color::Rgb(r, g, b) => {
            let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
        }
    }
}

fn write_bg(out: &mut String, color: Color) {
    match color {
        Color::Default => out.push_str("\x1b[49m"),
        Color::Ansi16(n) => {
            let code = if n < 8 { 40 + n } else { 100 + (n - 8) };
            let _ = write!(out, "\x1b[{code}m");
        }
        Color::Ansi256(n) => {
            let _ = write!(out, "\x1b[48;5;{n}m");
        }
        Color::Rgb(r, g, b) => {
            let _ = write!(out, "\x1b[48;2;{r};{g};{b}m");
        }
    }
}
