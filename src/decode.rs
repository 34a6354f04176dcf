//! Hand-rolled streaming decoder: raw terminal bytes to [`Event`]s.
//!
//! Unlike the rest of the terminal abstraction, this module deliberately
//! does not delegate to `crossterm`'s own event parser. Decoding input
//! ourselves — including the three competing mouse-reporting protocols and
//! the ESC-vs-CSI timing ambiguity — is this crate's core differentiator,
//! not a place to reach for a dependency.

use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

use crate::event::{Event, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};

/// Default time to wait after a lone `ESC` byte before deciding it was a
/// real Escape keypress rather than the start of a CSI/SS3 sequence.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// Streaming byte-to-event decoder.
///
/// Feed it bytes as they arrive with [`Decoder::feed`]; call
/// [`Decoder::poll_timeout`] periodically (or whenever the input source has
/// gone idle) so a lone `ESC` eventually resolves to `Key(Escape)`.
pub struct Decoder {
    buf: Vec<u8>,
    pending_since: Option<Instant>,
    escape_timeout: Duration,
    paste: Option<String>,
}

impl Decoder {
    /// Create a decoder with the default escape timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_escape_timeout(DEFAULT_ESCAPE_TIMEOUT)
    }

    /// Create a decoder with a custom escape timeout.
    #[must_use]
    pub fn with_escape_timeout(escape_timeout: Duration) -> Self {
        Self {
            buf: Vec::new(),
            pending_since: None,
            escape_timeout,
            paste: None,
        }
    }

    /// Feed newly-read bytes into the decoder, returning every event that
    /// could be fully decoded. Bytes that form an incomplete sequence are
    /// retained for the next call.
    pub fn feed(&mut self, bytes: &[u8], now: Instant) -> Vec<Event> {
        self.buf.extend_from_slice(bytes);
        let mut events = Vec::new();

        loop {
            match self.try_decode_one() {
                Step::Emit(event, consumed) => {
                    self.buf.drain(..consumed);
                    self.pending_since = None;
                    events.push(event);
                }
                Step::Skip(consumed) => {
                    self.buf.drain(..consumed);
                    self.pending_since = None;
                }
                Step::BeginPaste(consumed) => {
                    self.buf.drain(..consumed);
                    self.pending_since = None;
                    self.paste = Some(String::new());
                }
                Step::NeedMore => {
                    if !self.buf.is_empty() && self.pending_since.is_none() {
                        self.pending_since = Some(now);
                    }
                    break;
                }
                Step::Empty => break,
            }
        }

        events
    }

    /// Scan buffered bytes for the bracketed-paste terminator `ESC[201~`
    /// while paste accumulation is active.
    fn advance_paste(&mut self) -> Step {
        const TERMINATOR: &[u8] = b"\x1b[201~";
        if let Some(pos) = find_subslice(&self.buf, TERMINATOR) {
            let text = String::from_utf8_lossy(&self.buf[..pos]).into_owned();
            self.paste = None;
            return Step::Emit(Event::Paste(text), pos + TERMINATOR.len());
        }
        Step::NeedMore
    }

    /// Call when the input source has been idle; resolves a lone pending
    /// `ESC` into `Key(Escape)`, or a single held-back trailing grapheme
    /// cluster into its `Key` event, once [`Decoder::escape_timeout`] has
    /// elapsed with no further bytes arriving.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<Event> {
        let since = self.pending_since?;
        if now.duration_since(since) < self.escape_timeout {
            return None;
        }

        if self.buf == [0x1B] {
            self.buf.clear();
            self.pending_since = None;
            return Some(Event::Key(KeyEvent::plain(KeyCode::Escape)));
        }

        if self.paste.is_none() && !self.buf.is_empty() {
            if let Step::Emit(event, consumed) = decode_text(&self.buf, true) {
                self.buf.drain(..consumed);
                self.pending_since = None;
                return Some(event);
            }
        }

        None
    }

    /// The configured escape-sequence timeout.
    #[must_use]
    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }

    fn try_decode_one(&mut self) -> Step {
        if self.paste.is_some() {
            return self.advance_paste();
        }

        let buf = &self.buf;
        if buf.is_empty() {
            return Step::Empty;
        }

        match buf[0] {
            0x1B => decode_escape(buf),
            0x09 => Step::Emit(Event::Key(KeyEvent::plain(KeyCode::Tab)), 1),
            0x0D | 0x0A => Step::Emit(Event::Key(KeyEvent::plain(KeyCode::Enter)), 1),
            0x7F | 0x08 => Step::Emit(Event::Key(KeyEvent::plain(KeyCode::Backspace)), 1),
            0x00 => Step::Emit(
                Event::Key(KeyEvent::new(KeyCode::Char(" ".into()), Modifiers::CTRL)),
                1,
            ),
            b @ 0x01..=0x1A => {
                let c = (b - 1 + b'a') as char;
                Step::Emit(
                    Event::Key(KeyEvent::new(KeyCode::Char(c.to_string()), Modifiers::CTRL)),
                    1,
                )
            }
            0x20 => Step::Emit(Event::Key(KeyEvent::plain(KeyCode::Space)), 1),
            _ => decode_text(buf, false),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

enum Step {
    Emit(Event, usize),
    Skip(usize),
    BeginPaste(usize),
    NeedMore,
    Empty,
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn decode_escape(buf: &[u8]) -> Step {
    if buf.len() < 2 {
        return Step::NeedMore;
    }

    match buf[1] {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        // Alt+<printable>: terminals commonly prefix a key with a bare ESC
        // to signal the Alt modifier rather than sending a CSI sequence.
        b if b.is_ascii_graphic() => Step::Emit(
            Event::Key(KeyEvent::new(
                KeyCode::Char((b as char).to_string()),
                Modifiers::ALT,
            )),
            2,
        ),
        _ => Step::Emit(Event::Key(KeyEvent::plain(KeyCode::Escape)), 1),
    }
}

fn decode_ss3(buf: &[u8]) -> Step {
    if buf.len() < 3 {
        return Step::NeedMore;
    }
    let code = match buf[2] {
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Step::Skip(3),
    };
    Step::Emit(Event::Key(KeyEvent::plain(code)), 3)
}

fn decode_csi(buf: &[u8]) -> Step {
    if buf.len() < 3 {
        return Step::NeedMore;
    }

    // X10 mouse: ESC [ M <button+32> <x+32> <y+32>, three raw bytes with
    // no parameter/final-byte structure at all.
    if buf[2] == b'M' {
        if buf.len() < 6 {
            return Step::NeedMore;
        }
        let b = buf[3].wrapping_sub(32);
        let x = u16::from(buf[4].wrapping_sub(32)).saturating_sub(1);
        let y = u16::from(buf[5].wrapping_sub(32)).saturating_sub(1);
        return Step::Emit(Event::Mouse(decode_mouse_bits(b, x, y, false)), 6);
    }

    let sgr = buf[2] == b'<';
    let body_start = if sgr { 3 } else { 2 };

    // Scan for a final byte (0x40..=0x7E) after the parameter/intermediate
    // bytes, capping the search so a malformed/never-terminated sequence
    // doesn't buffer forever.
    const MAX_CSI_BODY: usize = 64;
    let mut i = body_start;
    while i < buf.len() && i - body_start < MAX_CSI_BODY {
        let b = buf[i];
        if (0x40..=0x7E).contains(&b) {
            let params_raw = &buf[body_start..i];
            let final_byte = b;
            let consumed = i + 1;
            return finish_csi(buf, params_raw, final_byte, sgr, consumed);
        }
        i += 1;
    }

    if i - body_start >= MAX_CSI_BODY {
        tracing::warn!(bytes = i, "discarding unterminated CSI sequence");
        return Step::Skip(i);
    }

    Step::NeedMore
}

fn finish_csi(buf: &[u8], params_raw: &[u8], final_byte: u8, sgr: bool, consumed: usize) -> Step {
    let params = parse_params(params_raw);

    if sgr && (final_byte == b'M' || final_byte == b'm') {
        let b = params.first().copied().unwrap_or(0) as u8;
        let x = params.get(1).map_or(0, |v| v.saturating_sub(1)) as u16;
        let y = params.get(2).map_or(0, |v| v.saturating_sub(1)) as u16;
        let release = final_byte == b'm';
        return Step::Emit(Event::Mouse(decode_mouse_bits(b, x, y, release)), consumed);
    }

    if !sgr && final_byte == b'M' && params.len() >= 3 {
        let b = params[0] as u8;
        let x = params[1].saturating_sub(1) as u16;
        let y = params[2].saturating_sub(1) as u16;
        return Step::Emit(Event::Mouse(decode_mouse_bits(b, x, y, false)), consumed);
    }

    if final_byte == b'~' {
        if let Some(&n) = params.first() {
            match n {
                200 => return Step::BeginPaste(consumed),
                201 => return Step::Skip(consumed), // stray end marker outside paste mode
                _ => {}
            }
        }
    }

    let modifiers = params.get(1).map_or(Modifiers::NONE, |m| {
        Modifiers::from_bits((m.saturating_sub(1)) as u8)
    });

    let code = match final_byte {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        b'I' => return Step::Emit(Event::FocusGained, consumed),
        b'O' if params_raw.is_empty() => return Step::Emit(Event::FocusLost, consumed),
        b'P' => Some(KeyCode::F(1)),
        b'Q' => Some(KeyCode::F(2)),
        b'R' => Some(KeyCode::F(3)),
        b'S' => Some(KeyCode::F(4)),
        b'~' => tilde_code(params.first().copied().unwrap_or(0)),
        _ => None,
    };

    match code {
        Some(code) => Step::Emit(Event::Key(KeyEvent::new(code, modifiers)), consumed),
        None => {
            tracing::warn!(final_byte, "discarding unrecognized CSI sequence");
            Step::Skip(consumed)
        }
    }
}

fn tilde_code(n: i64) -> Option<KeyCode> {
    match n {
        2 => Some(KeyCode::Insert),
        3 => Some(KeyCode::Delete),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        7 => Some(KeyCode::Home),
        8 => Some(KeyCode::End),
        11 => Some(KeyCode::F(1)),
        12 => Some(KeyCode::F(2)),
        13 => Some(KeyCode::F(3)),
        14 => Some(KeyCode::F(4)),
        15 => Some(KeyCode::F(5)),
        17 => Some(KeyCode::F(6)),
        18 => Some(KeyCode::F(7)),
        19 => Some(KeyCode::F(8)),
        20 => Some(KeyCode::F(9)),
        21 => Some(KeyCode::F(10)),
        23 => Some(KeyCode::F(11)),
        24 => Some(KeyCode::F(12)),
        _ => None,
    }
}

fn parse_params(raw: &[u8]) -> Vec<i64> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0)
        })
        .collect()
}

/// Shared SGR/X10/URxvt button-bit decoding: low 2 bits select the button,
/// bit 5 (0x20) marks motion, bit 6 (0x40) marks a wheel event, bits 2-4
/// carry Shift/Alt/Ctrl.
fn decode_mouse_bits(b: u8, x: u16, y: u16, release: bool) -> MouseEvent {
    let modifiers = Modifiers::from_bits((b >> 2) & 0b111);
    let is_motion = b & 0x20 != 0;
    let is_wheel = b & 0x40 != 0;

    let (button, action) = if is_wheel {
        let btn = if b & 0x01 == 0 {
            MouseButton::WheelUp
        } else {
            MouseButton::WheelDown
        };
        (btn, MouseAction::Scroll)
    } else {
        let btn = match b & 0x03 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        };
        let action = if release {
            MouseAction::Release
        } else if is_motion {
            MouseAction::Motion
        } else {
            MouseAction::Press
        };
        (btn, action)
    };

    MouseEvent {
        x,
        y,
        button,
        action,
        modifiers,
    }
}

fn decode_text(buf: &[u8], force: bool) -> Step {
    // Consume the longest valid UTF-8 run up to the next control/escape
    // byte, then hand it to the grapheme segmenter. The final cluster is
    // held back (NeedMore) unless the whole run is itself an obvious
    // terminator, since a trailing base character might still be waiting
    // on a combining mark in the next read. `force` overrides that hold-back
    // once `Decoder::poll_timeout` has decided no more bytes are coming.
    let mut end = 0;
    while end < buf.len() && buf[end] >= 0x20 && buf[end] != 0x7F {
        end += 1;
    }
    if end == 0 {
        return Step::Skip(1);
    }

    let text = match std::str::from_utf8(&buf[..end]) {
        Ok(s) => s,
        Err(e) if e.valid_up_to() > 0 => {
            // Re-slice to the valid prefix; the rest may still be an
            // in-flight multi-byte sequence.
            std::str::from_utf8(&buf[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return Step::NeedMore,
    };
    if text.is_empty() {
        return Step::NeedMore;
    }

    let clusters: Vec<&str> = text.graphemes(true).collect();
    if clusters.is_empty() {
        return Step::NeedMore;
    }

    if clusters.len() == 1 && end == buf.len() && !force {
        // Only one cluster available and no more bytes buffered after it:
        // could still be extended by a combining mark on the next read.
        return Step::NeedMore;
    }

    let first = clusters[0];
    let consumed = first.len();
    Step::Emit(
        Event::Key(KeyEvent::plain(KeyCode::Char(first.to_string()))),
        consumed,
    )
}
