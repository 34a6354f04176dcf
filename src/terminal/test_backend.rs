//! In-memory terminal backend for tests: records every write, serves
//! pre-loaded input bytes, and tracks mode transitions for assertions.

use std::collections::VecDeque;

use crate::error::{Error, Result};

use super::Terminal;

/// An in-memory stand-in for a real terminal.
///
/// Output written by the program under test accumulates in
/// [`TestBackend::output`]; input bytes queued with
/// [`TestBackend::push_input`] are drained in order by [`Terminal::read_bytes`].
pub struct TestBackend {
    width: u16,
    height: u16,
    output: Vec<u8>,
    input: VecDeque<u8>,
    raw_mode: bool,
    alt_screen: bool,
    cursor_visible: bool,
}

impl TestBackend {
    /// Create a backend with the given size, cursor visible, normal mode.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            output: Vec::new(),
            input: VecDeque::new(),
            raw_mode: false,
            alt_screen: false,
            cursor_visible: true,
        }
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Clear the recorded output without resetting mode flags.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Queue bytes to be handed back by subsequent `read_bytes` calls.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Simulate a resize.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Whether raw mode is currently active.
    #[must_use]
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Whether the alternate screen is currently active.
    #[must_use]
    pub fn is_alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// Whether the cursor is currently visible.
    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

impl Terminal for TestBackend {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        self.alt_screen = true;
        Ok(())
    }

    fn exit_alt_screen(&mut self) -> Result<()> {
        self.alt_screen = false;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.cursor_visible = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.input.is_empty() {
            return Err(Error::TerminalIo(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "no input queued",
            )));
        }
        let mut n = 0;
        while n < buf.len() {
            let Some(b) = self.input.pop_front() else {
                break;
            };
            buf[n] = b;
            n += 1;
        }
        Ok(n)
    }
}
