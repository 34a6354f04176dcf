//! Real-TTY terminal backend built on `crossterm`.

use std::io::{self, Read, Write};

use crossterm::{execute, terminal};

use crate::error::Result;

use super::Terminal;

/// Terminal backend for a real TTY, via `crossterm`.
///
/// Only the raw-mode/alt-screen/cursor-visibility/size/raw-I/O capability
/// set is used; event parsing is deliberately left to [`crate::decode`]
/// rather than `crossterm`'s own event reader.
pub struct CrosstermBackend {
    raw_mode: bool,
    alt_screen: bool,
}

impl CrosstermBackend {
    /// Create a backend bound to the process's stdin/stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw_mode: false,
            alt_screen: false,
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermBackend {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if !self.raw_mode {
            terminal::enable_raw_mode()?;
            self.raw_mode = true;
        }
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        self.alt_screen = true;
        Ok(())
    }

    fn exit_alt_screen(&mut self) -> Result<()> {
        if self.alt_screen {
            execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
            self.alt_screen = false;
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        execute!(io::stdout(), crossterm::cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        execute!(io::stdout(), crossterm::cursor::Show)?;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        io::stdout().write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(io::stdin().read(buf)?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if self.alt_screen {
            let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen);
        }
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
    }
}
