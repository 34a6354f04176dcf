//! Terminal abstraction: the capability set the program runtime needs,
//! polymorphic over a real TTY or an in-memory stand-in for tests.

mod crossterm_backend;
mod test_backend;

pub use crossterm_backend::CrosstermBackend;
pub use test_backend::TestBackend;

use crate::error::Result;

/// Operations the [`crate::program::Program`] runtime performs against a
/// terminal, real or simulated.
///
/// `crossterm::terminal` already resolves Unix-vs-Windows internally (termios
/// vs. the Win32 console API), so one [`CrosstermBackend`] covers both target
/// families rather than needing a backend per platform. Raw input bytes are
/// read directly from this trait rather than through any event-parsing layer
/// `crossterm` itself provides — this crate's own [`crate::decode`] module
/// owns that job.
pub trait Terminal: Send {
    /// Current terminal size in columns and rows.
    fn size(&self) -> Result<(u16, u16)>;

    /// Put the terminal into raw mode (no line buffering, no echo).
    fn enter_raw_mode(&mut self) -> Result<()>;

    /// Restore the terminal's prior mode.
    fn exit_raw_mode(&mut self) -> Result<()>;

    /// Switch to the alternate screen buffer.
    fn enter_alt_screen(&mut self) -> Result<()>;

    /// Switch back to the primary screen buffer.
    fn exit_alt_screen(&mut self) -> Result<()>;

    /// Hide the cursor.
    fn hide_cursor(&mut self) -> Result<()>;

    /// Show the cursor.
    fn show_cursor(&mut self) -> Result<()>;

    /// Write raw bytes to the terminal's output.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<()>;

    /// Read available input bytes into `buf`, blocking until at least one
    /// byte is available. Returns the number of bytes read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize>;
}
