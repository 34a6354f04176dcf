//! vellum-tui: a differential-rendering, Model-Update-View terminal UI
//! runtime.
//!
//! Unlike most terminal UI crates, this one does not delegate input
//! decoding to its terminal backend. The byte-level ANSI/CSI/SS3 decoder
//! and mouse-protocol classifier in [`decode`] and [`mouse`] are the
//! crate's core differentiator; `crossterm` is used only for the
//! raw-mode/alt-screen/cursor capability layer in [`terminal`].
//!
//! An application implements [`program::Model`] — `init`, `update`, `view`
//! — and hands it to a [`program::Program`], which owns a single-threaded
//! cooperative event loop: decoded input, fired [`command::Cmd`]s, and
//! externally sent messages all flow through one FIFO queue, and every
//! frame is reconciled against the previous one cell-by-cell before any
//! bytes reach the terminal.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod command;
pub mod decode;
pub mod error;
pub mod event;
pub mod mouse;
pub mod options;
pub mod program;
pub mod renderer;
pub mod style;
pub mod terminal;
pub mod text;
pub mod width;

pub use buffer::{Buffer, CellChange};
pub use cell::Cell;
pub use color::Color;
pub use command::{Cmd, Msg};
pub use decode::Decoder;
pub use error::{Error, Result};
pub use event::{Event, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use mouse::MouseEnricher;
pub use options::ProgramOptions;
pub use program::{Model, Program, ProgramHandle};
pub use renderer::Renderer;
pub use style::Style;
pub use terminal::{CrosstermBackend, Terminal, TestBackend};
pub use text::Preprocessor;
pub use width::{segment, width, Grapheme};
