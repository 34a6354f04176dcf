//! `Cmd`: the side-effect thunk returned by `init`/`update`, and `Msg`, the
//! envelope the event loop actually queues and dispatches.

use std::fmt;
use std::time::{Duration, Instant};

use crate::event::{Event, KeyEvent, MouseEvent};

/// A boxed closure run on a background task; its result becomes a `User`
/// message back in the loop.
type PerformFn<M> = Box<dyn FnOnce() -> M + Send>;

/// A side effect requested by `init()` or `update()`.
///
/// A `Cmd` is inert data until the [`crate::program::Program`] runtime spawns
/// it; constructing one never performs work itself.
pub enum Cmd<M> {
    /// No side effect.
    None,
    /// Stop the event loop after the current render.
    Quit,
    /// After `duration`, enqueue a `Tick` message carrying the fire time.
    Tick(Duration),
    /// Run `f` on a background task; its return value becomes a `User`
    /// message.
    Perform(PerformFn<M>),
    /// Spawn `program` with `args`; its exit status (or spawn failure)
    /// becomes a `User` message via `map`.
    ExecProcess {
        /// Executable to run.
        program: String,
        /// Arguments to pass.
        args: Vec<String>,
        /// Maps the process outcome to a user message.
        map: Box<dyn FnOnce(crate::error::Result<i32>) -> M + Send>,
    },
    /// Run every command concurrently; collect results in completion order.
    Batch(Vec<Cmd<M>>),
    /// Run every command in order, awaiting each before the next; collect
    /// results in command order.
    Sequence(Vec<Cmd<M>>),
}

impl<M> Cmd<M> {
    /// The no-op command.
    #[must_use]
    pub fn none() -> Self {
        Cmd::None
    }

    /// Stop the program.
    #[must_use]
    pub fn quit() -> Self {
        Cmd::Quit
    }

    /// Fire a `Tick` after `duration`.
    #[must_use]
    pub fn tick(duration: Duration) -> Self {
        Cmd::Tick(duration)
    }

    /// Run `f` in the background; its result arrives as a user message.
    #[must_use]
    pub fn perform(f: impl FnOnce() -> M + Send + 'static) -> Self {
        Cmd::Perform(Box::new(f))
    }

    /// Spawn a child process; map its outcome to a user message.
    #[must_use]
    pub fn exec_process(
        program: impl Into<String>,
        args: Vec<String>,
        map: impl FnOnce(crate::error::Result<i32>) -> M + Send + 'static,
    ) -> Self {
        Cmd::ExecProcess {
            program: program.into(),
            args,
            map: Box::new(map),
        }
    }

    /// Run commands concurrently. No-op commands are dropped before the
    /// 0/1/many decision is made at dispatch time.
    #[must_use]
    pub fn batch(cmds: Vec<Cmd<M>>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Run commands in order. Same no-op filtering as [`Cmd::batch`].
    #[must_use]
    pub fn sequence(cmds: Vec<Cmd<M>>) -> Self {
        Cmd::Sequence(cmds)
    }

    /// True for [`Cmd::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}

impl<M> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::None => write!(f, "Cmd::None"),
            Cmd::Quit => write!(f, "Cmd::Quit"),
            Cmd::Tick(d) => write!(f, "Cmd::Tick({d:?})"),
            Cmd::Perform(_) => write!(f, "Cmd::Perform(..)"),
            Cmd::ExecProcess { program, args, .. } => {
                write!(f, "Cmd::ExecProcess({program} {args:?})")
            }
            Cmd::Batch(cmds) => write!(f, "Cmd::Batch({} cmds)", cmds.len()),
            Cmd::Sequence(cmds) => write!(f, "Cmd::Sequence({} cmds)", cmds.len()),
        }
    }
}

/// The message envelope the event loop's FIFO queue actually carries:
/// built-in terminal/runtime messages plus the application's own `M`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Msg<M> {
    /// An application-defined message, produced by a `Cmd::Perform`/
    /// `Cmd::ExecProcess` or constructed directly by the host.
    User(M),
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event (already enriched).
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Bracketed-paste text arrived.
    Paste(String),
    /// The terminal gained focus.
    FocusGained,
    /// The terminal lost focus.
    FocusLost,
    /// The program should stop after this render.
    Quit,
    /// A `Cmd::Tick` fired.
    Tick {
        /// The instant the tick fired.
        at: Instant,
    },
    /// The results of a `Cmd::Batch`, completion order.
    Batch(Vec<Msg<M>>),
    /// The results of a `Cmd::Sequence`, command order.
    Sequence(Vec<Msg<M>>),
}

impl<M> Msg<M> {
    /// Lift a raw decoded/enriched terminal event into the envelope.
    #[must_use]
    pub fn from_event(event: Event) -> Self {
        match event {
            Event::Key(k) => Msg::Key(k),
            Event::Mouse(m) => Msg::Mouse(m),
            Event::Resize(w, h) => Msg::Resize(w, h),
            Event::Paste(s) => Msg::Paste(s),
            Event::FocusGained => Msg::FocusGained,
            Event::FocusLost => Msg::FocusLost,
        }
    }
}
