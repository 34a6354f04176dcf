//! Error taxonomy for the runtime.

use std::io;

/// Errors produced by the terminal abstraction, the program runtime, and
/// child-process management.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A read, write, or ioctl call against the terminal failed.
    #[error("terminal io error: {0}")]
    TerminalIo(#[from] io::Error),

    /// `run` or `start` was called on a program that is already running.
    #[error("program is already running")]
    AlreadyRunning,

    /// `send` or `stop` was called on a program that is not running.
    #[error("program is not running")]
    NotRunning,

    /// A child process spawned via `Cmd::exec_process` failed to start, or
    /// exited with a non-zero status.
    #[error("child process error: {0}")]
    Process(String),

    /// The view function panicked on three consecutive frames.
    #[error("view function failed repeatedly; giving up")]
    ViewPanicked,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::other("boom");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::TerminalIo(_)));
    }

    #[test]
    fn display_messages_are_stable() {
        assert_eq!(
            Error::AlreadyRunning.to_string(),
            "program is already running"
        );
        assert_eq!(Error::NotRunning.to_string(), "program is not running");
        assert_eq!(
            Error::Process("exit 1".into()).to_string(),
            "child process error: exit 1"
        );
    }
}
