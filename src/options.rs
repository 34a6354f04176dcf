//! `ProgramOptions`: the in-process configuration surface the runtime is
//! constructed from.

use std::time::Duration;

use crate::decode::DEFAULT_ESCAPE_TIMEOUT;
use crate::mouse::{DEFAULT_CLICK_TIMEOUT, DEFAULT_CLICK_TOLERANCE, DEFAULT_DRAG_THRESHOLD};

/// Construction-time configuration for a [`crate::program::Program`].
///
/// There are no config files in this crate's surface; this bag is the
/// config layer, set by the host before starting the loop.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Whether to run in the terminal's alternate screen (full-screen mode)
    /// rather than inline.
    pub alt_screen: bool,
    /// Whether to request any-motion mouse reporting (`CSI ?1003h`) rather
    /// than button-event-only reporting (`CSI ?1002h`).
    pub all_mouse_motion: bool,
    /// How long to wait after a lone `ESC` byte before treating it as an
    /// Escape keypress.
    pub escape_timeout: Duration,
    /// Maximum gap between releases for them to chain into a double/triple
    /// click.
    pub click_timeout: Duration,
    /// Maximum positional drift, in cells, between chained clicks.
    pub click_tolerance: u16,
    /// Manhattan distance, in cells, beyond which held-button motion counts
    /// as a drag.
    pub drag_threshold: u16,
    /// Whether to wrap each rendered frame in `CSI ?2026h`/`l` synchronized
    /// output.
    pub synchronized_output: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            all_mouse_motion: false,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            click_timeout: DEFAULT_CLICK_TIMEOUT,
            click_tolerance: DEFAULT_CLICK_TOLERANCE,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            synchronized_output: false,
        }
    }
}

impl ProgramOptions {
    /// Start from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run inline (no alternate screen) instead of the default full-screen
    /// mode.
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.alt_screen = false;
        self
    }

    /// Request any-motion mouse reporting.
    #[must_use]
    pub fn with_all_mouse_motion(mut self, enabled: bool) -> Self {
        self.all_mouse_motion = enabled;
        self
    }

    /// Override the escape-sequence disambiguation timeout.
    #[must_use]
    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    /// Enable synchronized-output wrapping for frames.
    #[must_use]
    pub fn with_synchronized_output(mut self, enabled: bool) -> Self {
        self.synchronized_output = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_alt_screen_and_button_event_mouse() {
        let opts = ProgramOptions::default();
        assert!(opts.alt_screen);
        assert!(!opts.all_mouse_motion);
    }

    #[test]
    fn inline_clears_alt_screen() {
        let opts = ProgramOptions::new().inline();
        assert!(!opts.alt_screen);
    }

    #[test]
    fn builder_overrides_escape_timeout() {
        let opts = ProgramOptions::new().with_escape_timeout(Duration::from_millis(5));
        assert_eq!(opts.escape_timeout, Duration::from_millis(5));
    }
}
