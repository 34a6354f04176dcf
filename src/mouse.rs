//! Turns the decoder's raw press/release/motion events into clicks,
//! double/triple-clicks, drags, and scrolls.

use std::time::{Duration, Instant};

use crate::event::{MouseAction, MouseButton, MouseEvent};

/// Manhattan distance, in cells, beyond which a held-button motion counts as
/// a drag rather than jitter.
pub const DEFAULT_DRAG_THRESHOLD: u16 = 2;
/// Maximum gap between releases for them to chain into a double/triple click.
pub const DEFAULT_CLICK_TIMEOUT: Duration = Duration::from_millis(300);
/// Maximum positional drift between chained clicks.
pub const DEFAULT_CLICK_TOLERANCE: u16 = 1;
/// Scroll delta emitted per wheel tick.
pub const DEFAULT_LINES_PER_TICK: i32 = 3;

/// Stateful classifier for raw mouse events.
///
/// Feed it every `Press`/`Release`/`Motion`/`Scroll` event the decoder
/// produces, in order, via [`MouseEnricher::process`]; it returns the
/// event(s) that should actually reach the application, with `Click`,
/// `DoubleClick`, `TripleClick`, and `Drag` filled in where the raw stream
/// alone can't tell them apart.
#[derive(Debug)]
pub struct MouseEnricher {
    drag_threshold: u16,
    click_timeout: Duration,
    click_tolerance: u16,
    lines_per_tick: i32,
    last_click_time: Option<Instant>,
    last_click_pos: Option<(u16, u16)>,
    last_click_count: u8,
    press_pos: Option<(u16, u16)>,
    dragging: bool,
}

impl MouseEnricher {
    /// Build an enricher with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            click_timeout: DEFAULT_CLICK_TIMEOUT,
            click_tolerance: DEFAULT_CLICK_TOLERANCE,
            lines_per_tick: DEFAULT_LINES_PER_TICK,
            last_click_time: None,
            last_click_pos: None,
            last_click_count: 0,
            press_pos: None,
            dragging: false,
        }
    }

    /// Process one raw event from the decoder, at time `now`, producing the
    /// enriched event(s) to deliver to the application.
    pub fn process(&mut self, raw: MouseEvent, now: Instant) -> Vec<MouseEvent> {
        match raw.action {
            MouseAction::Press => {
                self.press_pos = Some((raw.x, raw.y));
                self.dragging = false;
                vec![raw]
            }
            MouseAction::Motion if raw.button != MouseButton::None => {
                if self.is_dragging(raw.x, raw.y) {
                    self.dragging = true;
                    vec![MouseEvent {
                        action: MouseAction::Drag,
                        ..raw
                    }]
                } else {
                    vec![raw]
                }
            }
            MouseAction::Release => self.release(raw, now),
            MouseAction::Scroll => vec![raw],
            // Motion with no button held ("any-motion"), or an action the
            // decoder already classified: pass through untouched.
            _ => vec![raw],
        }
    }

    /// The configured scroll delta, in lines, for one wheel tick.
    #[must_use]
    pub fn lines_per_tick(&self) -> i32 {
        self.lines_per_tick
    }

    /// Clear all click/drag state. Called on focus loss.
    pub fn reset(&mut self) {
        self.last_click_time = None;
        self.last_click_pos = None;
        self.last_click_count = 0;
        self.press_pos = None;
        self.dragging = false;
    }

    fn is_dragging(&self, x: u16, y: u16) -> bool {
        let Some((px, py)) = self.press_pos else {
            return false;
        };
        manhattan(px, py, x, y) > self.drag_threshold
    }

    fn release(&mut self, raw: MouseEvent, now: Instant) -> Vec<MouseEvent> {
        let was_dragging = self.dragging;
        self.press_pos = None;
        self.dragging = false;

        let mut out = vec![raw];
        if was_dragging {
            return out;
        }

        let chains = self
            .last_click_time
            .is_some_and(|t| now.duration_since(t) <= self.click_timeout)
            && self
                .last_click_pos
                .is_some_and(|(px, py)| manhattan(px, py, raw.x, raw.y) <= self.click_tolerance);

        self.last_click_count = if chains {
            (self.last_click_count % 3) + 1
        } else {
            1
        };
        self.last_click_time = Some(now);
        self.last_click_pos = Some((raw.x, raw.y));

        let action = match self.last_click_count {
            2 => MouseAction::DoubleClick,
            3 => MouseAction::TripleClick,
            _ => MouseAction::Click,
        };
        out.push(MouseEvent { action, ..raw });
        out
    }
}

impl Default for MouseEnricher {
    fn default() -> Self {
        Self::new()
    }
}

fn manhattan(ax: u16, ay: u16, bx: u16, by: u16) -> u16 {
    ax.abs_diff(bx) + ay.abs_diff(by)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            x,
            y,
            button: MouseButton::Left,
            action: MouseAction::Press,
            modifiers: crate::event::Modifiers::NONE,
        }
    }

    fn release(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            action: MouseAction::Release,
            ..press(x, y)
        }
    }

    fn motion(x: u16, y: u16, button: MouseButton) -> MouseEvent {
        MouseEvent {
            x,
            y,
            button,
            action: MouseAction::Motion,
            modifiers: crate::event::Modifiers::NONE,
        }
    }

    #[test]
    fn simple_click_emits_release_then_click() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(5, 5), now);
        let out = en.process(release(5, 5), now);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].action, MouseAction::Release);
        assert_eq!(out[1].action, MouseAction::Click);
    }

    #[test]
    fn rapid_same_spot_releases_escalate_to_double_click() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(5, 5), now);
        en.process(release(5, 5), now);
        en.process(press(5, 5), now);
        let out = en.process(release(5, 5), now);
        assert_eq!(out[1].action, MouseAction::DoubleClick);
    }

    #[test]
    fn three_rapid_clicks_reach_triple_click() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        let mut out = Vec::new();
        for _ in 0..3 {
            en.process(press(1, 1), now);
            out = en.process(release(1, 1), now);
        }
        assert_eq!(out[1].action, MouseAction::TripleClick);
    }

    #[test]
    fn a_fourth_rapid_click_wraps_back_to_a_single_click() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        for _ in 0..3 {
            en.process(press(1, 1), now);
            en.process(release(1, 1), now);
        }
        en.process(press(1, 1), now);
        let out = en.process(release(1, 1), now);
        assert_eq!(out[1].action, MouseAction::Click);
    }

    #[test]
    fn far_click_resets_chain_to_single() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(1, 1), now);
        en.process(release(1, 1), now);
        en.process(press(50, 50), now);
        let out = en.process(release(50, 50), now);
        assert_eq!(out[1].action, MouseAction::Click);
    }

    #[test]
    fn motion_beyond_threshold_while_held_becomes_drag() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(0, 0), now);
        let out = en.process(motion(5, 5, MouseButton::Left), now);
        assert_eq!(out[0].action, MouseAction::Drag);
    }

    #[test]
    fn small_motion_while_held_stays_motion() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(0, 0), now);
        let out = en.process(motion(1, 0, MouseButton::Left), now);
        assert_eq!(out[0].action, MouseAction::Motion);
    }

    #[test]
    fn release_after_drag_produces_no_click() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(0, 0), now);
        en.process(motion(10, 10, MouseButton::Left), now);
        let out = en.process(release(10, 10), now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, MouseAction::Release);
    }

    #[test]
    fn any_motion_with_no_button_passes_through() {
        let mut en = MouseEnricher::new();
        let out = en.process(motion(3, 3, MouseButton::None), Instant::now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, MouseAction::Motion);
    }

    #[test]
    fn reset_clears_click_chain() {
        let mut en = MouseEnricher::new();
        let now = Instant::now();
        en.process(press(1, 1), now);
        en.process(release(1, 1), now);
        en.reset();
        en.process(press(1, 1), now);
        let out = en.process(release(1, 1), now);
        assert_eq!(out[1].action, MouseAction::Click);
    }
}
