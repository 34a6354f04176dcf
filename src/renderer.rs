//! The differential renderer: turns a buffer transition, or a line-list
//! transition, into the minimal byte stream a terminal needs to see.

use crate::ansi::Encoder;
use crate::buffer::{Buffer, CellChange};
use crate::style::Style;
use crate::width::segment;

/// Renders frame-to-frame transitions as ANSI byte streams.
///
/// `synchronized_output` wraps each frame in `CSI ?2026h`/`l` (DEC
/// synchronized-output mode) when the terminal supports it, eliminating
/// tearing on slow links; callers detect support out-of-band and pass it
/// in.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    synchronized_output: bool,
}

impl Renderer {
    /// Create a renderer. `synchronized_output` should reflect the target
    /// terminal's support for `CSI ?2026`.
    #[must_use]
    pub fn new(synchronized_output: bool) -> Self {
        Self {
            synchronized_output,
        }
    }

    /// Alt-screen mode: reconcile `next` against `previous`, producing only
    /// the bytes needed to make the terminal's visible content match
    /// `next`, then park the cursor at `cursor`. Both buffers must have
    /// matching dimensions for an incremental diff; a size mismatch yields
    /// a full redraw.
    #[must_use]
    pub fn render_frame(&self, previous: &Buffer, next: &Buffer, cursor: (u16, u16)) -> String {
        let changes = next.diff(previous);
        self.render_changes(&changes, cursor)
    }

    /// Render a pre-computed change list (exposed for callers that already
    /// have one, e.g. from a cached diff), finishing with a move to
    /// `cursor` so the terminal's own cursor always lands where the model
    /// wants it, independent of whichever cell happened to be touched last.
    #[must_use]
    pub fn render_changes(&self, changes: &[CellChange], cursor: (u16, u16)) -> String {
        let mut enc = Encoder::new();
        if self.synchronized_output {
            enc.begin_synchronized();
        }

        for run in dirty_runs(changes) {
            enc.move_to(run.x, run.y);
            for cell in &run.cells {
                enc.set_style(&cell.style);
                enc.write_cluster(&cell.cluster, cell.width);
            }
        }
        enc.reset_style();
        enc.move_to(cursor.0, cursor.1);

        if self.synchronized_output {
            enc.end_synchronized();
        }
        enc.finish()
    }

    /// Inline mode: reconcile a new set of `view()` lines against the
    /// previously displayed lines, in place, without an alternate screen.
    #[must_use]
    pub fn render_inline(&self, previous: &[String], next: &[String], style: Style) -> String {
        let mut enc = Encoder::new();

        for (i, line) in next.iter().enumerate() {
            let changed = previous.get(i).is_none_or(|p| p != line);
            if !changed {
                continue;
            }
            enc.move_to(0, i as u16);
            enc.clear_line();
            enc.set_style(&style);
            for g in segment(line) {
                enc.write_cluster(g.cluster, g.width);
            }
        }

        for i in next.len()..previous.len() {
            enc.move_to(0, i as u16);
            enc.clear_line();
        }

        enc.reset_style();
        enc.finish()
    }
}

struct Run {
    x: u16,
    y: u16,
    cells: Vec<crate::cell::Cell>,
}

/// Group changed cells into maximal contiguous same-row runs so the
/// encoder only needs one cursor move per run instead of per cell.
fn dirty_runs(changes: &[CellChange]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for change in changes {
        if change.cell.width == 0 {
            // Continuation cells never produce their own output; the
            // preceding wide cell's write already advanced the cursor
            // across them.
            continue;
        }

        if let Some(run) = runs.last_mut() {
            let run_end = run.x + run.cells.iter().map(|c| u16::from(c.width)).sum::<u16>();
            if run.y == change.y && run_end == change.x {
                run.cells.push(change.cell.clone());
                continue;
            }
        }

        runs.push(Run {
            x: change.x,
            y: change.y,
            cells: vec![change.cell.clone()],
        });
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn identical_buffers_still_position_the_cursor() {
        let buf = Buffer::new(5, 1);
        let r = Renderer::new(false);
        assert_eq!(r.render_frame(&buf, &buf, (2, 0)), "\x1b[1;3H");
    }

    #[test]
    fn single_changed_cell_moves_and_writes() {
        let mut prev = Buffer::new(5, 1);
        prev.write_string(0, 0, "Hello", Style::default());
        let mut next = prev.clone();
        next.put(1, 0, "a", Style::default());

        let r = Renderer::new(false);
        let out = r.render_frame(&prev, &next, (0, 0));
        assert_eq!(out, "\x1b[1;2Ha\x1b[1;1H");
    }

    #[test]
    fn adjacent_changes_batch_into_one_move() {
        let prev = Buffer::new(5, 1);
        let mut next = prev.clone();
        next.write_string(0, 0, "abc", Style::default());

        let r = Renderer::new(false);
        let out = r.render_frame(&prev, &next, (4, 0));
        assert_eq!(out.matches("\x1b[1;1H").count(), 1);
        assert!(out.contains("abc"));
        assert!(out.ends_with("\x1b[1;5H"));
    }

    #[test]
    fn style_change_emits_sgr_between_cells() {
        let prev = Buffer::new(3, 1);
        let mut next = prev.clone();
        next.put(0, 0, "a", Style::new().fg(Color::Ansi16(1)));

        let r = Renderer::new(false);
        let out = r.render_frame(&prev, &next, (2, 0));
        assert!(out.contains("31m"));
        assert!(out.contains('a'));
        assert!(out.ends_with("\x1b[1;3H"));
    }

    #[test]
    fn synchronized_output_wraps_frame() {
        let prev = Buffer::new(3, 1);
        let mut next = prev.clone();
        next.put(0, 0, "a", Style::default());

        let r = Renderer::new(true);
        let out = r.render_frame(&prev, &next, (0, 0));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn continuation_cells_produce_no_extra_output() {
        let prev = Buffer::new(5, 1);
        let mut next = prev.clone();
        next.put(0, 0, "世", Style::default());

        let r = Renderer::new(false);
        let out = r.render_frame(&prev, &next, (2, 0));
        assert_eq!(out.matches("\x1b[1;1H").count(), 1);
        assert_eq!(out.matches('H').count(), 1);
    }

    #[test]
    fn inline_mode_skips_unchanged_lines() {
        let r = Renderer::new(false);
        let prev = vec!["a".to_string(), "b".to_string()];
        let next = vec!["a".to_string(), "c".to_string()];
        let out = r.render_inline(&prev, &next, Style::default());
        assert!(!out.contains('a'));
        assert!(out.contains('c'));
    }

    #[test]
    fn inline_mode_clears_shrinking_tail() {
        let r = Renderer::new(false);
        let prev = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let next = vec!["a".to_string()];
        let out = r.render_inline(&prev, &next, Style::default());
        assert!(out.contains("\x1b[2K"));
    }
}
