//! View-output preprocessing: tab expansion and control-character scrubbing
//! applied to a model's `view()` string before it's segmented into cells.

/// Tab-stop width and control-character policy for [`Preprocessor::process`].
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    tab_width: u8,
}

impl Preprocessor {
    /// Build a preprocessor with the given tab stop width. `0` removes tabs
    /// entirely instead of expanding them.
    #[must_use]
    pub fn new(tab_width: u8) -> Self {
        Self { tab_width }
    }

    /// Expand tabs, then strip control characters, in one pass over `view`.
    #[must_use]
    pub fn process(&self, view: &str) -> String {
        filter_control_chars(&self.expand_tabs(view))
    }

    /// Replace each tab with enough spaces to reach the next tab stop.
    #[must_use]
    pub fn expand_tabs(&self, text: &str) -> String {
        if self.tab_width == 0 {
            return text.replace('\t', "");
        }

        let stop = usize::from(self.tab_width);
        let mut out = String::with_capacity(text.len());
        let mut column = 0usize;

        for ch in text.chars() {
            match ch {
                '\t' => {
                    let spaces = stop - (column % stop);
                    out.extend(std::iter::repeat_n(' ', spaces));
                    column += spaces;
                }
                '\n' => {
                    out.push(ch);
                    column = 0;
                }
                _ => {
                    out.push(ch);
                    column += 1;
                }
            }
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Drop C0/C1 control characters other than tab and newline, which a view
/// may embed incidentally (e.g. content read from an external source).
#[must_use]
pub fn filter_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&ch| {
            ch == '\t' || ch == '\n' || (!ch.is_ascii_control() && !(0x80..=0x9F).contains(&(ch as u32)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_at_column_zero_fills_to_stop() {
        let p = Preprocessor::new(8);
        assert_eq!(p.expand_tabs("\t"), "        ");
    }

    #[test]
    fn tab_after_text_reaches_next_stop() {
        let p = Preprocessor::new(8);
        assert_eq!(p.expand_tabs("abc\t"), "abc     ");
    }

    #[test]
    fn newline_resets_column_tracking() {
        let p = Preprocessor::new(4);
        assert_eq!(p.expand_tabs("abc\n\t"), "abc\n    ");
    }

    #[test]
    fn zero_width_removes_tabs() {
        let p = Preprocessor::new(0);
        assert_eq!(p.expand_tabs("a\tb"), "ab");
    }

    #[test]
    fn filter_strips_c0_and_c1_but_keeps_tab_and_newline() {
        let s = filter_control_chars("a\x07b\tc\nd\u{0085}e");
        assert_eq!(s, "ab\tc\nde");
    }

    #[test]
    fn process_combines_both_passes() {
        let p = Preprocessor::new(4);
        assert_eq!(p.process("a\tb\x07c"), "a   bc");
    }

    #[test]
    fn default_tab_width_is_eight() {
        assert_eq!(Preprocessor::default().expand_tabs("\t").len(), 8);
    }
}
