//! The atomic unit of the screen grid.

use crate::style::Style;
use crate::width::cluster_width;

/// One grid position: a single grapheme cluster plus its style.
///
/// A width-2 cluster (most CJK ideographs, many emoji) occupies this cell
/// and the one immediately to its right, which holds [`Cell::continuation`]
/// instead of its own cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The grapheme cluster occupying this cell. Empty for continuation
    /// cells.
    pub cluster: String,
    /// Display width: 1 or 2 for a primary cell, 0 for a continuation cell.
    pub width: u8,
    /// Visual style.
    pub style: Style,
}

impl Cell {
    /// Build a cell from a single grapheme cluster and a style.
    ///
    /// `cluster` must already be a single grapheme cluster (as produced by
    /// [`crate::width::segment`]); this constructor does not itself
    /// re-segment multi-cluster input.
    #[must_use]
    pub fn new(cluster: impl Into<String>, style: Style) -> Self {
        let cluster = cluster.into();
        let width = cluster_width(&cluster);
        Self {
            cluster,
            width,
            style,
        }
    }

    /// A blank cell: one space, default style, width 1.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            cluster: " ".to_string(),
            width: 1,
            style: Style::default(),
        }
    }

    /// The continuation sentinel placed to the right of a width-2 cell.
    /// Never rendered on its own.
    #[must_use]
    pub fn continuation() -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            style: Style::default(),
        }
    }

    /// True if this cell is blank (a single default-styled space).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cluster == " " && self.width == 1 && self.style.is_empty()
    }

    /// True if this cell occupies two columns.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.width == 2
    }

    /// True if this cell is the right half of a width-2 cell.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_default() {
        let c = Cell::blank();
        assert_eq!(c.cluster, " ");
        assert_eq!(c.width, 1);
        assert!(c.is_blank());
    }

    #[test]
    fn continuation_has_zero_width() {
        let c = Cell::continuation();
        assert!(c.is_continuation());
        assert_eq!(c.width, 0);
    }

    #[test]
    fn ascii_cell_is_width_one() {
        let c = Cell::new("a", Style::default());
        assert_eq!(c.width, 1);
        assert!(!c.is_wide());
    }

    #[test]
    fn cjk_cell_is_wide() {
        let c = Cell::new("世", Style::default());
        assert_eq!(c.width, 2);
        assert!(c.is_wide());
    }

    #[test]
    fn emoji_family_cluster_is_wide() {
        // Man + ZWJ + Woman + ZWJ + Girl, one grapheme cluster.
        let c = Cell::new("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}", Style::default());
        assert!(c.is_wide());
    }

    #[test]
    fn styled_cell_is_not_blank() {
        let c = Cell::new(" ", Style::new().bold(true));
        assert!(!c.is_blank());
    }

    #[test]
    fn equality_is_structural() {
        let a = Cell::new("x", Style::default());
        let b = Cell::new("x", Style::default());
        assert_eq!(a, b);
    }
}
