//! Grapheme cluster segmentation and display-width accounting.
//!
//! This is the layer the cell grid relies on to turn a `view()` string into
//! individually placeable units: Unicode extended grapheme clusters (UAX
//! #29), each tagged with its display width under East Asian Width (UAX
//! #11), with emoji-presentation and skin-tone overrides layered on top.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// One grapheme cluster and the byte offset it starts at within the
/// original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grapheme<'a> {
    /// Byte offset of the cluster's first byte in the source string.
    pub start_byte: usize,
    /// The cluster's text.
    pub cluster: &'a str,
    /// Display width in terminal columns (0, 1, or 2).
    pub width: u8,
}

/// Variation selector that forces emoji presentation (width 2).
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Skin-tone modifiers join with the preceding emoji base; together they
/// always render as a single width-2 glyph.
fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

/// Segment `s` into grapheme clusters with their display widths.
///
/// The concatenation of every `cluster` in the returned sequence equals
/// `s` exactly.
#[must_use]
pub fn segment(s: &str) -> Vec<Grapheme<'_>> {
    s.grapheme_indices(true)
        .map(|(start_byte, cluster)| Grapheme {
            start_byte,
            cluster,
            width: cluster_width(cluster),
        })
        .collect()
}

/// Display width of a single already-segmented grapheme cluster.
#[must_use]
pub fn cluster_width(cluster: &str) -> u8 {
    if cluster.is_empty() {
        return 0;
    }

    if cluster.ends_with(VARIATION_SELECTOR_16) || cluster.chars().any(is_skin_tone_modifier) {
        return 2;
    }

    let base_width = UnicodeWidthStr::width(cluster);
    // Ambiguous-width codepoints (UAX #11 category `A`) are reported as 1
    // by `unicode-width`'s default non-CJK profile, which matches this
    // oracle's treatment; East Asian Wide/Fullwidth report as 2 already.
    match base_width {
        0 => 0,
        w if w >= 2 => 2,
        _ => 1,
    }
}

/// Total display width of a string, summed over its grapheme clusters.
#[must_use]
pub fn width(s: &str) -> u16 {
    segment(s).iter().map(|g| u16::from(g.width)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_clusters_are_width_one() {
        let g = segment("abc");
        assert_eq!(g.len(), 3);
        assert!(g.iter().all(|c| c.width == 1));
    }

    #[test]
    fn concatenation_round_trips() {
        let s = "Hello 👋 World 🌍";
        let g = segment(s);
        let rebuilt: String = g.iter().map(|c| c.cluster).collect();
        assert_eq!(rebuilt, s);
    }

    #[test]
    fn cjk_is_width_two() {
        let g = segment("世界");
        assert_eq!(g.len(), 2);
        assert_eq!(g[0].width, 2);
        assert_eq!(g[1].width, 2);
    }

    #[test]
    fn combining_mark_joins_base() {
        // "e" + combining acute accent (U+0301)
        let s = "e\u{0301}";
        let g = segment(s);
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].width, 1);
    }

    #[test]
    fn emoji_with_variation_selector_is_width_two() {
        let s = "\u{2764}\u{FE0F}"; // heavy black heart + VS16
        let g = segment(s);
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].width, 2);
    }

    #[test]
    fn skin_tone_modifier_joins_base_as_width_two() {
        let s = "\u{1F44D}\u{1F3FB}"; // thumbs up + light skin tone
        let g = segment(s);
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].width, 2);
    }

    #[test]
    fn width_sums_cluster_widths() {
        let s = "Hello 👋 World 🌍";
        let total: u16 = segment(s).iter().map(|c| u16::from(c.width)).sum();
        assert_eq!(width(s), total);
    }

    #[test]
    fn malformed_cluster_never_panics() {
        // Not truly malformed (Rust &str is always valid UTF-8), but exercise
        // the empty-cluster edge case explicitly.
        assert_eq!(cluster_width(""), 0);
    }
}
