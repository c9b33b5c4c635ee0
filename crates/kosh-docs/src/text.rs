//! # Text Measurement & Wrapping
//!
//! Width-aware text helpers used by the layout engine.
//!
//! ## Wrapping Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "12 Industrial Area, Phase II\nAgra 282006"      max width 120pt       │
//! │                                                                         │
//! │  1. explicit newline        → always a break                            │
//! │  2. words packed greedily   → "12 Industrial Area,"                     │
//! │                               "Phase II"                                │
//! │                               "Agra 282006"                             │
//! │  3. one word wider than the limit is emitted alone, never split        │
//! │  4. blank input             → no lines                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Widths come from the standard Helvetica advance-width tables, which is
//! what the built-in PDF fonts use.

use std::iter::Peekable;
use std::str::{Split, SplitWhitespace};

/// Marker appended to shortened text.
pub const ELLIPSIS: &str = "...";

// =============================================================================
// Measurement
// =============================================================================

/// Measures rendered text width in points.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;
}

/// Advance widths (1/1000 em) for printable ASCII, `' '..='~'`.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for anything outside printable ASCII (same as a digit).
const FALLBACK_WIDTH: u16 = 556;

/// Table-driven metrics for one Helvetica face.
#[derive(Debug, Clone, Copy)]
pub struct StandardMetrics {
    widths: &'static [u16; 95],
}

impl StandardMetrics {
    pub const fn regular() -> Self {
        StandardMetrics { widths: &HELVETICA }
    }

    pub const fn bold() -> Self {
        StandardMetrics {
            widths: &HELVETICA_BOLD,
        }
    }

    fn advance(&self, c: char) -> u16 {
        match c {
            ' '..='~' => self.widths[c as usize - 32],
            _ => FALLBACK_WIDTH,
        }
    }
}

impl TextMeasure for StandardMetrics {
    fn width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c))).sum();
        units as f32 * size / 1000.0
    }
}

// =============================================================================
// Wrapping
// =============================================================================

/// Lazily wraps `text` into lines no wider than `max_width`.
///
/// ## Example
/// ```rust
/// use kosh_docs::text::{wrap_text, StandardMetrics};
///
/// let lines: Vec<String> =
///     wrap_text("Plot 4\nSector 62, Noida", &StandardMetrics::regular(), 9.0, 250.0).collect();
/// assert_eq!(lines, ["Plot 4", "Sector 62, Noida"]);
/// ```
pub fn wrap_text<'a, M: TextMeasure + ?Sized>(
    text: &'a str,
    measure: &'a M,
    size: f32,
    max_width: f32,
) -> WrapLines<'a, M> {
    let segments = if text.trim().is_empty() {
        None
    } else {
        Some(text.split('\n'))
    };
    WrapLines {
        segments,
        words: None,
        measure,
        size,
        max_width,
    }
}

/// Iterator returned by [`wrap_text`].
pub struct WrapLines<'a, M: ?Sized> {
    segments: Option<Split<'a, char>>,
    words: Option<Peekable<SplitWhitespace<'a>>>,
    measure: &'a M,
    size: f32,
    max_width: f32,
}

impl<'a, M: TextMeasure + ?Sized> Iterator for WrapLines<'a, M> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(words) = self.words.as_mut() {
                if let Some(first) = words.next() {
                    let space = self.measure.width(" ", self.size);
                    let mut line = first.to_string();
                    let mut width = self.measure.width(first, self.size);

                    while let Some(next) = words.peek() {
                        let next_width = self.measure.width(next, self.size);
                        if width + space + next_width > self.max_width {
                            break;
                        }
                        line.push(' ');
                        line.push_str(next);
                        width += space + next_width;
                        words.next();
                    }
                    return Some(line);
                }
                self.words = None;
            }

            let segment = self.segments.as_mut()?.next()?;
            let mut words = segment.split_whitespace().peekable();
            if words.peek().is_none() {
                // blank line inside the block keeps its spacing
                return Some(String::new());
            }
            self.words = Some(words);
        }
    }
}

// =============================================================================
// Truncation
// =============================================================================

/// Cuts `text` to at most `max_chars` characters, ending in `...` when cut.
///
/// ## Example
/// ```rust
/// use kosh_docs::text::truncate_chars;
///
/// assert_eq!(truncate_chars("Recycled PET Flakes", 30), "Recycled PET Flakes");
/// assert_eq!(truncate_chars("Recycled PET Flakes", 10), "Recycle...");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < ELLIPSIS.len() {
        // no room for the marker
        return text.chars().take(max_chars).collect();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

/// Shortens `text` until it fits `max_width`, ending in `...` when cut.
pub fn fit_to_width<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    size: f32,
    max_width: f32,
) -> String {
    if measure.width(text, size) <= max_width {
        return text.to_string();
    }

    let budget = max_width - measure.width(ELLIPSIS, size);
    let mut out = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let mut buf = [0u8; 4];
        let w = measure.width(c.encode_utf8(&mut buf), size);
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

/// Keeps the first `max_lines` lines. When any were dropped, the last kept
/// line ends in `...` and still fits `max_width`.
///
/// ## Example
/// ```rust
/// use kosh_docs::text::{clamp_lines, StandardMetrics};
///
/// let lines = ["Plot 4", "Sector 62", "Noida"].map(String::from);
/// let kept = clamp_lines(lines, 2, &StandardMetrics::regular(), 9.0, 250.0);
/// assert_eq!(kept, ["Plot 4", "Sector 62..."]);
/// ```
pub fn clamp_lines<M: TextMeasure + ?Sized>(
    lines: impl IntoIterator<Item = String>,
    max_lines: usize,
    measure: &M,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = lines.into_iter();
    let mut kept: Vec<String> = lines.by_ref().take(max_lines).collect();
    if lines.next().is_none() {
        return kept;
    }

    if let Some(last) = kept.last_mut() {
        let mut cut = last.trim_end().to_string();
        let marked_width = |cut: &str| measure.width(&format!("{cut}{ELLIPSIS}"), size);
        while !cut.is_empty() && marked_width(&cut) > max_width {
            cut.pop();
        }
        cut.truncate(cut.trim_end().len());
        cut.push_str(ELLIPSIS);
        *last = cut;
    }
    kept
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const REGULAR: StandardMetrics = StandardMetrics::regular();

    fn wrap(text: &str, width: f32) -> Vec<String> {
        wrap_text(text, &REGULAR, 10.0, width).collect()
    }

    #[test]
    fn test_widths() {
        // "Hi" = H(722) + i(222)
        assert!((REGULAR.width("Hi", 10.0) - 9.44).abs() < 1e-4);
        assert!((StandardMetrics::bold().width("Hi", 10.0) - 10.0).abs() < 1e-4);
        assert_eq!(REGULAR.width("", 12.0), 0.0);
        assert!((REGULAR.width("₹", 10.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_no_line_exceeds_width() {
        let text = "Part of plot C-39, C-40 and C-41, unnamed road, panchayat headquarter, Etmadpur, Agra";
        for max in [60.0, 120.0, 250.0] {
            let lines = wrap(text, max);
            assert!(lines.len() > 1);
            for line in &lines {
                assert!(REGULAR.width(line, 10.0) <= max, "{line} exceeds {max}");
            }
            assert_eq!(lines.join(" "), text);
        }
    }

    #[test]
    fn test_wrap_respects_newlines() {
        assert_eq!(wrap("Plot 4\nNoida", 500.0), ["Plot 4", "Noida"]);
        assert_eq!(wrap("a\n\nb", 500.0), ["a", "", "b"]);
    }

    #[test]
    fn test_wrap_blank_is_empty() {
        assert!(wrap("", 100.0).is_empty());
        assert!(wrap("  \n ", 100.0).is_empty());
    }

    #[test]
    fn test_wrap_long_word_stands_alone() {
        let lines = wrap("a Supercalifragilisticexpialidocious b", 30.0);
        assert_eq!(lines, ["a", "Supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_wrap_is_lazy() {
        let mut lines = wrap_text("one two three", &REGULAR, 10.0, 20.0);
        assert_eq!(lines.next().as_deref(), Some("one"));
        assert_eq!(lines.next().as_deref(), Some("two"));
        assert_eq!(lines.next().as_deref(), Some("three"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abcdef", 5), "ab...");
        let long = "x".repeat(45);
        assert_eq!(truncate_chars(&long, 30).chars().count(), 30);
    }

    #[test]
    fn test_truncate_chars_below_marker_length() {
        assert_eq!(truncate_chars("abcdef", 3), "...");
        assert_eq!(truncate_chars("abcdef", 2), "ab");
        assert_eq!(truncate_chars("abcdef", 0), "");
        assert_eq!(truncate_chars("ab", 2), "ab");
    }

    #[test]
    fn test_clamp_lines() {
        let lines = || (1..=90).map(|i| format!("Line {i}"));

        let kept = clamp_lines(lines(), 5, &REGULAR, 9.0, 250.0);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[3], "Line 4");
        assert_eq!(kept[4], "Line 5...");

        assert_eq!(clamp_lines(lines().take(3), 5, &REGULAR, 9.0, 250.0).len(), 3);
        assert_eq!(clamp_lines(lines().take(5), 5, &REGULAR, 9.0, 250.0)[4], "Line 5");
        assert!(clamp_lines(lines(), 0, &REGULAR, 9.0, 250.0).is_empty());
    }

    #[test]
    fn test_clamp_lines_full_width_line() {
        // 22 x 4.5pt = 99pt, no room left for the marker
        let lines = vec!["x".repeat(22), "next".to_string()];

        let kept = clamp_lines(lines, 1, &REGULAR, 9.0, 100.0);
        assert!(kept[0].ends_with(ELLIPSIS));
        assert!(REGULAR.width(&kept[0], 9.0) <= 100.0);
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("3915", &REGULAR, 9.0, 56.0), "3915");

        let fitted = fit_to_width("39151000-extra-long-code", &REGULAR, 9.0, 56.0);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(REGULAR.width(&fitted, 9.0) <= 56.0);
    }
}
