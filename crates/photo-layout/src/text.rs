//! Word wrapping and line placement for drawing text annotations
//!
//! Raster and PDF output have no native wrapping, so text boxes are broken
//! into lines here with a caller-supplied width measurement.

use crate::constants::{HELVETICA_CHAR_WIDTH_RATIO, LINE_HEIGHT_FACTOR};
use crate::geometry::{Rect, Space};
use serde::{Deserialize, Serialize};

/// Writing direction of a text annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    #[default]
    Rtl,
}

/// Width of a run of text in the caller's unit
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn measure(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Approximate measurement: every character is `ratio * font_size` wide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthMeasure {
    pub font_size: f64,
    pub ratio: f64,
}

impl CharWidthMeasure {
    pub fn helvetica(font_size: f64) -> Self {
        Self {
            font_size,
            ratio: HELVETICA_CHAR_WIDTH_RATIO,
        }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn measure(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * self.ratio
    }
}

/// Greedy word wrap.
///
/// Newlines always break. Within a line, words are appended one at a time
/// while the measured width stays within `max_width`; a word that does not
/// fit starts the next line. Words are never split, so a single word wider
/// than `max_width` sits alone on an overlong line.
pub fn wrap_text(text: &str, max_width: f64, measure: &impl TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split(' ').filter(|w| !w.is_empty());
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{} {}", current, word);
            if measure.measure(&candidate) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }

    lines
}

/// A wrapped line with its anchor point
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub text: String,
    /// Left edge for LTR text, right edge for RTL text
    pub x: f64,
    /// Baseline, measured downward from the top of the space
    pub baseline: f64,
}

/// Wrap `text` to the width of `rect` and place each line.
///
/// The first baseline sits one font size below the top of the box and the
/// following ones are `size * 1.2` apart.
pub fn layout_text_block<S: Space>(
    text: &str,
    rect: &Rect<S>,
    size: f64,
    direction: Direction,
    measure: &impl TextMeasure,
) -> Vec<PositionedLine> {
    let x = match direction {
        Direction::Rtl => rect.right(),
        Direction::Ltr => rect.x,
    };
    let line_height = size * LINE_HEIGHT_FACTOR;

    wrap_text(text, rect.width, measure)
        .into_iter()
        .enumerate()
        .map(|(i, line)| PositionedLine {
            text: line,
            x,
            baseline: rect.y + size + i as f64 * line_height,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OriginalSpace;

    fn per_char(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap_text("the quick brown fox", 10.0, &per_char);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_long_word_alone() {
        let lines = wrap_text("a extraordinarily b", 5.0, &per_char);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn test_wrap_hard_breaks_and_blank_lines() {
        let lines = wrap_text("one\n\ntwo  three", 100.0, &per_char);
        assert_eq!(lines, vec!["one", "", "two three"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10.0, &per_char), vec![String::new()]);
    }

    #[test]
    fn test_char_width_measure() {
        let m = CharWidthMeasure::helvetica(10.0);
        assert_eq!(m.measure("abcd"), 20.0);
    }

    #[test]
    fn test_layout_rtl_block() {
        let rect = Rect::<OriginalSpace>::new(10.0, 20.0, 9.0, 100.0);
        let lines = layout_text_block("aaa bbb ccc", &rect, 10.0, Direction::Rtl, &per_char);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "aaa bbb");
        assert_eq!(lines[0].x, 19.0);
        assert_eq!(lines[0].baseline, 30.0);
        assert_eq!(lines[1].baseline, 42.0);

        let ltr = layout_text_block("aaa", &rect, 10.0, Direction::Ltr, &per_char);
        assert_eq!(ltr[0].x, 10.0);
    }
}
