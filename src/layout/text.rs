use crate::surface::{DrawingSurface, TextSpan};
use crate::theme::FontSpec;

use super::{BoundingBox, LabelBlock};

pub const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    /// Content was dropped and the last line ends in an ellipsis.
    pub truncated: bool,
}

/// Greedy word wrap into at most `max_lines` lines.
///
/// Words are never split. Lines before the last may exceed `max_width` when a
/// single word is wider than it; the last slot is ellipsized instead whenever
/// it overflows or words are left over.
pub fn wrap_text<F>(text: &str, max_width: f32, max_lines: usize, mut measure: F) -> WrappedText
where
    F: FnMut(&str) -> f32,
{
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || max_lines == 0 {
        return WrappedText::default();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut next = 0;
    while next < words.len() {
        let word = words[next];
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
            next += 1;
            continue;
        }
        if lines.len() + 1 >= max_lines {
            break;
        }
        lines.push(std::mem::take(&mut current));
    }

    let leftover = next < words.len();
    let in_last_slot = lines.len() + 1 == max_lines;
    let overflowing = in_last_slot && measure(&current) > max_width;
    let truncated = leftover || overflowing;
    if truncated {
        current = ellipsize(current, max_width, &mut measure);
    }
    lines.push(current);

    WrappedText { lines, truncated }
}

fn ellipsize<F>(mut line: String, max_width: f32, measure: &mut F) -> String
where
    F: FnMut(&str) -> f32,
{
    while !line.is_empty() && measure(&format!("{line}{ELLIPSIS}")) > max_width {
        line.pop();
    }
    let mut out = line.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Union of the year and title line boxes; a zero-size box at the anchor when
/// the label has no visible text.
pub(super) fn label_bounds(
    label: &LabelBlock,
    year_font: FontSpec,
    label_font: FontSpec,
    surface: &mut dyn DrawingSurface,
) -> BoundingBox {
    let (year_x, year_y) = label.year_position();
    let mut bounds = surface.bounding_box_of(&TextSpan {
        text: &label.year,
        x: year_x,
        y: year_y,
        anchor: label.text_anchor,
        font: year_font,
    });
    for (idx, line) in label.lines.iter().enumerate() {
        let (x, y) = label.line_position(idx);
        let line_box = surface.bounding_box_of(&TextSpan {
            text: line,
            x,
            y,
            anchor: label.text_anchor,
            font: label_font,
        });
        bounds = match (bounds, line_box) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
    }
    bounds.unwrap_or(BoundingBox::new(label.anchor.0, label.anchor.1, 0.0, 0.0))
}
