//! Label measurement and wrapping.

use unicode_width::UnicodeWidthStr;

use crate::model::{LabelAnchor, LabelLayout};

/// Labels wider than this are wrapped onto several lines.
pub const MAX_LABEL_WIDTH: f64 = 140.0;
/// Horizontal gap between the node center and its label.
pub const LABEL_OFFSET: f64 = 18.0;
/// Line advance of wrapped labels, in `em`.
pub const LINE_HEIGHT_EM: f64 = 1.1;
/// Baseline shift that vertically centers a single line, in `em`.
pub const BASELINE_EM: f64 = 0.32;

pub trait TextMeasurer {
    fn measure_width(&self, text: &str, font_size: f64) -> f64;
}

/// Width from display columns, so the same text always measures the same without fonts.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    /// Pixels per column at a 12px font.
    pub column_width: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self { column_width: 7.0 }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure_width(&self, text: &str, font_size: f64) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.column_width * (font_size / 12.0)
    }
}

pub fn font_size_for_depth(depth: usize) -> f64 {
    match depth {
        0 => 16.0,
        1 => 14.0,
        _ => 12.0,
    }
}

pub fn font_weight_for_depth(depth: usize) -> u16 {
    if depth == 0 { 700 } else { 600 }
}

/// Places and wraps the label of a node.
///
/// Parents put their label on the left (anchored at its end), leaves on the right. Labels
/// shorter than 20 characters and 4 words stay on one line; longer ones are broken greedily at
/// word boundaries once a line exceeds [`MAX_LABEL_WIDTH`].
pub fn layout_label(
    name: &str,
    depth: usize,
    has_children: bool,
    measurer: &dyn TextMeasurer,
) -> LabelLayout {
    let (anchor, offset_x) = if has_children {
        (LabelAnchor::End, -LABEL_OFFSET)
    } else {
        (LabelAnchor::Start, LABEL_OFFSET)
    };
    let font_size = font_size_for_depth(depth);
    let lines = wrap_words(name, font_size, measurer);
    let width = lines
        .iter()
        .map(|l| measurer.measure_width(l, font_size))
        .fold(0.0, f64::max);

    LabelLayout {
        anchor,
        offset_x,
        font_size,
        font_weight: font_weight_for_depth(depth),
        lines,
        width,
    }
}

fn wrap_words(text: &str, font_size: f64, measurer: &dyn TextMeasurer) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if text.chars().count() < 20 && words.len() < 4 {
        return vec![text.to_string()];
    }
    let Some((first, rest)) = words.split_first() else {
        return vec![text.to_string()];
    };

    let mut lines = Vec::new();
    let mut line = vec![*first];
    for word in rest {
        line.push(word);
        if measurer.measure_width(&line.join(" "), font_size) > MAX_LABEL_WIDTH {
            line.pop();
            lines.push(line.join(" "));
            line = vec![*word];
        }
    }
    lines.push(line.join(" "));
    lines
}

/// `dy` of the first line so that a block of `line_count` lines is centered on the node.
pub fn first_line_dy_em(line_count: usize) -> f64 {
    BASELINE_EM - (line_count.saturating_sub(1) as f64 * LINE_HEIGHT_EM / 2.0)
}
