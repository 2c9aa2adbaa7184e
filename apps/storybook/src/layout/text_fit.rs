//! Greedy word wrap and the auto-fit font-size search.
//!
//! # Estimation
//! Block height is `line_count × size_pt × LINE_HEIGHT_MM_PER_PT`. The ratio is
//! an empirical leading (about 1.4× the em in millimetres) and is the same one
//! used when the lines are placed, so a block that "fits" here also fits on
//! the page.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFace, FontMetricTable};

/// Line advance in millimetres per point of font size.
pub const LINE_HEIGHT_MM_PER_PT: f32 = 0.5;

/// Candidate sizes for the search: `max_pt, max_pt - step_pt, …, min_pt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitBounds {
    pub max_pt: f32,
    pub min_pt: f32,
    pub step_pt: f32,
}

impl FitBounds {
    /// Candidate sizes from largest to smallest. Always ends at `min_pt`.
    pub fn candidates(&self) -> Vec<f32> {
        let span = (self.max_pt - self.min_pt).max(0.0);
        let steps = if self.step_pt > 0.0 {
            (span / self.step_pt).floor() as usize
        } else {
            0
        };
        let mut sizes: Vec<f32> = (0..=steps)
            .map(|i| self.max_pt - i as f32 * self.step_pt)
            .collect();
        if sizes.last().map_or(true, |last| (*last - self.min_pt).abs() > 1e-4) {
            sizes.push(self.min_pt);
        }
        sizes
    }
}

/// Text wrapped at a chosen size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedText {
    pub size_pt: f32,
    pub lines: Vec<String>,
    /// Whether the block fits the available height at `size_pt`.
    pub fits: bool,
}

impl FittedText {
    pub fn height_mm(&self) -> f32 {
        block_height_mm(self.lines.len(), self.size_pt)
    }
}

pub fn block_height_mm(line_count: usize, size_pt: f32) -> f32 {
    line_count as f32 * line_advance_mm(size_pt)
}

pub fn line_advance_mm(size_pt: f32) -> f32 {
    size_pt * LINE_HEIGHT_MM_PER_PT
}

/// Greedy word wrap at `max_width_mm`.
///
/// Explicit line breaks are kept: each input line wraps independently, and a
/// blank input line stays blank. A single word wider than the line gets a
/// line of its own rather than being split.
pub fn wrap_text(text: &str, face: FontFace, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let metrics = get_metrics(face);
    let mut lines = Vec::new();
    for source_line in text.trim().lines() {
        wrap_line(source_line, metrics, size_pt, max_width_mm, &mut lines);
    }
    lines
}

fn wrap_line(
    line: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
    out: &mut Vec<String>,
) {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        out.push(String::new());
        return;
    }

    let space_w = metrics.space_mm(size_pt);
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let word_w = metrics.measure_mm(word, size_pt);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_mm {
            // Line is full, start a new one with this word.
            out.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    out.push(current);
}

/// Auto-fit font search.
///
/// Walks the candidates from largest to smallest and returns the first size
/// whose wrapped block fits `max_height_mm`. If none fits, the minimum size is
/// returned with `fits = false`.
pub fn fit_text(
    text: &str,
    face: FontFace,
    max_width_mm: f32,
    max_height_mm: f32,
    bounds: &FitBounds,
) -> FittedText {
    let mut last = FittedText {
        size_pt: bounds.min_pt,
        lines: Vec::new(),
        fits: false,
    };
    for size_pt in bounds.candidates() {
        let lines = wrap_text(text, face, size_pt, max_width_mm);
        let fits = block_height_mm(lines.len(), size_pt) <= max_height_mm;
        last = FittedText {
            size_pt,
            lines,
            fits,
        };
        if fits {
            break;
        }
    }
    last
}
