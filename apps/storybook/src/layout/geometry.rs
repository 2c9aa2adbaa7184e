//! Page geometry in millimetres, origin at the top-left corner.

use serde::{Deserialize, Serialize};

/// Side of the square page.
pub const PAGE_SIZE_MM: f32 = 210.0;
/// Side of the white illustration frame.
pub const FRAME_SIZE_MM: f32 = 140.0;
/// Distance from the top edge to the frame.
pub const FRAME_TOP_MM: f32 = 12.0;
/// Padding between the frame edge and the illustration.
pub const FRAME_PADDING_MM: f32 = 6.0;
pub const FRAME_CORNER_RADIUS_MM: f32 = 8.0;
/// Gap between the frame and the story text.
pub const TEXT_GAP_MM: f32 = 4.0;
pub const TEXT_SIDE_MARGIN_MM: f32 = 15.0;
/// Story text must end this far above the bottom edge (the footer lives below).
pub const TEXT_BOTTOM_MARGIN_MM: f32 = 18.0;
/// Baseline of the page-number footer, measured from the bottom edge.
pub const FOOTER_BASELINE_FROM_BOTTOM_MM: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn full_page() -> Self {
        Self::new(0.0, 0.0, PAGE_SIZE_MM, PAGE_SIZE_MM)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrinks the rectangle by `by` on every side.
    pub fn inset(&self, by: f32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.w - 2.0 * by).max(0.0),
            (self.h - 2.0 * by).max(0.0),
        )
    }

    /// A `w × h` rectangle centred inside `self`.
    pub fn centered(&self, w: f32, h: f32) -> Self {
        Self::new(self.x + (self.w - w) / 2.0, self.y + (self.h - h) / 2.0, w, h)
    }

    #[cfg(test)]
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.w <= self.x + self.w + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// The white bookplate frame on every story page.
pub fn story_frame() -> Rect {
    Rect::new(
        (PAGE_SIZE_MM - FRAME_SIZE_MM) / 2.0,
        FRAME_TOP_MM,
        FRAME_SIZE_MM,
        FRAME_SIZE_MM,
    )
}

/// The region below the frame available to the story text.
pub fn story_text_region() -> Rect {
    let top = story_frame().bottom() + TEXT_GAP_MM;
    Rect::new(
        TEXT_SIDE_MARGIN_MM,
        top,
        PAGE_SIZE_MM - 2.0 * TEXT_SIDE_MARGIN_MM,
        PAGE_SIZE_MM - TEXT_BOTTOM_MARGIN_MM - top,
    )
}

/// Largest `(w, h)` with the source aspect ratio that fits in `(max_w, max_h)`.
///
/// With `ratio = px_h / px_w`: if the width-limited height would overflow, the
/// height is the binding side; otherwise the width is. One side always
/// touches its bound exactly.
pub fn fit_aspect(px_w: u32, px_h: u32, max_w: f32, max_h: f32) -> (f32, f32) {
    if px_w == 0 || px_h == 0 {
        return (0.0, 0.0);
    }
    let ratio = px_h as f32 / px_w as f32;
    if max_w * ratio > max_h {
        (max_h / ratio, max_h)
    } else {
        (max_w, max_w * ratio)
    }
}

/// Where an image of `px_w × px_h` pixels goes inside `frame` (after padding).
pub fn place_in_frame(px_w: u32, px_h: u32, frame: &Rect, padding: f32) -> Rect {
    let area = frame.inset(padding);
    let (w, h) = fit_aspect(px_w, px_h, area.w, area.h);
    area.centered(w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fit(px_w: u32, px_h: u32, max_w: f32, max_h: f32) {
        let (w, h) = fit_aspect(px_w, px_h, max_w, max_h);
        let source = px_w as f32 / px_h as f32;
        assert!((w / h - source).abs() < 1e-3, "ratio drift for {px_w}x{px_h}");
        assert!(w <= max_w + 1e-3 && h <= max_h + 1e-3, "overflow for {px_w}x{px_h}");
        assert!(
            (w - max_w).abs() < 1e-3 || (h - max_h).abs() < 1e-3,
            "no side touches bound for {px_w}x{px_h}: {w}x{h}"
        );
    }

    #[test]
    fn test_fit_aspect_preserves_ratio_and_touches_a_bound() {
        for (px_w, px_h) in [(1024, 1024), (1920, 1080), (1080, 1920), (300, 299), (7, 5000)] {
            assert_fit(px_w, px_h, 138.0, 138.0);
            assert_fit(px_w, px_h, 190.0, 140.0);
            assert_fit(px_w, px_h, 60.0, 200.0);
        }
    }

    #[test]
    fn test_fit_aspect_tall_image_is_height_bound() {
        let (w, h) = fit_aspect(500, 1000, 138.0, 138.0);
        assert_eq!(h, 138.0);
        assert!((w - 69.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_aspect_wide_image_is_width_bound() {
        let (w, h) = fit_aspect(1000, 500, 138.0, 138.0);
        assert_eq!(w, 138.0);
        assert!((h - 69.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_aspect_degenerate_image() {
        assert_eq!(fit_aspect(0, 10, 100.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_place_in_frame_is_centered_inside_padding() {
        let frame = story_frame();
        let placed = place_in_frame(1600, 900, &frame, FRAME_PADDING_MM);
        assert!(frame.inset(FRAME_PADDING_MM).contains(&placed));
        let frame_cx = frame.x + frame.w / 2.0;
        let frame_cy = frame.y + frame.h / 2.0;
        assert!((placed.x + placed.w / 2.0 - frame_cx).abs() < 1e-3);
        assert!((placed.y + placed.h / 2.0 - frame_cy).abs() < 1e-3);
    }

    #[test]
    fn test_frame_is_centered_square_within_page() {
        let frame = story_frame();
        assert_eq!(frame.w, frame.h);
        assert!(frame.w < PAGE_SIZE_MM);
        assert!((frame.x - (PAGE_SIZE_MM - frame.x - frame.w)).abs() < 1e-4);
    }

    #[test]
    fn test_text_region_sits_between_frame_and_bottom_margin() {
        let region = story_text_region();
        assert!(region.y > story_frame().bottom());
        assert!((region.bottom() - (PAGE_SIZE_MM - TEXT_BOTTOM_MARGIN_MM)).abs() < 1e-4);
        assert!(region.h > 0.0);
    }
}
