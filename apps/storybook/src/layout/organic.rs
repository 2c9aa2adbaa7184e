//! Organic edge mode: an irregular, hand-cut silhouette for illustrations.
//!
//! The outline is generated once from a fixed seed in normalized coordinates,
//! so every illustration in every book gets the same wobble. The mask is
//! rasterized at the image's own resolution and written, with the image, to
//! a temporary PNG that is removed when the returned handle is dropped.

use std::path::Path;

use image::{GrayImage, Luma, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

use crate::layout::LayoutError;

/// Seed for the outline; changing it changes every book's look.
pub const ORGANIC_SEED: u64 = 42;
const VERTEX_COUNT: usize = 48;
/// Base radius of the outline as a fraction of the half-extent.
const BASE_RADIUS: f32 = 0.94;
/// Maximum radial jitter as a fraction of the half-extent.
const RADIUS_JITTER: f32 = 0.04;

/// The fixed outline, as points in the unit square `[0, 1] × [0, 1]`.
pub fn organic_outline() -> Vec<(f32, f32)> {
    let mut rng = StdRng::seed_from_u64(ORGANIC_SEED);
    (0..VERTEX_COUNT)
        .map(|i| {
            let angle = i as f32 / VERTEX_COUNT as f32 * std::f32::consts::TAU;
            let radius = BASE_RADIUS + rng.gen_range(-RADIUS_JITTER..=RADIUS_JITTER);
            (
                0.5 + 0.5 * radius * angle.cos(),
                0.5 + 0.5 * radius * angle.sin(),
            )
        })
        .collect()
}

/// Rasterizes the outline into a `width × height` alpha mask (255 inside, 0 outside).
///
/// Even-odd scanline fill sampled at pixel centres.
pub fn organic_mask(width: u32, height: u32) -> GrayImage {
    let outline: Vec<(f32, f32)> = organic_outline()
        .into_iter()
        .map(|(x, y)| (x * width as f32, y * height as f32))
        .collect();
    let mut mask = GrayImage::new(width, height);
    let mut crossings: Vec<f32> = Vec::with_capacity(outline.len());

    for row in 0..height {
        let sy = row as f32 + 0.5;
        crossings.clear();
        for (i, &(x0, y0)) in outline.iter().enumerate() {
            let (x1, y1) = outline[(i + 1) % outline.len()];
            if (y0 <= sy && y1 > sy) || (y1 <= sy && y0 > sy) {
                crossings.push(x0 + (sy - y0) / (y1 - y0) * (x1 - x0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0) as u32;
            let end = ((span[1] - 0.5).floor() as i64).min(width as i64 - 1);
            if end < start as i64 {
                continue;
            }
            for col in start..=end as u32 {
                mask.put_pixel(col, row, Luma([255]));
            }
        }
    }
    mask
}

/// Writes a masked RGBA copy of the image at `source` to a temporary PNG.
///
/// Dropping the returned file deletes it.
pub fn masked_copy(source: &Path, scratch_dir: &Path) -> Result<NamedTempFile, LayoutError> {
    let mut rgba: RgbaImage = image::open(source)?.to_rgba8();
    let mask = organic_mask(rgba.width(), rgba.height());
    for (pixel, alpha) in rgba.pixels_mut().zip(mask.pixels()) {
        // Keep any transparency the source already had.
        pixel[3] = pixel[3].min(alpha[0]);
    }

    let file = tempfile::Builder::new()
        .prefix("organic_")
        .suffix(".png")
        .tempfile_in(scratch_dir)?;
    rgba.save_with_format(file.path(), image::ImageFormat::Png)?;
    Ok(file)
}
