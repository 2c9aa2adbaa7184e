// Page layout engine: a square picture book built from story text and artwork.
// Planning (plan.rs) is pure; canvas.rs owns the PDF surface.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod font_metrics;
pub mod geometry;
pub mod organic;
pub mod plan;
pub mod text_fit;
pub mod theme;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::models::StoryText;
use canvas::PdfCanvas;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a story page shows when its artwork is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingArtwork {
    /// Empty white frame.
    #[default]
    Blank,
    /// Light gray box inside the frame.
    GrayBox,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub organic_edges: bool,
    pub missing_artwork: MissingArtwork,
}

/// Everything the layout engine needs for one book.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub title: String,
    pub story: StoryText,
    /// Index `i` is the artwork for story segment `i`.
    pub illustrations: Vec<Option<PathBuf>>,
    pub end_message: String,
    pub cover_image: Option<PathBuf>,
    pub theme_color: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub page_count: usize,
    pub output: PathBuf,
}

/// Plans and writes the book described by `job`.
pub fn try_render(job: &RenderJob, options: &LayoutOptions) -> Result<RenderSummary, LayoutError> {
    let scratch_dir = scratch_dir_for(&job.output);
    let mut canvas = PdfCanvas::new(scratch_dir);
    let book = plan::plan_book(job, options, canvas.capabilities())?;
    canvas.paint_book(&book)?;
    let page_count = canvas.finish(&job.output)?;

    info!(
        "Rendered {} pages ({} story) to {}",
        page_count,
        book.story_page_count(),
        job.output.display()
    );
    Ok(RenderSummary {
        page_count,
        output: job.output.clone(),
    })
}

/// `true` when the PDF was written. Failures are logged, never raised.
pub fn render(job: &RenderJob, options: &LayoutOptions) -> bool {
    match try_render(job, options) {
        Ok(_) => true,
        Err(e) => {
            error!("Failed to render {}: {}", job.output.display(), e);
            false
        }
    }
}

/// Masked temp copies go next to the output file.
fn scratch_dir_for(output: &Path) -> PathBuf {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
