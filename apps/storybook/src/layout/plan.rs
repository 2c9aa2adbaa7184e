//! Book planning: turns a render job into per-page geometry.
//!
//! # Page order
//! 1. Front cover: cover pattern (or theme fill), white bookplate, title.
//! 2. One story page per text segment: theme fill, white frame, artwork
//!    (aspect-fit and centred), auto-fitted text below the frame.
//! 3. Back cover, only when an end message is present: cover pattern (or theme
//!    fill) with the end message and no bookplate.
//!
//! Every page except the first and the last carries a `Page N` footer where
//! `N = page_number - 1`.
//!
//! Planning is pure apart from reading image headers for pixel sizes; all
//! drawing happens in `canvas`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::layout::canvas::Capabilities;
use crate::layout::font_metrics::{get_metrics, FontFace, PT_TO_MM};
use crate::layout::geometry::{
    place_in_frame, story_frame, story_text_region, Rect, FOOTER_BASELINE_FROM_BOTTOM_MM,
    FRAME_CORNER_RADIUS_MM, FRAME_PADDING_MM, PAGE_SIZE_MM,
};
use crate::layout::text_fit::{fit_text, line_advance_mm, FitBounds, FittedText};
use crate::layout::theme::{resolve_theme_color, Rgb};
use crate::layout::{LayoutError, LayoutOptions, MissingArtwork, RenderJob};

/// Helvetica cap height in em, used to centre glyphs inside their line box.
const CAP_HEIGHT_EM: f32 = 0.718;

pub const STORY_TEXT_FIT: FitBounds = FitBounds {
    max_pt: 18.0,
    min_pt: 10.0,
    step_pt: 1.0,
};
pub const TITLE_FIT: FitBounds = FitBounds {
    max_pt: 32.0,
    min_pt: 16.0,
    step_pt: 2.0,
};
pub const END_MESSAGE_FIT: FitBounds = FitBounds {
    max_pt: 28.0,
    min_pt: 14.0,
    step_pt: 2.0,
};
const FOOTER_SIZE_PT: f32 = 8.0;

/// The white panel behind the title, in the lower two-thirds of the cover.
pub const TITLE_BOOKPLATE: Rect = Rect::new(25.0, 84.0, PAGE_SIZE_MM - 50.0, 58.0);
const TITLE_BOOKPLATE_PADDING_MM: f32 = 8.0;
const TITLE_BOOKPLATE_RADIUS_MM: f32 = 10.0;
/// Where the end message is centred on the back cover.
pub const END_MESSAGE_REGION: Rect = Rect::new(20.0, 60.0, PAGE_SIZE_MM - 40.0, 90.0);

// ────────────────────────────────────────────────────────────────────────────
// Plan types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageKind {
    FrontCover,
    /// Zero-based story segment index.
    Story(usize),
    BackCover,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Background {
    /// Full-bleed image stretched to the page.
    Image(PathBuf),
    Fill(Rgb),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub rect: Rect,
    pub fill: Rgb,
    /// `None` draws sharp corners.
    pub corner_radius: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artwork {
    pub path: PathBuf,
    pub rect: Rect,
    /// Draw through the organic edge mask.
    pub organic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    /// Baseline, measured from the top edge.
    pub baseline: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub face: FontFace,
    pub size_pt: f32,
    pub color: Rgb,
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub kind: PageKind,
    pub background: Background,
    /// Drawn in order, above the background.
    pub panels: Vec<Panel>,
    pub artwork: Option<Artwork>,
    pub texts: Vec<TextBlock>,
    pub footer: Option<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPlan {
    pub pages: Vec<PagePlan>,
}

impl BookPlan {
    pub fn story_page_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.kind, PageKind::Story(_)))
            .count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

pub fn plan_book(
    job: &RenderJob,
    options: &LayoutOptions,
    capabilities: Capabilities,
) -> Result<BookPlan, LayoutError> {
    let theme = resolve_theme_color(&job.theme_color);
    let cover = resolvable(job.cover_image.as_deref());
    let cover_background = match cover {
        Some(path) => Background::Image(path.to_path_buf()),
        None => Background::Fill(theme),
    };
    let corner = |radius: f32| capabilities.rounded_rect.then_some(radius);

    let segments = job.story.pages();
    let end_message = job.end_message.trim();
    let total_pages = 1 + segments.len() + usize::from(!end_message.is_empty());
    let mut pages = Vec::with_capacity(total_pages);

    // Front cover
    let title_area = TITLE_BOOKPLATE.inset(TITLE_BOOKPLATE_PADDING_MM);
    let title = fit_text(&job.title, FontFace::Bold, title_area.w, title_area.h, &TITLE_FIT);
    pages.push(PagePlan {
        kind: PageKind::FrontCover,
        background: cover_background.clone(),
        panels: vec![Panel {
            rect: TITLE_BOOKPLATE,
            fill: Rgb::WHITE,
            corner_radius: corner(TITLE_BOOKPLATE_RADIUS_MM),
        }],
        artwork: None,
        texts: vec![place_block(&title, FontFace::Bold, &title_area)],
        footer: None,
    });

    // Story pages
    let frame = story_frame();
    let text_region = story_text_region();
    for (index, segment) in segments.iter().enumerate() {
        let mut panels = vec![Panel {
            rect: frame,
            fill: Rgb::WHITE,
            corner_radius: corner(FRAME_CORNER_RADIUS_MM),
        }];

        let artwork = match artwork_for(job, index) {
            Some(path) => {
                let (px_w, px_h) = image::image_dimensions(path)?;
                Some(Artwork {
                    path: path.to_path_buf(),
                    rect: place_in_frame(px_w, px_h, &frame, FRAME_PADDING_MM),
                    organic: options.organic_edges,
                })
            }
            None => {
                if options.missing_artwork == MissingArtwork::GrayBox {
                    panels.push(Panel {
                        rect: frame.inset(FRAME_PADDING_MM),
                        fill: Rgb::PLACEHOLDER_GRAY,
                        corner_radius: None,
                    });
                }
                None
            }
        };

        let fitted = fit_text(
            segment,
            FontFace::Bold,
            text_region.w,
            text_region.h,
            &STORY_TEXT_FIT,
        );
        let page_number = pages.len() + 1;
        pages.push(PagePlan {
            kind: PageKind::Story(index),
            background: Background::Fill(theme),
            panels,
            artwork,
            texts: vec![place_block(&fitted, FontFace::Bold, &text_region)],
            footer: footer_for(page_number, total_pages),
        });
    }

    // Back cover
    if !end_message.is_empty() {
        let fitted = fit_text(
            end_message,
            FontFace::BoldOblique,
            END_MESSAGE_REGION.w,
            END_MESSAGE_REGION.h,
            &END_MESSAGE_FIT,
        );
        pages.push(PagePlan {
            kind: PageKind::BackCover,
            background: cover_background,
            panels: Vec::new(),
            artwork: None,
            texts: vec![place_block(&fitted, FontFace::BoldOblique, &END_MESSAGE_REGION)],
            footer: None,
        });
    }

    Ok(BookPlan { pages })
}

/// The artwork for story segment `index`, if it exists on disk.
fn artwork_for(job: &RenderJob, index: usize) -> Option<&Path> {
    resolvable(job.illustrations.get(index).and_then(|p| p.as_deref()))
}

fn resolvable(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.is_file())
}

/// `Page N` on every page but the first and the last (1-based `page_number`).
pub fn footer_for(page_number: usize, total_pages: usize) -> Option<TextBlock> {
    if page_number <= 1 || page_number >= total_pages {
        return None;
    }
    let text = format!("Page {}", page_number - 1);
    let width = get_metrics(FontFace::Oblique).measure_mm(&text, FOOTER_SIZE_PT);
    Some(TextBlock {
        face: FontFace::Oblique,
        size_pt: FOOTER_SIZE_PT,
        color: Rgb::BLACK,
        lines: vec![PlacedLine {
            text,
            x: (PAGE_SIZE_MM - width) / 2.0,
            baseline: PAGE_SIZE_MM - FOOTER_BASELINE_FROM_BOTTOM_MM,
        }],
    })
}

/// Centres the fitted lines in `region`, both axes.
pub fn place_block(fitted: &FittedText, face: FontFace, region: &Rect) -> TextBlock {
    let metrics = get_metrics(face);
    let advance = line_advance_mm(fitted.size_pt);
    let cap_mm = CAP_HEIGHT_EM * fitted.size_pt * PT_TO_MM;
    let top = region.y + (region.h - fitted.height_mm()) / 2.0;

    let lines = fitted
        .lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let width = metrics.measure_mm(text, fitted.size_pt);
            PlacedLine {
                text: text.clone(),
                x: region.x + (region.w - width) / 2.0,
                baseline: top + advance * i as f32 + (advance + cap_mm) / 2.0,
            }
        })
        .collect();

    TextBlock {
        face,
        size_pt: fitted.size_pt,
        color: Rgb::BLACK,
        lines,
    }
}
