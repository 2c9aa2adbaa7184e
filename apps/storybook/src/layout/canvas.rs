//! PDF surface. Paints a `BookPlan` into an in-memory lopdf document.
//!
//! Plan coordinates are millimetres from the top-left; PDF user space is points
//! from the bottom-left. All conversion happens here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::layout::font_metrics::FontFace;
use crate::layout::geometry::{Rect, PAGE_SIZE_MM};
use crate::layout::organic::masked_copy;
use crate::layout::plan::{Background, BookPlan, PagePlan, Panel, TextBlock};
use crate::layout::theme::Rgb;
use crate::layout::LayoutError;

/// PDF points per millimetre.
const MM_TO_PT: f32 = 72.0 / 25.4;
/// Bézier control-point factor for quarter-circle corners.
const KAPPA: f32 = 0.552_284_8;

/// What the drawing surface can do, fixed for the lifetime of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub rounded_rect: bool,
}

fn pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// `[x, y, w, h]` in PDF points for a top-left-origin rectangle.
fn pdf_rect(rect: &Rect) -> [f32; 4] {
    [
        pt(rect.x),
        pt(PAGE_SIZE_MM - rect.y - rect.h),
        pt(rect.w),
        pt(rect.h),
    ]
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

fn reals<const N: usize>(values: [f32; N]) -> Vec<Object> {
    values.into_iter().map(Object::from).collect()
}

/// Typographic characters that WinAnsi places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [(char, u8); 10] = [
    ('\u{20AC}', 0x80), // euro
    ('\u{2026}', 0x85), // ellipsis
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95), // bullet
    ('\u{2013}', 0x96), // en dash
    ('\u{2014}', 0x97), // em dash
    ('\u{2122}', 0x99), // trade mark
];

/// Text as WinAnsi bytes; anything WinAnsi cannot encode becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|(extra, _)| *extra == c)
                .map_or(b'?', |(_, byte)| *byte),
        })
        .collect()
}

pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    fonts_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Embedded images keyed by source path, so the cover is stored once.
    images: HashMap<PathBuf, ObjectId>,
    scratch_dir: PathBuf,
}

impl PdfCanvas {
    pub const CAPABILITIES: Capabilities = Capabilities { rounded_rect: true };

    pub fn new(scratch_dir: PathBuf) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FontFace::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }
        let fonts_id = doc.add_object(fonts);

        Self {
            doc,
            pages_id,
            fonts_id,
            page_ids: Vec::new(),
            images: HashMap::new(),
            scratch_dir,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    pub fn paint_book(&mut self, plan: &BookPlan) -> Result<(), LayoutError> {
        for page in &plan.pages {
            self.paint_page(page)?;
        }
        Ok(())
    }

    pub fn paint_page(&mut self, page: &PagePlan) -> Result<(), LayoutError> {
        let mut ops = Vec::new();
        let mut xobjects = Dictionary::new();

        match &page.background {
            Background::Fill(rgb) => fill_rect(&mut ops, &Rect::full_page(), *rgb, None),
            Background::Image(path) => {
                let id = self.embed_image(path, true)?;
                self.draw_image(&mut ops, &mut xobjects, id, &Rect::full_page());
            }
        }

        for panel in &page.panels {
            self.paint_panel(&mut ops, panel);
        }

        if let Some(art) = &page.artwork {
            let id = if art.organic {
                // The masked copy lives only until the image is embedded.
                let masked = masked_copy(&art.path, &self.scratch_dir)?;
                self.embed_image(masked.path(), false)?
            } else {
                self.embed_image(&art.path, true)?
            };
            self.draw_image(&mut ops, &mut xobjects, id, &art.rect);
        }

        for block in page.texts.iter().chain(page.footer.iter()) {
            draw_text(&mut ops, block);
        }

        let content = Content { operations: ops };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        let side = pt(PAGE_SIZE_MM);
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => self.fonts_id,
                "XObject" => xobjects,
            },
            "MediaBox" => reals([0.0, 0.0, side, side]),
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Writes the page tree and catalog, compresses streams and saves to `output`.
    pub fn finish(mut self, output: &Path) -> Result<usize, LayoutError> {
        let count = self.page_ids.len();
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();
        self.doc.save(output)?;
        Ok(count)
    }

    fn paint_panel(&self, ops: &mut Vec<Operation>, panel: &Panel) {
        let radius = panel
            .corner_radius
            .filter(|_| self.capabilities().rounded_rect);
        fill_rect(ops, &panel.rect, panel.fill, radius);
    }

    /// Embeds the image at `path` as an RGB XObject (alpha goes to an `SMask`).
    fn embed_image(&mut self, path: &Path, cache: bool) -> Result<ObjectId, LayoutError> {
        if let Some(id) = self.images.get(path) {
            return Ok(*id);
        }

        let img = image::open(path)?;
        let (px_w, px_h) = img.dimensions();
        let (width, height) = (i64::from(px_w), i64::from(px_h));
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        };

        if img.color().has_alpha() {
            let alpha: Vec<u8> = img.to_rgba8().pixels().map(|p| p[3]).collect();
            let smask_id = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8_i64,
                },
                alpha,
            ));
            dict.set("SMask", smask_id);
        }

        let id = self
            .doc
            .add_object(Stream::new(dict, img.to_rgb8().into_raw()));
        debug!("Embedded {} ({width}x{height})", path.display());
        if cache {
            self.images.insert(path.to_path_buf(), id);
        }
        Ok(id)
    }

    fn draw_image(
        &self,
        ops: &mut Vec<Operation>,
        xobjects: &mut Dictionary,
        id: ObjectId,
        rect: &Rect,
    ) {
        let name = format!("Im{}", xobjects.len() + 1);
        xobjects.set(name.as_str(), id);
        let [x, y, w, h] = pdf_rect(rect);
        ops.push(op("q", vec![]));
        ops.push(op("cm", reals([w, 0.0, 0.0, h, x, y])));
        ops.push(op("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(op("Q", vec![]));
    }
}

fn set_fill(ops: &mut Vec<Operation>, rgb: Rgb) {
    ops.push(op("rg", reals(rgb.unit())));
}

fn fill_rect(ops: &mut Vec<Operation>, rect: &Rect, rgb: Rgb, radius: Option<f32>) {
    set_fill(ops, rgb);
    let [x, y, w, h] = pdf_rect(rect);
    match radius {
        Some(r) if r > 0.0 => rounded_rect_path(ops, x, y, w, h, pt(r).min(w / 2.0).min(h / 2.0)),
        _ => ops.push(op("re", reals([x, y, w, h]))),
    }
    ops.push(op("f", vec![]));
}

fn rounded_rect_path(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32, r: f32) {
    let k = KAPPA * r;
    let (right, top) = (x + w, y + h);
    ops.push(op("m", reals([x + r, y])));
    ops.push(op("l", reals([right - r, y])));
    ops.push(op("c", reals([right - r + k, y, right, y + r - k, right, y + r])));
    ops.push(op("l", reals([right, top - r])));
    ops.push(op("c", reals([right, top - r + k, right - r + k, top, right - r, top])));
    ops.push(op("l", reals([x + r, top])));
    ops.push(op("c", reals([x + r - k, top, x, top - r + k, x, top - r])));
    ops.push(op("l", reals([x, y + r])));
    ops.push(op("c", reals([x, y + r - k, x + r - k, y, x + r, y])));
    ops.push(op("h", vec![]));
}

fn draw_text(ops: &mut Vec<Operation>, block: &TextBlock) {
    set_fill(ops, block.color);
    for line in block.lines.iter().filter(|l| !l.text.is_empty()) {
        ops.push(op("BT", vec![]));
        ops.push(op(
            "Tf",
            vec![
                Object::Name(block.face.resource_name().as_bytes().to_vec()),
                block.size_pt.into(),
            ],
        ));
        ops.push(op(
            "Td",
            reals([pt(line.x), pt(PAGE_SIZE_MM - line.baseline)]),
        ));
        ops.push(op(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        ops.push(op("ET", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_keeps_latin1_and_replaces_others() {
        assert_eq!(encode_win_ansi("It's"), b"It's".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{1F600}!"), b"?!".to_vec());
    }

    #[test]
    fn test_win_ansi_maps_typographic_punctuation() {
        assert_eq!(
            encode_win_ansi("Maya\u{2019}s Day"),
            vec![b'M', b'a', b'y', b'a', 0x92, b's', b' ', b'D', b'a', b'y']
        );
        assert_eq!(
            encode_win_ansi("\u{201C}Hi\u{201D} \u{2013}\u{2014}\u{2026}"),
            vec![0x93, b'H', b'i', 0x94, b' ', 0x96, 0x97, 0x85]
        );
        assert!(!encode_win_ansi("\u{2018}quoted\u{2019}").contains(&b'?'));
    }

    #[test]
    fn test_pdf_rect_flips_vertical_axis() {
        let [x, y, w, h] = pdf_rect(&Rect::new(10.0, 20.0, 30.0, 40.0));
        assert!((x - pt(10.0)).abs() < 1e-3);
        assert!((y - pt(150.0)).abs() < 1e-3);
        assert!((w - pt(30.0)).abs() < 1e-3);
        assert!((h - pt(40.0)).abs() < 1e-3);
    }

    #[test]
    fn test_rounded_fill_uses_curves_and_sharp_fill_uses_re() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);

        let mut rounded = Vec::new();
        fill_rect(&mut rounded, &rect, Rgb::WHITE, Some(5.0));
        assert_eq!(rounded.iter().filter(|o| o.operator == "c").count(), 4);
        assert!(!rounded.iter().any(|o| o.operator == "re"));

        let mut sharp = Vec::new();
        fill_rect(&mut sharp, &rect, Rgb::WHITE, None);
        assert!(sharp.iter().any(|o| o.operator == "re"));
        assert_eq!(sharp.last().unwrap().operator, "f");
    }

    #[test]
    fn test_empty_plan_saves_zero_pages() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.pdf");
        let canvas = PdfCanvas::new(dir.path().to_path_buf());
        assert_eq!(canvas.finish(&out).unwrap(), 0);
        assert!(out.exists());
    }
}
