//! # PDF Backend
//!
//! Replays a [`DocumentLayout`] onto `printpdf` pages.
//!
//! Layout coordinates are points; `printpdf` takes millimetres, so every
//! coordinate passes through [`mm`]. Fonts are either the built-in
//! Helvetica pair or two TrueType files read by the orchestrator.

use std::io::Cursor;

use image::{DynamicImage, Rgb as RgbPixel, RgbImage, Rgba};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
    Rect, Rgb,
};
use tracing::debug;

use crate::config::RgbColor;
use crate::error::DocResult;
use crate::layout::{DocumentLayout, DrawOp, FontFace, ImageSlot};

const LAYER_NAME: &str = "Layer 1";

/// Points to millimetres.
#[inline]
pub fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

// =============================================================================
// Assets
// =============================================================================

/// 8-bit RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RasterImage {
    /// Flattens any decoded image to RGB, compositing alpha onto white.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = RgbImage::new(width, height);
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            let alpha = f32::from(a) / 255.0;
            let blend = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
            rgb.put_pixel(x, y, RgbPixel([blend(r), blend(g), blend(b)]));
        }

        RasterImage {
            width,
            height,
            rgb: rgb.into_raw(),
        }
    }

    /// Decodes PNG/JPEG bytes.
    pub fn decode(bytes: &[u8]) -> DocResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(RasterImage::from_dynamic(&image))
    }

    /// `(width, height)` that fits inside a `box_w × box_h` box with the
    /// aspect ratio kept.
    pub fn fit_within(&self, box_w: f32, box_h: f32) -> (f32, f32) {
        if self.width == 0 || self.height == 0 {
            return (box_w, box_h);
        }
        let aspect = self.width as f32 / self.height as f32;
        if box_w / box_h > aspect {
            (box_h * aspect, box_h)
        } else {
            (box_w, box_w / aspect)
        }
    }
}

/// Font program source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Built-in Helvetica and Helvetica-Bold (Latin-1 only).
    #[default]
    Builtin,
    /// TrueType files for the regular and bold faces.
    External { regular: Vec<u8>, bold: Vec<u8> },
}

impl FontSource {
    /// True when the fonts can draw characters outside Latin-1.
    pub fn supports_unicode(&self) -> bool {
        matches!(self, FontSource::External { .. })
    }
}

/// Everything the backend needs besides the layout.
#[derive(Debug, Clone, Default)]
pub struct PdfAssets {
    pub fonts: FontSource,
    pub logo: Option<RasterImage>,
    pub qr: Option<RasterImage>,
}

impl PdfAssets {
    fn image(&self, slot: ImageSlot) -> Option<&RasterImage> {
        match slot {
            ImageSlot::Logo => self.logo.as_ref(),
            ImageSlot::VerificationCode => self.qr.as_ref(),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference, source: &FontSource) -> DocResult<Self> {
        let fonts = match source {
            FontSource::Builtin => Fonts {
                regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
                bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            },
            FontSource::External { regular, bold } => Fonts {
                regular: doc.add_external_font(Cursor::new(regular.as_slice()))?,
                bold: doc.add_external_font(Cursor::new(bold.as_slice()))?,
            },
        };
        Ok(fonts)
    }

    fn face(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

/// Renders the layout to PDF bytes.
///
/// Image slots without a matching asset are left empty.
pub fn render_pdf(layout: &DocumentLayout, assets: &PdfAssets) -> DocResult<Vec<u8>> {
    let width = mm(layout.width);
    let height = mm(layout.height);
    let (doc, first_page, first_layer) = PdfDocument::new(&layout.title, width, height, LAYER_NAME);
    let fonts = Fonts::load(&doc, &assets.fonts)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };

        for op in &page.ops {
            draw(&layer, &fonts, assets, op);
        }
    }

    let bytes = doc.save_to_bytes()?;
    debug!(pages = layout.pages.len(), bytes = bytes.len(), "Rendered PDF");
    Ok(bytes)
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, assets: &PdfAssets, op: &DrawOp) {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            font,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.face(*font));
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let rect = Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height))
                .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
        }
        DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            thickness,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness);
            let corners = [
                (*x, *y),
                (x + width, *y),
                (x + width, y + height),
                (*x, y + height),
            ];
            layer.add_line(Line {
                points: corners
                    .iter()
                    .map(|(px, py)| (Point::new(mm(*px), mm(*py)), false))
                    .collect(),
                is_closed: true,
            });
        }
        DrawOp::Line {
            from,
            to,
            color,
            thickness,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Image {
            slot,
            x,
            y,
            width,
            height,
        } => {
            if let Some(raster) = assets.image(*slot) {
                place_image(layer, raster, *slot, *x, *y, *width, *height);
            }
        }
    }
}

/// Places a raster inside its slot.
///
/// The logo keeps its aspect ratio and is centred; the verification code
/// is stretched to the exact slot size.
fn place_image(
    layer: &PdfLayerReference,
    raster: &RasterImage,
    slot: ImageSlot,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    if raster.width == 0 || raster.height == 0 {
        return;
    }

    let (draw_w, draw_h) = match slot {
        ImageSlot::Logo => raster.fit_within(width, height),
        ImageSlot::VerificationCode => (width, height),
    };
    let draw_x = x + (width - draw_w) / 2.0;
    let draw_y = y + (height - draw_h) / 2.0;

    // dpi sets the width; scale_y corrects the height for non-square fits
    let dpi = raster.width as f32 * 72.0 / draw_w;
    let natural_h = raster.height as f32 * 72.0 / dpi;

    let image = Image::from(ImageXObject {
        width: Px(raster.width as usize),
        height: Px(raster.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: matches!(slot, ImageSlot::Logo),
        image_data: raster.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(draw_x)),
            translate_y: Some(mm(draw_y)),
            dpi: Some(dpi),
            scale_y: Some(draw_h / natural_h),
            ..Default::default()
        },
    );
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

// =============================================================================
// Unit Tests
// =============================================================================
