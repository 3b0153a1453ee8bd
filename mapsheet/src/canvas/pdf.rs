//! PDF canvas backend.
//!
//! One page, one layer. Device pixels are converted to millimeters at
//! 72 px/inch and the y axis is flipped, since PDF user space grows upward
//! from the bottom-left corner. Stroke alpha is dropped on this backend;
//! the opaque stroke color is kept.
//!
//! Tile rasters are decoded through the PDF library's own image types so
//! they embed without a recompression pass.

use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};

use crate::canvas::{Canvas, Paint, TransformStack};
use crate::error::RenderError;

/// Device px to mm at 72 px/inch.
const PX_TO_MM: f64 = 25.4 / 72.0;

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    font: IndirectFontRef,
    page_height_px: f64,
    stack: TransformStack,
    /// Finished subpaths in device px, with their closed flag.
    subpaths: Vec<(Vec<(f64, f64)>, bool)>,
    current: Vec<(f64, f64)>,
    current_closed: bool,
    stroke_paint: Paint,
    stroke_width: f64,
}

impl PdfCanvas {
    pub fn new(width_px: f64, height_px: f64) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            "Map sheet",
            Mm((width_px * PX_TO_MM) as f32),
            Mm((height_px * PX_TO_MM) as f32),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Canvas(format!("cannot load builtin font: {}", e)))?;

        Ok(Self {
            doc,
            page,
            layer,
            font,
            page_height_px: height_px,
            stack: TransformStack::new(),
            subpaths: Vec::new(),
            current: Vec::new(),
            current_closed: false,
            stroke_paint: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 1.0,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    /// Flip a device-px point into bottom-left-origin millimeters.
    fn to_mm(&self, x: f64, y: f64) -> (Mm, Mm) {
        (
            Mm((x * PX_TO_MM) as f32),
            Mm(((self.page_height_px - y) * PX_TO_MM) as f32),
        )
    }

    fn flush_subpath(&mut self) {
        if !self.current.is_empty() {
            let points = std::mem::take(&mut self.current);
            self.subpaths.push((points, self.current_closed));
        }
        self.current_closed = false;
    }
}

impl Canvas for PdfCanvas {
    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.stack.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.stack.scale(sx, sy);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.flush_subpath();
        let p = self.stack.current().apply(x, y);
        self.current.push(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.stack.current().apply(x, y);
        self.current.push(p);
    }

    fn close_path(&mut self) {
        self.current_closed = true;
    }

    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.stroke_paint = paint;
        self.stroke_width = width;
    }

    fn stroke(&mut self) {
        self.flush_subpath();
        let subpaths = std::mem::take(&mut self.subpaths);
        if subpaths.is_empty() {
            return;
        }

        let [r, g, b, _a] = self.stroke_paint;
        let layer = self.layer();
        layer.set_outline_color(Color::Rgb(Rgb::new(r as f32, g as f32, b as f32, None)));
        layer.set_outline_thickness((self.stroke_width * self.stack.current().sx) as f32);

        for (points, is_closed) in subpaths {
            if points.len() < 2 {
                continue;
            }
            let points = points
                .into_iter()
                .map(|(x, y)| {
                    let (mx, my) = self.to_mm(x, y);
                    (Point::new(mx, my), false)
                })
                .collect();
            layer.add_line(Line { points, is_closed });
        }
    }

    fn draw_image(&mut self, png: &Path, x: f64, y: f64) -> Result<(), RenderError> {
        let (_, h) = image::image_dimensions(png)
            .map_err(|e| RenderError::Canvas(format!("cannot read {}: {}", png.display(), e)))?;

        let file = std::fs::File::open(png)?;
        let decoder =
            printpdf::image_crate::codecs::png::PngDecoder::new(std::io::BufReader::new(file))
                .map_err(|e| {
                    RenderError::Canvas(format!("cannot decode {}: {}", png.display(), e))
                })?;
        let raster = printpdf::Image::try_from(decoder)
            .map_err(|e| RenderError::Canvas(format!("cannot embed {}: {}", png.display(), e)))?;

        let t = self.stack.current();
        let (dx, dy) = t.apply(x, y);
        // PDF anchors images at their bottom-left corner.
        let (tx, ty) = self.to_mm(dx, dy + h as f64 * t.sy);
        raster.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(tx),
                translate_y: Some(ty),
                rotate: None,
                scale_x: Some(t.sx as f32),
                scale_y: Some(t.sy as f32),
                // At 72 dpi one image pixel equals one device pixel.
                dpi: Some(72.0),
            },
        );
        Ok(())
    }

    fn show_text(&mut self, text: &str, x: f64, y: f64, size: f64) -> Result<(), RenderError> {
        let t = self.stack.current();
        let (dx, dy) = t.apply(x, y);
        let (mx, my) = self.to_mm(dx, dy);

        let layer = self.layer();
        layer.begin_text_section();
        layer.set_font(&self.font, (size * t.sx) as f32);
        layer.set_text_cursor(mx, my);
        layer.write_text(text, &self.font);
        layer.end_text_section();
        Ok(())
    }

    fn finish(self: Box<Self>, output: &Path) -> Result<(), RenderError> {
        let file = std::fs::File::create(output)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| RenderError::Canvas(format!("cannot write PDF: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish_to_bytes(canvas: PdfCanvas) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        Box::new(canvas).finish(&path).unwrap();
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_empty_page_is_valid_pdf() {
        let canvas = PdfCanvas::new(648.0, 504.0).unwrap();
        let bytes = finish_to_bytes(canvas);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_stroked_path_survives_to_output() {
        let mut canvas = PdfCanvas::new(200.0, 200.0).unwrap();
        canvas.set_stroke([1.0, 0.27, 0.0, 0.8], 2.0);
        canvas.move_to(10.0, 10.0);
        canvas.line_to(190.0, 10.0);
        canvas.line_to(190.0, 190.0);
        canvas.close_path();
        canvas.stroke();

        let bytes = finish_to_bytes(canvas);
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500, "content stream should not be empty");
    }

    #[test]
    fn test_image_embeds() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]))
            .save(&png)
            .unwrap();

        let mut canvas = PdfCanvas::new(200.0, 200.0).unwrap();
        canvas.draw_image(&png, 16.0, 16.0).unwrap();
        let bytes = finish_to_bytes(canvas);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let mut canvas = PdfCanvas::new(100.0, 100.0).unwrap();
        let result = canvas.draw_image(Path::new("/nonexistent/tile.png"), 0.0, 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_text_draws_without_error() {
        let mut canvas = PdfCanvas::new(200.0, 200.0).unwrap();
        canvas
            .show_text("\u{a9} OpenStreetMap contributors", 3.0, 197.0, 6.0)
            .unwrap();
        let bytes = finish_to_bytes(canvas);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_mm_conversion_flips_y() {
        let canvas = PdfCanvas::new(100.0, 100.0).unwrap();
        let (x, y) = canvas.to_mm(0.0, 0.0);
        assert!(x.0.abs() < 1e-6);
        // Top of the page in device space is the full height in PDF space.
        assert!((y.0 as f64 - 100.0 * PX_TO_MM).abs() < 1e-4);
    }
}
