//! SVG canvas backend.
//!
//! Builds an `<svg>` document at the page size with one node per drawn
//! element. Coordinates are flattened through the transform stack before
//! they reach the document, so nodes carry plain device-pixel positions and
//! no nested `transform` attributes. Tile rasters are embedded as base64
//! PNG data URIs to keep the sheet a single self-contained file.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use svg::node::element::path::Data;
use svg::node::element::{Image, Path as SvgPath, Text};
use svg::Document;

use crate::canvas::{Canvas, Paint, TransformStack};
use crate::error::RenderError;

pub struct SvgCanvas {
    document: Document,
    stack: TransformStack,
    data: Data,
    path_len: usize,
    stroke_paint: Paint,
    stroke_width: f64,
}

impl SvgCanvas {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        let document = Document::new()
            .set("width", width_px)
            .set("height", height_px)
            .set("viewBox", (0.0, 0.0, width_px, height_px));
        Self {
            document,
            stack: TransformStack::new(),
            data: Data::new(),
            path_len: 0,
            stroke_paint: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 1.0,
        }
    }

    fn push<T>(&mut self, node: T)
    where
        T: svg::Node,
    {
        let document = std::mem::replace(&mut self.document, Document::new());
        self.document = document.add(node);
    }

    fn with_data(&mut self, f: impl FnOnce(Data) -> Data) {
        let data = std::mem::replace(&mut self.data, Data::new());
        self.data = f(data);
    }

    fn rgb(paint: Paint) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgb({},{},{})",
            channel(paint[0]),
            channel(paint[1]),
            channel(paint[2])
        )
    }
}

impl Canvas for SvgCanvas {
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
        let (dx, dy) = self.stack.current().apply(x, y);
        self.with_data(|d| d.move_to((dx, dy)));
        self.path_len += 1;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.stack.current().apply(x, y);
        self.with_data(|d| d.line_to((dx, dy)));
        self.path_len += 1;
    }

    fn close_path(&mut self) {
        self.with_data(|d| d.close());
    }

    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.stroke_paint = paint;
        self.stroke_width = width;
    }

    fn stroke(&mut self) {
        let data = std::mem::replace(&mut self.data, Data::new());
        if self.path_len == 0 {
            return;
        }
        self.path_len = 0;

        let width = self.stroke_width * self.stack.current().sx;
        let node = SvgPath::new()
            .set("d", data)
            .set("fill", "none")
            .set("stroke", Self::rgb(self.stroke_paint))
            .set("stroke-opacity", self.stroke_paint[3])
            .set("stroke-width", width);
        self.push(node);
    }

    fn draw_image(&mut self, png: &Path, x: f64, y: f64) -> Result<(), RenderError> {
        let (w, h) = image::image_dimensions(png)
            .map_err(|e| RenderError::Canvas(format!("cannot read {}: {}", png.display(), e)))?;
        let bytes = std::fs::read(png)?;

        let t = self.stack.current();
        let (dx, dy) = t.apply(x, y);
        let node = Image::new()
            .set("x", dx)
            .set("y", dy)
            .set("width", w as f64 * t.sx)
            .set("height", h as f64 * t.sy)
            .set("href", format!("data:image/png;base64,{}", BASE64.encode(&bytes)));
        self.push(node);
        Ok(())
    }

    fn show_text(&mut self, text: &str, x: f64, y: f64, size: f64) -> Result<(), RenderError> {
        let t = self.stack.current();
        let (dx, dy) = t.apply(x, y);
        let node = Text::new()
            .add(svg::node::Text::new(text))
            .set("x", dx)
            .set("y", dy)
            .set("font-size", size * t.sx)
            .set("font-family", "sans-serif")
            .set("fill", "black");
        self.push(node);
        Ok(())
    }

    fn finish(self: Box<Self>, output: &Path) -> Result<(), RenderError> {
        svg::save(output, &self.document)?;
        Ok(())
    }
}
