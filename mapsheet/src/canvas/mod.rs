//! Drawing surface abstraction over the vector backends.
//!
//! Layers draw against the [`Canvas`] trait in internal map pixels and never
//! learn which backend is underneath. Both backends share the same model: a
//! current transform (scale and translate only) with a save/restore stack, a
//! current path built from `move_to`/`line_to`/`close_path`, and stroke
//! state applied on `stroke`. Raster images and line widths are scaled by
//! the transform in effect when they are drawn, so a layer that scales the
//! canvas down draws proportionally smaller output.

mod pdf;
mod svg;

use std::path::Path;

use serde::Deserialize;

use crate::error::RenderError;

pub use pdf::PdfCanvas;
pub use svg::SvgCanvas;

/// Vector format the finished sheet is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }
}

/// RGBA stroke paint, components in `0..=1`.
pub type Paint = [f64; 4];

/// A vector drawing surface in page pixels (72 px/inch), y growing down
/// from the top-left corner.
pub trait Canvas {
    /// Push the current transform onto the state stack.
    fn save(&mut self);

    /// Pop the most recently saved transform. Unbalanced restores are a
    /// programming error and restore to the identity.
    fn restore(&mut self);

    /// Translate subsequent drawing by `(dx, dy)` in current user units.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Scale subsequent drawing by `(sx, sy)`.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Begin a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Extend the current subpath with a line to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);

    /// Close the current subpath back to its starting point.
    fn close_path(&mut self);

    /// Set stroke paint and width for the next `stroke`. The width is in
    /// user units and is scaled by the transform at stroke time.
    fn set_stroke(&mut self, paint: Paint, width: f64);

    /// Stroke and clear the current path.
    fn stroke(&mut self);

    /// Draw a PNG raster with its top-left corner at `(x, y)`, at its
    /// natural pixel size under the current transform.
    fn draw_image(&mut self, png: &Path, x: f64, y: f64) -> Result<(), RenderError>;

    /// Draw a line of text with its baseline starting at `(x, y)`.
    fn show_text(&mut self, text: &str, x: f64, y: f64, size: f64) -> Result<(), RenderError>;

    /// Write the finished document to `output`.
    fn finish(self: Box<Self>, output: &Path) -> Result<(), RenderError>;
}

/// Open a canvas of the given page size for the requested format.
pub fn create_canvas(
    format: OutputFormat,
    width_px: f64,
    height_px: f64,
) -> Result<Box<dyn Canvas>, RenderError> {
    match format {
        OutputFormat::Pdf => Ok(Box::new(PdfCanvas::new(width_px, height_px)?)),
        OutputFormat::Svg => Ok(Box::new(SvgCanvas::new(width_px, height_px))),
    }
}

/// Affine transform restricted to axis-aligned scale and translation,
/// mapping user `(x, y)` to `(sx * x + tx, sy * y + ty)` device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }
}

/// Save/restore stack over the current [`Transform`], shared by both
/// backends.
#[derive(Debug)]
pub(crate) struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Transform::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        self.current = self.saved.pop().unwrap_or(Transform::IDENTITY);
    }

    /// Translation composes after the current scale, so `scale` then
    /// `translate` moves by scaled units.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.tx += self.current.sx * dx;
        self.current.ty += self.current.sy * dy;
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.sx *= sx;
        self.current.sy *= sy;
    }
}
