//! QR stamp layer.

use std::path::PathBuf;

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::layer::Layer;
use crate::render::RenderContext;

/// The stamp raster is shrunk to 30% of its natural size.
const STAMP_SCALE: f64 = 0.3;

/// Stamps a caller-supplied QR code PNG in the bottom-right corner of the
/// map footprint.
///
/// The stamp is paper furniture like the copyright notice: its size is
/// fixed by [`STAMP_SCALE`], independent of the display zoom. A missing or
/// unreadable stamp file is a fatal error, not a degraded sheet; the
/// caller asked for it explicitly.
pub struct QrCodeLayer {
    png: PathBuf,
}

impl QrCodeLayer {
    pub fn new(png: PathBuf) -> Self {
        Self { png }
    }
}

impl Layer for QrCodeLayer {
    fn name(&self) -> &'static str {
        "qrcode"
    }

    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let (w, h) = image::image_dimensions(&self.png).map_err(|e| {
            RenderError::Canvas(format!("cannot read {}: {}", self.png.display(), e))
        })?;

        let margin = ctx.style().qrcode_margin_px();
        let map = ctx.map_size();

        canvas.scale(STAMP_SCALE, STAMP_SCALE);
        // Anchor the raster's bottom-right corner at the map's corner,
        // inset by the margin. Coordinates are in the scaled space.
        let x = map[0] / STAMP_SCALE - w as f64 - margin[0];
        let y = map[1] / STAMP_SCALE - h as f64 - margin[1];
        canvas.draw_image(&self.png, x, y)
    }
}
