//! Base map layer and the pluggable cartographic renderer seam.

use std::sync::Arc;

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::layer::Layer;
use crate::render::RenderContext;

/// Paints the cartographic base of the sheet in view pixels.
///
/// The compositor does not care where the cartography comes from; anything
/// that can draw the internal canvas through [`Canvas`] can sit here.
pub trait MapRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError>;
}

/// Base renderer that paints nothing, leaving the paper background.
///
/// Used when the sheet's imagery comes entirely from the tile overlay.
pub struct BlankBase;

impl MapRenderer for BlankBase {
    fn render(&self, _ctx: &RenderContext, _canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Placeholder cartography: outlines the map frame so a sheet is legible
/// without an external rendering engine plugged in.
pub struct FrameMapRenderer;

impl MapRenderer for FrameMapRenderer {
    fn render(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let (w, h) = (ctx.view().width(), ctx.view().height());
        canvas.set_stroke([0.0, 0.0, 0.0, 1.0], 1.0);
        canvas.move_to(0.0, 0.0);
        canvas.line_to(w, 0.0);
        canvas.line_to(w, h);
        canvas.line_to(0.0, h);
        canvas.close_path();
        canvas.stroke();
        Ok(())
    }
}

/// Bottom layer of the stack: the base map under zoom compensation.
///
/// The renderer draws the full internal canvas; scaling by the display zoom
/// here puts its output in the same registration as every overlay above it.
pub struct BaseMapLayer {
    renderer: Arc<dyn MapRenderer>,
}

impl BaseMapLayer {
    pub fn new(renderer: Arc<dyn MapRenderer>) -> Self {
        Self { renderer }
    }
}

impl Layer for BaseMapLayer {
    fn name(&self) -> &'static str {
        "basemap"
    }

    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let zoom = ctx.zoom();
        canvas.scale(zoom, zoom);
        self.renderer.render(ctx, canvas)
    }
}
