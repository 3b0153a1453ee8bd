//! Area border layer.

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::layer::{Area, Layer};
use crate::render::RenderContext;

/// Outlines the requested areas with the style's border paint.
///
/// All areas share one path and one stroke, so overlapping borders keep a
/// uniform weight. Paths are built in view pixels under zoom compensation.
pub struct AreaLayer {
    areas: Vec<Area>,
}

impl AreaLayer {
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }
}

impl Layer for AreaLayer {
    fn name(&self) -> &'static str {
        "areas"
    }

    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let zoom = ctx.zoom();
        canvas.scale(zoom, zoom);

        for area in &self.areas {
            if area.path.len() < 2 {
                tracing::warn!(points = area.path.len(), "skipping degenerate area");
                continue;
            }
            let mut points = area.points();
            if let Some(first) = points.next() {
                let v = ctx.to_view(first);
                canvas.move_to(v.x, v.y);
            }
            for geo in points {
                let v = ctx.to_view(geo);
                canvas.line_to(v.x, v.y);
            }
            canvas.close_path();
        }

        let style = ctx.style();
        canvas.set_stroke(style.area_border_color, style.area_border_width);
        canvas.stroke();
        Ok(())
    }
}
