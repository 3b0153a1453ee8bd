//! Copyright notice layer.

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::layer::Layer;
use crate::render::RenderContext;

/// Attribution line required by the map data license.
pub const COPYRIGHT_TEXT: &str = "\u{a9} OpenStreetMap contributors, CC-BY-SA";

const FONT_SIZE: f64 = 6.0;

/// Draws the attribution in the bottom-left corner of the map footprint,
/// in paper pixels. Zoom compensation does not apply here; the notice
/// prints at the same size on every sheet.
pub struct CopyrightLayer {
    text: String,
}

impl CopyrightLayer {
    pub fn new() -> Self {
        Self {
            text: COPYRIGHT_TEXT.to_string(),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for CopyrightLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for CopyrightLayer {
    fn name(&self) -> &'static str {
        "copyright"
    }

    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let margin = ctx.style().copyright_margin_px();
        let map = ctx.map_size();
        let x = margin[0];
        let y = map[1] - margin[1];
        canvas.show_text(&self.text, x, y, FONT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::{render_layer_svg, test_bbox, test_style};

    #[test]
    fn test_notice_sits_at_bottom_left_of_map() {
        let style = test_style();
        let ctx = RenderContext::new(&style, test_bbox(), [600.0, 400.0], [648.0, 504.0]);
        let layer = CopyrightLayer::new();

        let out = render_layer_svg(&layer, &ctx);
        assert!(out.contains("OpenStreetMap contributors"));
        assert!(out.contains(r#"x="3""#), "{}", out);
        assert!(out.contains(r#"y="397""#), "{}", out);
        assert!(out.contains(r#"font-size="6""#), "not zoom-scaled: {}", out);
    }

    #[test]
    fn test_custom_text() {
        let style = test_style();
        let ctx = RenderContext::new(&style, test_bbox(), [600.0, 400.0], [648.0, 504.0]);
        let layer = CopyrightLayer::with_text("custom attribution");
        let out = render_layer_svg(&layer, &ctx);
        assert!(out.contains("custom attribution"));
    }
}
