//! Sheet layers and the compositor that stacks them.
//!
//! A render is a fixed stack drawn bottom to top: base map, tile overlay,
//! area borders, copyright notice, QR stamp. Each layer draws through the
//! [`Canvas`] trait against a shared [`RenderContext`]; the compositor
//! isolates layers behind a save/restore pair so no layer's transform can
//! leak into the next.

mod area;
mod basemap;
mod copyright;
mod qrcode;
mod tiles;

use serde::Deserialize;

use crate::canvas::Canvas;
use crate::coord::GeoPoint;
use crate::error::RenderError;
use crate::render::RenderContext;

pub use area::AreaLayer;
pub use basemap::{BaseMapLayer, BlankBase, FrameMapRenderer, MapRenderer};
pub use copyright::{CopyrightLayer, COPYRIGHT_TEXT};
pub use qrcode::QrCodeLayer;
pub use tiles::TileOverlayLayer;

/// One drawable stratum of the sheet.
pub trait Layer {
    fn name(&self) -> &'static str;

    /// Draw this layer. The canvas arrives with the page-margin translation
    /// already applied; view-pixel layers scale by the display zoom
    /// themselves.
    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError>;
}

/// Draw the stack in order, each layer inside its own canvas state scope.
pub fn draw_layers(
    layers: &[Box<dyn Layer>],
    ctx: &RenderContext,
    canvas: &mut dyn Canvas,
) -> Result<(), RenderError> {
    for layer in layers {
        tracing::debug!(layer = layer.name(), "drawing layer");
        canvas.save();
        let result = layer.draw(ctx, canvas);
        canvas.restore();
        result?;
    }
    Ok(())
}

/// A polygonal region outlined on the sheet. The path arrives as
/// `[lat, lon]` vertex pairs and is implicitly closed.
#[derive(Debug, Clone, Deserialize)]
pub struct Area {
    pub path: Vec<[f64; 2]>,
}

impl Area {
    /// Vertices as geographic points, axis swap applied.
    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.path.iter().map(|&pair| GeoPoint::from_lat_lon_pair(pair))
    }
}

/// Overlay content supplied with a render request.
///
/// Points of interest are accepted in the input for forward compatibility
/// but are not drawn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapContent {
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub pois: Vec<serde_json::Value>,
}

impl MapContent {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::canvas::{OutputFormat, SvgCanvas};
    use crate::coord::BoundingBox;
    use crate::style::{Style, Unit};

    /// Style used across the layer tests: the worked example's geometry.
    pub(crate) fn test_style() -> Style {
        Style {
            paper_size: [648.0, 504.0],
            map_size: [600.0, 400.0],
            zoom: 0.5,
            unit: Unit::Px,
            margin: [24.0, 52.0],
            area_border_color: [1.0, 0.27, 0.0, 0.8],
            area_border_width: 2.0,
            format: OutputFormat::Svg,
            orientation: None,
            map_tiles: None,
            qrcode: true,
            copyright_margin: [3.0, 3.0],
            qrcode_margin: [0.0, 0.0],
        }
    }

    pub(crate) fn test_bbox() -> BoundingBox {
        BoundingBox::parse("((61.4779,21.7688),(61.4889,21.8237))").unwrap()
    }

    /// Render one layer to an SVG string for inspection.
    pub(crate) fn render_layer_svg(layer: &dyn Layer, ctx: &RenderContext) -> String {
        let mut canvas = SvgCanvas::new(648.0, 504.0);
        canvas.save();
        layer.draw(ctx, &mut canvas).unwrap();
        canvas.restore();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.svg");
        Box::new(canvas).finish(&path).unwrap();
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_content_parses_request_payload() {
        let content = MapContent::from_json(
            r#"{"areas":[{"path":[[61.48,21.78],[61.48,21.80],[61.485,21.80]]}],"pois":[]}"#,
        )
        .unwrap();
        assert_eq!(content.areas.len(), 1);
        assert_eq!(content.areas[0].path.len(), 3);
        let first = content.areas[0].points().next().unwrap();
        assert!((first.lat - 61.48).abs() < 1e-12);
        assert!((first.lon - 21.78).abs() < 1e-12);
    }

    #[test]
    fn test_content_defaults_to_empty() {
        let content = MapContent::from_json("{}").unwrap();
        assert!(content.areas.is_empty());
        assert!(content.pois.is_empty());
    }

    #[test]
    fn test_compositor_restores_between_layers() {
        struct Scaler;
        impl Layer for Scaler {
            fn name(&self) -> &'static str {
                "scaler"
            }
            fn draw(
                &self,
                _ctx: &RenderContext,
                canvas: &mut dyn Canvas,
            ) -> Result<(), RenderError> {
                canvas.scale(0.1, 0.1);
                Ok(())
            }
        }
        struct Prober;
        impl Layer for Prober {
            fn name(&self) -> &'static str {
                "prober"
            }
            fn draw(
                &self,
                _ctx: &RenderContext,
                canvas: &mut dyn Canvas,
            ) -> Result<(), RenderError> {
                canvas.set_stroke([0.0, 0.0, 0.0, 1.0], 1.0);
                canvas.move_to(100.0, 100.0);
                canvas.line_to(200.0, 100.0);
                canvas.stroke();
                Ok(())
            }
        }

        let style = test_style();
        let ctx = RenderContext::new(&style, test_bbox(), [600.0, 400.0], [648.0, 504.0]);
        let mut canvas = SvgCanvas::new(648.0, 504.0);
        let layers: Vec<Box<dyn Layer>> = vec![Box::new(Scaler), Box::new(Prober)];
        draw_layers(&layers, &ctx, &mut canvas).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        Box::new(canvas).finish(&path).unwrap();
        let out = std::fs::read_to_string(&path).unwrap();
        // The probe's coordinates are unscaled; the first layer's transform
        // did not leak.
        assert!(out.contains("M100,100"), "{}", out);
    }
}
