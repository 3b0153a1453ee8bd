//! Shared per-render state handed to every layer.

use crate::coord::{project, project_bounds, BoundingBox, GeoPoint, ViewPoint, ViewTransform};
use crate::style::Style;

/// Everything a layer needs to place itself on the sheet: the resolved
/// style, the geographic extent, and the Mercator-to-view transform over
/// the oversampled internal canvas.
///
/// The internal canvas is `map_size / zoom` pixels; layers that draw in
/// view pixels scale themselves by `zoom` so their output lands in the
/// map's on-paper footprint.
pub struct RenderContext<'a> {
    style: &'a Style,
    bbox: BoundingBox,
    view: ViewTransform,
    map_size: [f64; 2],
    paper_size: [f64; 2],
}

impl<'a> RenderContext<'a> {
    /// Build the context for one render.
    ///
    /// `map_size` and `paper_size` are on-paper pixels, already swapped if
    /// the style's orientation is automatic.
    pub fn new(
        style: &'a Style,
        bbox: BoundingBox,
        map_size: [f64; 2],
        paper_size: [f64; 2],
    ) -> Self {
        let oversample = 1.0 / style.zoom;
        let view = ViewTransform::new(
            project_bounds(&bbox),
            oversample * map_size[0],
            oversample * map_size[1],
        );
        Self {
            style,
            bbox,
            view,
            map_size,
            paper_size,
        }
    }

    pub fn style(&self) -> &Style {
        self.style
    }

    /// The requested geographic extent.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Display zoom from the style, in `(0, 1]`.
    pub fn zoom(&self) -> f64 {
        self.style.zoom
    }

    /// On-paper map footprint in page pixels.
    pub fn map_size(&self) -> [f64; 2] {
        self.map_size
    }

    /// Page size in pixels.
    pub fn paper_size(&self) -> [f64; 2] {
        self.paper_size
    }

    /// Project a geographic point onto the internal canvas.
    pub fn to_view(&self, geo: GeoPoint) -> ViewPoint {
        self.view.to_view(project(geo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::OutputFormat;
    use crate::style::Unit;

    fn style(zoom: f64) -> Style {
        Style {
            paper_size: [648.0, 504.0],
            map_size: [600.0, 400.0],
            zoom,
            unit: Unit::Px,
            margin: [24.0, 52.0],
            area_border_color: [1.0, 0.27, 0.0, 0.8],
            area_border_width: 2.0,
            format: OutputFormat::Pdf,
            orientation: None,
            map_tiles: None,
            qrcode: true,
            copyright_margin: [3.0, 3.0],
            qrcode_margin: [0.0, 0.0],
        }
    }

    #[test]
    fn test_internal_canvas_is_oversampled() {
        let s = style(0.5);
        let bbox = BoundingBox::parse("((61.4779,21.7688),(61.4889,21.8237))").unwrap();
        let ctx = RenderContext::new(&s, bbox, [600.0, 400.0], [648.0, 504.0]);
        assert!((ctx.view().width() - 1200.0).abs() < 1e-9);
        assert!((ctx.view().height() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_one_means_no_oversampling() {
        let s = style(1.0);
        let bbox = BoundingBox::parse("((61.4779,21.7688),(61.4889,21.8237))").unwrap();
        let ctx = RenderContext::new(&s, bbox, [600.0, 400.0], [648.0, 504.0]);
        assert!((ctx.view().width() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_corners_land_on_canvas() {
        let s = style(0.5);
        let bbox = BoundingBox::parse("((61.4779,21.7688),(61.4889,21.8237))").unwrap();
        let ctx = RenderContext::new(&s, bbox, [600.0, 400.0], [648.0, 504.0]);

        let sw = ctx.to_view(bbox.south_west());
        let ne = ctx.to_view(bbox.north_east());
        for v in [sw, ne] {
            assert!(v.x >= -1e-6 && v.x <= ctx.view().width() + 1e-6);
            assert!(v.y >= -1e-6 && v.y <= ctx.view().height() + 1e-6);
        }
        // North is up: the north-east corner has the smaller y.
        assert!(ne.y < sw.y);
        assert!(ne.x > sw.x);
    }

    #[test]
    fn test_center_stays_registered_under_compensation() {
        let s = style(0.5);
        let bbox = BoundingBox::parse("((61.4779,21.7688),(61.4889,21.8237))").unwrap();
        let ctx = RenderContext::new(&s, bbox, [600.0, 400.0], [648.0, 504.0]);

        // The extent's center, compensated and margin-offset, lands within a
        // pixel of the on-paper map footprint's center.
        let d = ctx.to_view(bbox.center()).to_device(ctx.zoom(), (24.0, 52.0));
        assert!((d.x - (24.0 + 300.0)).abs() < 1.0, "x was {}", d.x);
        assert!((d.y - (52.0 + 200.0)).abs() < 1.0, "y was {}", d.y);
    }
}
