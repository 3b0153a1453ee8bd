//! Coordinate conversion module
//!
//! Provides the deterministic conversions between the four coordinate spaces
//! of the render pipeline: geographic degrees, spherical-Mercator meters,
//! internal view pixels, and paper-space device pixels.
//!
//! The projection is spherical Mercator on a sphere of radius 6378137 m with
//! no datum shift — the projection used by web map tile sets.

mod types;

pub use types::{BoundingBox, DevicePoint, GeoPoint, MercBounds, MercatorPoint, ViewPoint};

use std::f64::consts::PI;

/// Earth radius of the spherical-Mercator sphere, in meters.
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Half the Mercator world span: the projected coordinate of longitude 180°.
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS_M;

/// Northernmost latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Southernmost latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Forward spherical-Mercator projection.
///
/// Exact inverse of [`unproject`] within floating-point tolerance.
#[inline]
pub fn project(geo: GeoPoint) -> MercatorPoint {
    let x = geo.lon * ORIGIN_SHIFT / 180.0;
    let y = ((90.0 + geo.lat) * PI / 360.0).tan().ln() / (PI / 180.0) * ORIGIN_SHIFT / 180.0;
    MercatorPoint { x, y }
}

/// Inverse spherical-Mercator projection.
#[inline]
pub fn unproject(merc: MercatorPoint) -> GeoPoint {
    let lon = merc.x / ORIGIN_SHIFT * 180.0;
    let lat = 180.0 / PI * (2.0 * (merc.y / ORIGIN_SHIFT * PI).exp().atan() - PI / 2.0);
    GeoPoint { lat, lon }
}

/// Project a geographic bounding box into Mercator meters.
pub fn project_bounds(bbox: &BoundingBox) -> MercBounds {
    let sw = project(bbox.south_west());
    let ne = project(bbox.north_east());
    MercBounds {
        min_x: sw.x,
        min_y: sw.y,
        max_x: ne.x,
        max_y: ne.y,
    }
}

/// Affine mapping from projected Mercator meters to the internal canvas.
///
/// Mirrors the base renderer's `zoom_to_box` behavior: the requested bounds
/// are grown (never shrunk) to match the canvas aspect ratio, so the scale
/// is uniform in x and y and the requested extent is always fully visible.
/// The y axis flips: Mercator y grows northward, canvas y grows downward.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    bounds: MercBounds,
    scale: f64,
    width: f64,
    height: f64,
}

impl ViewTransform {
    /// Build the transform for an internal canvas of `width` × `height`
    /// pixels showing at least `bounds`.
    pub fn new(bounds: MercBounds, width: f64, height: f64) -> Self {
        let canvas_aspect = width / height;
        let bounds_aspect = bounds.width() / bounds.height();

        let mut grown = bounds;
        if bounds_aspect > canvas_aspect {
            // Too wide for the canvas: grow vertically around the center.
            let new_height = bounds.width() / canvas_aspect;
            let pad = (new_height - bounds.height()) / 2.0;
            grown.min_y -= pad;
            grown.max_y += pad;
        } else {
            let new_width = bounds.height() * canvas_aspect;
            let pad = (new_width - bounds.width()) / 2.0;
            grown.min_x -= pad;
            grown.max_x += pad;
        }

        let scale = width / grown.width();
        Self {
            bounds: grown,
            scale,
            width,
            height,
        }
    }

    /// Map a projected point into internal canvas pixels.
    #[inline]
    pub fn to_view(&self, merc: MercatorPoint) -> ViewPoint {
        ViewPoint {
            x: (merc.x - self.bounds.min_x) * self.scale,
            y: (self.bounds.max_y - merc.y) * self.scale,
        }
    }

    /// The grown Mercator bounds actually shown on the canvas.
    pub fn bounds(&self) -> MercBounds {
        self.bounds
    }

    /// Pixels per Mercator meter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Internal canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Internal canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }
}
