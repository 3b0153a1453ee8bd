//! Tile addressing schemes.
//!
//! Translates between integer tile addresses and geographic bounding boxes,
//! and enumerates the tiles covering a bounding box at a chosen zoom level.
//!
//! Addresses are canonical TMS-style pyramid coordinates: `x` grows eastward,
//! `y` grows northward from the south-west corner of the Mercator world, and
//! tiles are 256×256 px. The three indexing conventions share this canonical
//! form and differ only in the row/column/zoom formula applied when the
//! address is substituted into a remote tile URL:
//!
//! - **TMS** — identity.
//! - **Google** — origin at the north-west corner, row mirrored:
//!   `y' = 2^z - 1 - y`.
//! - **F** — a tile source with its own origin and inverted zoom axis:
//!   `x' = x - 2^(z-1)`, `y' = y - 2^(z-1)`, `z' = 18 - z`.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::coord::{project, project_bounds, BoundingBox, GeoPoint, MercatorPoint, ORIGIN_SHIFT};
use crate::error::RenderError;

/// Native tile raster width/height in pixels.
pub const TILE_SIZE: u32 = 256;

/// Coarsest zoom level considered when covering a bounding box.
pub const MIN_ZOOM: u8 = 1;

/// Finest zoom level supported by the tile pyramid.
pub const MAX_ZOOM: u8 = 18;

/// Canonical tile address: column, TMS row, zoom.
///
/// Ordering is row-major within a zoom level (`z`, then `y`, then `x`), so a
/// `BTreeSet` of addresses iterates in deterministic drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Column, increasing eastward.
    pub x: u32,
    /// Row, increasing northward (TMS convention).
    pub y: u32,
    /// Zoom level.
    pub z: u8,
}

impl TileAddress {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

impl Ord for TileAddress {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.z, self.y, self.x).cmp(&(other.z, other.y, other.x))
    }
}

impl PartialOrd for TileAddress {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Tile indexing convention of a remote tile source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileIndexing {
    Google,
    Tms,
    F,
}

/// Meters per pixel at the given zoom level.
#[inline]
fn resolution(z: u8) -> f64 {
    2.0 * ORIGIN_SHIFT / (TILE_SIZE as f64 * 2.0_f64.powi(z as i32))
}

/// Canonical tile containing the given geographic point at zoom `z`.
///
/// The result is clamped into the valid pyramid range, so points on the
/// east/north world edge fall into the last tile instead of one past it.
fn tile_at(geo: GeoPoint, z: u8) -> (u32, u32) {
    let merc = project(geo);
    let res = resolution(z);
    let px = (merc.x + ORIGIN_SHIFT) / res;
    let py = (merc.y + ORIGIN_SHIFT) / res;
    let max_index = (1u64 << z) - 1;
    let tx = ((px / TILE_SIZE as f64).floor().max(0.0) as u64).min(max_index) as u32;
    let ty = ((py / TILE_SIZE as f64).floor().max(0.0) as u64).min(max_index) as u32;
    (tx, ty)
}

impl TileIndexing {
    /// Check that an address lies inside the valid pyramid range.
    pub fn validate(&self, addr: TileAddress) -> Result<(), RenderError> {
        let invalid = RenderError::InvalidTileAddress {
            x: addr.x,
            y: addr.y,
            z: addr.z,
        };
        if addr.z < MIN_ZOOM || addr.z > MAX_ZOOM {
            return Err(invalid);
        }
        let side = 1u64 << addr.z;
        if addr.x as u64 >= side || addr.y as u64 >= side {
            return Err(invalid);
        }
        Ok(())
    }

    /// Geographic bounding box of a tile.
    ///
    /// Exact inverse of the enumeration step: for any valid address `a`,
    /// `tiles_covering_at_zoom(tile_bounds(a), a.z)` contains `a`.
    pub fn tile_bounds(&self, addr: TileAddress) -> BoundingBox {
        let res = resolution(addr.z);
        let tile_span = TILE_SIZE as f64 * res;
        let min_x = addr.x as f64 * tile_span - ORIGIN_SHIFT;
        let min_y = addr.y as f64 * tile_span - ORIGIN_SHIFT;
        let sw = crate::coord::unproject(MercatorPoint { x: min_x, y: min_y });
        let ne = crate::coord::unproject(MercatorPoint {
            x: min_x + tile_span,
            y: min_y + tile_span,
        });
        BoundingBox {
            min_lon: sw.lon,
            min_lat: sw.lat,
            max_lon: ne.lon,
            max_lat: ne.lat,
        }
    }

    /// Every tile whose footprint overlaps `bbox` at zoom `z`, in
    /// deterministic row-major order.
    pub fn tiles_covering_at_zoom(&self, bbox: &BoundingBox, z: u8) -> BTreeSet<TileAddress> {
        let (min_x, min_y) = tile_at(bbox.south_west(), z);
        let (max_x, max_y) = tile_at(bbox.north_east(), z);

        let mut tiles = BTreeSet::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                tiles.insert(TileAddress::new(x, y, z));
            }
        }
        tiles
    }

    /// Every tile needed to cover `bbox` when the box is drawn
    /// `target_px_width` pixels wide.
    ///
    /// The zoom level is the one whose native 256-px tile resolution is
    /// nearest the requested width in log space; an exact tie prefers the
    /// coarser zoom to bound fetch volume.
    pub fn tiles_covering(&self, bbox: &BoundingBox, target_px_width: u32) -> BTreeSet<TileAddress> {
        let z = select_zoom(bbox, target_px_width);
        tracing::debug!(zoom = z, target_px_width, "selected tile zoom level");
        self.tiles_covering_at_zoom(bbox, z)
    }

    /// Row/column/zoom as the remote tile source numbers them.
    ///
    /// Signed: the F convention can produce negative indices west/south of
    /// its origin.
    pub fn remote_index(&self, addr: TileAddress) -> (i64, i64, i64) {
        let (x, y, z) = (addr.x as i64, addr.y as i64, addr.z as i64);
        match self {
            TileIndexing::Tms => (x, y, z),
            TileIndexing::Google => (x, (1 << addr.z) - 1 - y, z),
            TileIndexing::F => {
                let half = 1i64 << (addr.z - 1);
                (x - half, y - half, MAX_ZOOM as i64 - z)
            }
        }
    }
}

/// Zoom level whose native tile resolution best approximates rendering
/// `bbox` at `target_px_width` pixels.
fn select_zoom(bbox: &BoundingBox, target_px_width: u32) -> u8 {
    let merc_width = project_bounds(bbox).width();
    let target = target_px_width.max(1) as f64;
    // Pixel width of the bbox when rendered from native tiles at zoom z is
    // merc_width / resolution(z); solve for the real-valued z matching the
    // target, then round, preferring the coarser level on an exact tie.
    let z_real = (target * resolution(0) / merc_width).log2();
    let floor = z_real.floor();
    let frac = z_real - floor;
    let rounded = if frac > 0.5 { floor + 1.0 } else { floor };
    rounded.clamp(MIN_ZOOM as f64, MAX_ZOOM as f64) as u8
}
