//! Coordinate-space value types.
//!
//! Four spaces flow through the pipeline, in order:
//!
//! 1. [`GeoPoint`] — geographic degrees. Input paths arrive as `[lat, lon]`
//!    pairs; the Mercator math consumes `(lon, lat)`. The axis swap happens
//!    exactly once, when a `GeoPoint` is constructed from an input pair.
//! 2. [`MercatorPoint`] — spherical-Mercator meters.
//! 3. [`ViewPoint`] — pixels on the oversampled internal canvas
//!    (`map_size / zoom`).
//! 4. [`DevicePoint`] — pixels on the output page, after zoom compensation
//!    and the page margin offset.

use crate::error::RenderError;

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from an input `[lat, lon]` pair.
    ///
    /// This is the single place where the latitude-first input convention
    /// meets the longitude-first projection convention.
    pub fn from_lat_lon_pair(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lon: pair[1],
        }
    }
}

/// Point in spherical-Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
}

/// Point in the base renderer's internal canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    /// Apply the per-layer zoom compensation and the page margin offset,
    /// yielding the final paper-space position.
    pub fn to_device(self, compensation: f64, margin: (f64, f64)) -> DevicePoint {
        DevicePoint {
            x: self.x * compensation + margin.0,
            y: self.y * compensation + margin.1,
        }
    }
}

/// Point on the output page, in paper pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

/// Geographic bounding box in degrees.
///
/// Invariants: `min_lon < max_lon`, `min_lat < max_lat`, and every corner
/// lies inside the Web Mercator valid range. Immutable once parsed from
/// input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Construct a bounding box, enforcing the ordering and range
    /// invariants. A latitude beyond ±85.05112878 has no Mercator
    /// projection, so it is rejected here rather than producing NaN
    /// geometry downstream.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, RenderError> {
        use crate::coord::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

        let invalid = |reason: &str| RenderError::InvalidBoundingBox {
            input: format!("({min_lon}, {min_lat}, {max_lon}, {max_lat})"),
            reason: reason.to_string(),
        };
        let corner_in_range = |lat: f64, lon: f64| {
            (MIN_LAT..=MAX_LAT).contains(&lat) && (MIN_LON..=MAX_LON).contains(&lon)
        };
        if !corner_in_range(min_lat, min_lon) || !corner_in_range(max_lat, max_lon) {
            return Err(invalid("coordinates outside the Web Mercator valid range"));
        }
        if !(min_lon < max_lon) || !(min_lat < max_lat) {
            return Err(invalid("min corner must be strictly south-west of max corner"));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Parse the input string format `"((lat,lon),(lat,lon))"`, south-west
    /// corner first, north-east corner second, degrees.
    ///
    /// This is the `toString()` format of web map viewport bounds, e.g.
    /// `((61.477925, 21.768811), (61.488948, 21.823743))`.
    pub fn parse(input: &str) -> Result<Self, RenderError> {
        let invalid = |reason: &str| RenderError::InvalidBoundingBox {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = input.split(',').collect();
        if parts.len() != 4 {
            return Err(invalid("expected four comma-separated components"));
        }

        let mut values = [0.0f64; 4];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .trim_matches(|c| c == '(' || c == ')' || c == ' ')
                .parse::<f64>()
                .map_err(|_| invalid("component is not a number"))?;
        }

        let [min_lat, min_lon, max_lat, max_lon] = values;
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// South-west corner.
    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.min_lat, self.min_lon)
    }

    /// North-east corner.
    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.max_lat, self.max_lon)
    }

    /// Geographic center of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Axis-aligned rectangle in spherical-Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl MercBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
