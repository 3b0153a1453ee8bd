//! Mapsheet - Printable map sheet compositor
//!
//! This library turns a geographic bounding box, a named print style and
//! overlay content into a finished PDF or SVG sheet: it projects the extent
//! through spherical Mercator, fetches raster tiles where the style asks
//! for them, and composites the layer stack onto paper with a page margin
//! and a zoom-compensated map footprint.

pub mod canvas;
pub mod coord;
pub mod error;
pub mod layer;
pub mod render;
pub mod scheme;
pub mod style;
pub mod tile;

pub use error::RenderError;
pub use render::{RenderRequest, Renderer};
