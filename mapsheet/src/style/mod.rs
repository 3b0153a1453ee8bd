//! Print style configuration.
//!
//! Styles live in a JSON file mapping style names to records: paper and map
//! sizes, display zoom, page margins, area border paint, output format, and
//! the optional tile-overlay source. Any length-valued parameter is given in
//! the record's `unit` and converted to pixels on access at 72 px/inch.
//!
//! Structural problems — unreadable file, malformed JSON, unknown style
//! name, out-of-range zoom — are fatal before any drawing starts.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::canvas::OutputFormat;
use crate::error::RenderError;
use crate::scheme::TileIndexing;

/// Measurement unit of length-valued style parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Px,
    Cm,
    Mm,
    In,
}

impl Unit {
    /// Convert a value in this unit to pixels at 72 px/inch.
    pub fn to_px(self, value: f64) -> f64 {
        match self {
            Unit::Px => value,
            Unit::Cm => value * 72.0 / 2.54,
            Unit::Mm => value * 72.0 / 25.4,
            Unit::In => value * 72.0,
        }
    }
}

/// Remote tile source for the tile overlay layer.
#[derive(Debug, Clone, Deserialize)]
pub struct TileSource {
    /// Addressing convention the source numbers its tiles with.
    pub indexing: TileIndexing,
    /// URL template with `{x}`, `{y}`, `{z}` placeholders.
    pub url: String,
    /// Extra HTTP headers (e.g. a referer the source requires).
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

impl TileSource {
    /// Headers as ordered pairs for the HTTP client.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .http_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        pairs
    }
}

fn default_true() -> bool {
    true
}

fn default_copyright_margin() -> [f64; 2] {
    [3.0, 3.0]
}

/// One named print style.
#[derive(Debug, Clone, Deserialize)]
pub struct Style {
    /// Page size `[w, h]` in `unit`.
    pub paper_size: [f64; 2],
    /// Map footprint on the page `[w, h]` in `unit`.
    pub map_size: [f64; 2],
    /// Display zoom in `(0, 1]`; the internal canvas is oversampled by its
    /// reciprocal.
    pub zoom: f64,
    #[serde(default)]
    pub unit: Unit,
    /// Page margin `[x, y]` in `unit`.
    #[serde(default)]
    pub margin: [f64; 2],
    /// Area border stroke as `[r, g, b, a]` components in `0..=1`.
    pub area_border_color: [f64; 4],
    /// Area border stroke width in map pixels.
    pub area_border_width: f64,
    #[serde(default)]
    pub format: OutputFormat,
    /// `"auto"` swaps paper/map orientation for portrait extents.
    #[serde(default)]
    pub orientation: Option<String>,
    /// Tile overlay source; the overlay is disabled when absent.
    #[serde(default)]
    pub map_tiles: Option<TileSource>,
    /// Whether a supplied QR code is stamped onto the sheet.
    #[serde(default = "default_true")]
    pub qrcode: bool,
    /// Copyright notice inset `[x, y]` in `unit`.
    #[serde(default = "default_copyright_margin")]
    pub copyright_margin: [f64; 2],
    /// QR stamp inset `[x, y]` in `unit`.
    #[serde(default)]
    pub qrcode_margin: [f64; 2],
}

impl Style {
    pub fn paper_size_px(&self) -> [f64; 2] {
        self.paper_size.map(|v| self.unit.to_px(v))
    }

    pub fn map_size_px(&self) -> [f64; 2] {
        self.map_size.map(|v| self.unit.to_px(v))
    }

    pub fn margin_px(&self) -> [f64; 2] {
        self.margin.map(|v| self.unit.to_px(v))
    }

    pub fn copyright_margin_px(&self) -> [f64; 2] {
        self.copyright_margin.map(|v| self.unit.to_px(v))
    }

    pub fn qrcode_margin_px(&self) -> [f64; 2] {
        self.qrcode_margin.map(|v| self.unit.to_px(v))
    }

    /// Whether paper/map orientation follows the extent's aspect ratio.
    pub fn auto_orientation(&self) -> bool {
        self.orientation.as_deref() == Some("auto")
    }

    fn validate(&self, name: &str) -> Result<(), RenderError> {
        let invalid = |reason: &str| RenderError::InvalidStyle {
            style: name.to_string(),
            reason: reason.to_string(),
        };
        if !(self.zoom > 0.0 && self.zoom <= 1.0) {
            return Err(invalid("zoom must be in (0, 1]"));
        }
        if self.paper_size.iter().any(|&v| v <= 0.0) || self.map_size.iter().any(|&v| v <= 0.0) {
            return Err(invalid("paper_size and map_size must be positive"));
        }
        Ok(())
    }
}

/// The parsed style file: a mapping from style name to [`Style`].
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
}

impl StyleSheet {
    /// Style used when the caller does not name one.
    pub const DEFAULT_STYLE: &'static str = "default";

    /// Load and parse a style file.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read_to_string(path).map_err(|e| RenderError::StyleFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&data).map_err(|e| RenderError::StyleFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse a style sheet from a JSON string.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Look up a style by name, falling back to [`Self::DEFAULT_STYLE`].
    pub fn get(&self, name: Option<&str>) -> Result<&Style, RenderError> {
        let name = name.unwrap_or(Self::DEFAULT_STYLE);
        let style = self
            .styles
            .get(name)
            .ok_or_else(|| RenderError::UnknownStyle(name.to_string()))?;
        style.validate(name)?;
        Ok(style)
    }
}
