//! Render pipeline error types.
//!
//! Errors split into two families: structural/configuration errors that abort
//! the whole render before any drawing (bad bounding box, unknown style,
//! unreadable style sheet), and per-item errors that are absorbed locally
//! so a render degrades instead of failing (a tile that cannot be fetched, an
//! area path with too few points).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while compositing a map sheet.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bounding box input string could not be parsed. Fatal.
    #[error("invalid bounding box {input:?}: {reason}")]
    InvalidBoundingBox { input: String, reason: String },

    /// The requested style name is not present in the style sheet. Fatal.
    #[error("unknown style {0:?}")]
    UnknownStyle(String),

    /// The style sheet file could not be read or parsed. Fatal.
    #[error("style sheet {}: {reason}", path.display())]
    StyleFile { path: PathBuf, reason: String },

    /// A style record holds an out-of-range value (e.g. zoom outside (0, 1]). Fatal.
    #[error("invalid style {style:?}: {reason}")]
    InvalidStyle { style: String, reason: String },

    /// A tile address is outside the valid range for its zoom level.
    /// Recoverable: the tile is skipped.
    #[error("invalid tile address ({x}, {y}, {z})")]
    InvalidTileAddress { x: u32, y: u32, z: u8 },

    /// A tile could not be fetched or decoded. Recoverable: the tile is
    /// skipped and the overlay degrades.
    #[error("tile fetch failed: {0}")]
    TileFetch(String),

    /// The drawing surface could not be constructed or finalized. Fatal.
    #[error("canvas error: {0}")]
    Canvas(String),

    /// I/O failure writing the output document. Fatal.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
