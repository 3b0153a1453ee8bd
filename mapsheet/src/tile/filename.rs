//! Tile cache filename codec.
//!
//! Cached tile rasters are named `<x>_<y>_<z>.png` using the canonical
//! (TMS-row) address, e.g. `9183_11764_14.png`. Parsing is a narrow boundary
//! adapter: a stem that does not split into exactly three integer components
//! yields the degenerate address `(0, 0, 0)`, which scheme validation later
//! rejects — a malformed cache entry is skipped, never a crash.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::scheme::TileAddress;

/// Raster format tiles are cached in.
pub const TILE_EXTENSION: &str = "png";

/// Cache filename for a tile address.
pub fn tile_filename(addr: TileAddress) -> String {
    format!("{}_{}_{}.{}", addr.x, addr.y, addr.z, TILE_EXTENSION)
}

/// Pattern for `<x>_<y>_<z>` stems.
fn stem_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)_(\d+)_(\d+)$").unwrap())
}

/// Recover a tile address from a cache file path.
///
/// Only the file stem (basename up to the first `.`) is considered, so both
/// `9183_11764_14.png` and `/tmp/tilecache/9183_11764_14.png` parse. Any
/// stem that is not three `_`-separated integers in range produces the
/// degenerate `(0, 0, 0)` address.
pub fn parse_tile_filename(path: &Path) -> TileAddress {
    const DEGENERATE: TileAddress = TileAddress { x: 0, y: 0, z: 0 };

    let stem = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.split('.').next().unwrap_or(""),
        None => return DEGENERATE,
    };

    let captures = match stem_pattern().captures(stem) {
        Some(c) => c,
        None => return DEGENERATE,
    };

    let x = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    let y = captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
    let z = captures.get(3).and_then(|m| m.as_str().parse::<u8>().ok());

    match (x, y, z) {
        (Some(x), Some(y), Some(z)) => TileAddress::new(x, y, z),
        _ => DEGENERATE,
    }
}
