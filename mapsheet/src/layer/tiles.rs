//! Tile overlay layer.

use std::path::PathBuf;

use tracing::warn;

use crate::canvas::Canvas;
use crate::coord::GeoPoint;
use crate::error::RenderError;
use crate::layer::Layer;
use crate::render::RenderContext;
use crate::scheme::TILE_SIZE;
use crate::tile::{parse_tile_filename, TileFetcher};

/// Draws remote raster tiles under the vector overlays.
///
/// Tile selection targets the internal canvas width, so the chosen zoom
/// level accounts for oversampling. Each tile is placed by projecting its
/// north-west and south-east corners into view pixels and scaling the
/// 256-px raster to span them; a tile that cannot be parsed, validated or
/// decoded is skipped with a warning, leaving a gap rather than failing
/// the sheet.
pub struct TileOverlayLayer<F: TileFetcher> {
    fetcher: F,
    cache_dir: PathBuf,
}

impl<F: TileFetcher> TileOverlayLayer<F> {
    pub fn new(fetcher: F, cache_dir: PathBuf) -> Self {
        Self { fetcher, cache_dir }
    }
}

impl<F: TileFetcher> Layer for TileOverlayLayer<F> {
    fn name(&self) -> &'static str {
        "tiles"
    }

    fn draw(&self, ctx: &RenderContext, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let Some(source) = ctx.style().map_tiles.as_ref() else {
            return Ok(());
        };

        let target_width = ctx.view().width().round() as u32;
        let tiles = source.indexing.tiles_covering(ctx.bbox(), target_width);
        let headers = source.header_pairs();
        let files = self
            .fetcher
            .fetch(&self.cache_dir, &source.url, &headers, source.indexing, &tiles);

        let zoom = ctx.zoom();
        for file in files {
            let addr = parse_tile_filename(&file);
            if let Err(e) = source.indexing.validate(addr) {
                warn!(file = %file.display(), error = %e, "skipping unusable tile cache entry");
                continue;
            }

            let bounds = source.indexing.tile_bounds(addr);
            let nw = ctx.to_view(GeoPoint::new(bounds.max_lat, bounds.min_lon));
            let se = ctx.to_view(GeoPoint::new(bounds.min_lat, bounds.max_lon));
            let tile_scale = (se.x - nw.x) / TILE_SIZE as f64;

            canvas.save();
            canvas.scale(zoom, zoom);
            canvas.scale(tile_scale, tile_scale);
            if let Err(e) = canvas.draw_image(&file, nw.x / tile_scale, nw.y / tile_scale) {
                warn!(file = %file.display(), error = %e, "skipping undrawable tile");
            }
            canvas.restore();
        }
        Ok(())
    }
}
