//! The render pipeline.
//!
//! One call turns a bounding box, a style and overlay content into a
//! finished sheet on disk: resolve the style, fix the page orientation,
//! build the coordinate transforms, open a canvas at paper size, draw the
//! layer stack and write the file.

mod context;

pub use context::RenderContext;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::canvas::create_canvas;
use crate::coord::{project_bounds, BoundingBox};
use crate::error::RenderError;
use crate::layer::{
    draw_layers, AreaLayer, BaseMapLayer, BlankBase, CopyrightLayer, Layer, MapContent,
    MapRenderer, QrCodeLayer, TileOverlayLayer,
};
use crate::style::StyleSheet;
use crate::tile::{HttpTileFetcher, ReqwestClient};

/// One sheet to produce.
pub struct RenderRequest {
    /// Geographic extent to show.
    pub bbox: BoundingBox,
    /// Style name; `None` uses the default style.
    pub style: Option<String>,
    /// Areas (and ignored points of interest) to overlay.
    pub content: MapContent,
    /// PNG to stamp in the corner, if any.
    pub qrcode: Option<PathBuf>,
    /// Where to write the sheet; `None` picks a file in the temp directory.
    pub output: Option<PathBuf>,
}

/// Renders map sheets against a loaded style sheet.
pub struct Renderer {
    styles: StyleSheet,
    tile_cache_dir: PathBuf,
    base: Arc<dyn MapRenderer>,
}

impl Renderer {
    pub const DEFAULT_TILE_CACHE_DIR: &'static str = "/tmp/tilecache";

    pub fn new(styles: StyleSheet) -> Self {
        Self {
            styles,
            tile_cache_dir: PathBuf::from(Self::DEFAULT_TILE_CACHE_DIR),
            base: Arc::new(BlankBase),
        }
    }

    pub fn with_tile_cache_dir(mut self, dir: PathBuf) -> Self {
        self.tile_cache_dir = dir;
        self
    }

    /// Replace the blank base with a cartographic renderer.
    pub fn with_base_renderer(mut self, base: Arc<dyn MapRenderer>) -> Self {
        self.base = base;
        self
    }

    /// Produce one sheet, returning the path it was written to.
    pub fn render(&self, request: RenderRequest) -> Result<PathBuf, RenderError> {
        let style = self.styles.get(request.style.as_deref())?;

        let mut paper = style.paper_size_px();
        let mut map = style.map_size_px();
        let merc = project_bounds(&request.bbox);
        if style.auto_orientation() && merc.width() / merc.height() < 1.0 {
            // Portrait extent on a landscape style: flip the page.
            paper.swap(0, 1);
            map.swap(0, 1);
        }

        let ctx = RenderContext::new(style, request.bbox, map, paper);
        let mut canvas = create_canvas(style.format, paper[0], paper[1])?;

        let margin = style.margin_px();
        canvas.translate(margin[0], margin[1]);

        let mut layers: Vec<Box<dyn Layer>> = Vec::new();
        layers.push(Box::new(BaseMapLayer::new(Arc::clone(&self.base))));
        if style.map_tiles.is_some() {
            let fetcher = HttpTileFetcher::new(ReqwestClient::new()?);
            layers.push(Box::new(TileOverlayLayer::new(
                fetcher,
                self.tile_cache_dir.clone(),
            )));
        }
        layers.push(Box::new(AreaLayer::new(request.content.areas.clone())));
        layers.push(Box::new(CopyrightLayer::new()));
        if style.qrcode {
            if let Some(png) = &request.qrcode {
                layers.push(Box::new(QrCodeLayer::new(png.clone())));
            }
        }

        draw_layers(&layers, &ctx, canvas.as_mut())?;

        let output = request
            .output
            .unwrap_or_else(|| temp_output_path(style.format.extension()));
        canvas.finish(&output)?;
        info!(output = %output.display(), format = ?style.format, "sheet rendered");
        Ok(output)
    }
}

/// A fresh file name in the system temp directory, unique per render.
fn temp_output_path(extension: &str) -> PathBuf {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "mapsheet-{}-{}.{}",
        std::process::id(),
        n,
        extension
    ))
}
