//! Mapsheet CLI - render printable map sheets.
//!
//! Reads overlay content as JSON on stdin, renders the requested extent
//! with the named print style, and prints the path of the finished sheet
//! on stdout. Logs go to stderr so stdout stays machine-readable.
//!
//! Example:
//!
//! ```text
//! echo '{"areas":[],"pois":[]}' | mapsheet \
//!     -b "((61.477925, 21.768811), (61.488948, 21.823743))" -s default
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mapsheet::coord::BoundingBox;
use mapsheet::layer::MapContent;
use mapsheet::style::StyleSheet;
use mapsheet::{RenderRequest, Renderer};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a printable map sheet for a bounding box"
)]
struct Args {
    /// Bounding box "((min_lat, min_lon), (max_lat, max_lon))" in degrees
    #[arg(short, long)]
    bbox: String,

    /// Style name from the styles file; omitted means the default style
    #[arg(short, long)]
    style: Option<String>,

    /// QR code PNG to stamp in the map corner
    #[arg(short, long)]
    qrcode: Option<PathBuf>,

    /// Style definitions file
    #[arg(long, default_value = "styles.json")]
    styles_file: PathBuf,

    /// Tile cache directory
    #[arg(long, default_value = Renderer::DEFAULT_TILE_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Output file; a file in the temp directory is used when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(output) => {
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "render failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let bbox = BoundingBox::parse(&args.bbox)?;
    let content = read_content()?;
    let styles = StyleSheet::load(&args.styles_file)?;

    let renderer = Renderer::new(styles).with_tile_cache_dir(args.cache_dir);
    let output = renderer.render(RenderRequest {
        bbox,
        style: args.style,
        content,
        qrcode: args.qrcode,
        output: args.output,
    })?;
    Ok(output)
}

/// Overlay content from stdin; an empty stream means an empty overlay.
fn read_content() -> Result<MapContent, Box<dyn std::error::Error>> {
    let mut data = String::new();
    std::io::stdin().read_to_string(&mut data)?;
    if data.trim().is_empty() {
        return Ok(MapContent::default());
    }
    Ok(MapContent::from_json(&data)?)
}
