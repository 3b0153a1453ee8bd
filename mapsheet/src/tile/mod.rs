//! Tile rasters: cache filenames, HTTP access, and fetching.
//!
//! The scheme module decides *which* tiles cover a bounding box; this module
//! turns those addresses into local PNG files. The network side sits behind
//! two seams: [`HttpClient`] for the transport and [`TileFetcher`] for the
//! cache-or-download policy, so the tile overlay can be tested without a
//! tile server.

mod fetcher;
mod filename;
mod http;

pub use fetcher::{HttpTileFetcher, TileFetcher};
pub use filename::{parse_tile_filename, tile_filename, TILE_EXTENSION};
pub use http::{HttpClient, ReqwestClient};

#[cfg(test)]
pub use http::tests::MockHttpClient;
