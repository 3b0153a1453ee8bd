//! Tile fetching into the local raster cache.
//!
//! Turns a set of tile addresses into local PNG files. A tile that cannot be
//! supplied — network failure, non-PNG payload, unwritable cache — is logged
//! and omitted; partial coverage is an accepted degraded result, never a
//! fatal error. Addresses are processed in the set's row-major order so the
//! returned sequence (and therefore drawing order) is deterministic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::scheme::{TileAddress, TileIndexing};
use crate::tile::filename::tile_filename;
use crate::tile::http::HttpClient;

/// Supplies local raster files for tile addresses.
///
/// The URL template uses `{x}`, `{y}` and `{z}` placeholders, substituted
/// with the indices as the remote source numbers them (scheme-converted),
/// while cache filenames always use the canonical address.
pub trait TileFetcher {
    /// Fetch every tile in `tiles`, returning the local paths of those that
    /// could be supplied, in the same deterministic order.
    fn fetch(
        &self,
        cache_dir: &Path,
        url_template: &str,
        headers: &[(String, String)],
        indexing: TileIndexing,
        tiles: &BTreeSet<TileAddress>,
    ) -> Vec<PathBuf>;
}

/// `TileFetcher` backed by an [`HttpClient`], with a plain-file cache.
///
/// A tile already present in the cache directory is served without touching
/// the network; downloads are validated as PNG before being cached.
pub struct HttpTileFetcher<C: HttpClient> {
    http_client: C,
}

impl<C: HttpClient> HttpTileFetcher<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    fn build_url(url_template: &str, indexing: TileIndexing, addr: TileAddress) -> String {
        let (x, y, z) = indexing.remote_index(addr);
        url_template
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{z}", &z.to_string())
    }

    /// Download one tile into the cache. Any failure is reported as a
    /// skipped tile, not propagated.
    fn download(
        &self,
        addr: TileAddress,
        path: &Path,
        url_template: &str,
        headers: &[(String, String)],
        indexing: TileIndexing,
    ) -> bool {
        let url = Self::build_url(url_template, indexing, addr);
        let bytes = match self.http_client.get(&url, headers) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(tile = ?addr, %url, error = %e, "tile download failed, skipping");
                return false;
            }
        };

        if image::guess_format(&bytes).ok() != Some(image::ImageFormat::Png) {
            warn!(tile = ?addr, %url, "tile payload is not a PNG image, skipping");
            return false;
        }

        if let Err(e) = std::fs::write(path, &bytes) {
            warn!(tile = ?addr, path = %path.display(), error = %e, "cannot cache tile, skipping");
            return false;
        }

        debug!(tile = ?addr, %url, "tile cached");
        true
    }
}

impl<C: HttpClient> TileFetcher for HttpTileFetcher<C> {
    fn fetch(
        &self,
        cache_dir: &Path,
        url_template: &str,
        headers: &[(String, String)],
        indexing: TileIndexing,
        tiles: &BTreeSet<TileAddress>,
    ) -> Vec<PathBuf> {
        if let Err(e) = std::fs::create_dir_all(cache_dir) {
            warn!(dir = %cache_dir.display(), error = %e, "cannot create tile cache directory");
            return Vec::new();
        }

        let mut files = Vec::new();
        for &addr in tiles {
            let path = cache_dir.join(tile_filename(addr));
            if path.is_file() || self.download(addr, &path, url_template, headers, indexing) {
                files.push(path);
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::http::tests::MockHttpClient;

    /// Minimal valid PNG payload (1×1 white pixel).
    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    fn addresses(addrs: &[(u32, u32, u8)]) -> BTreeSet<TileAddress> {
        addrs
            .iter()
            .map(|&(x, y, z)| TileAddress::new(x, y, z))
            .collect()
    }

    #[test]
    fn test_fetch_downloads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpTileFetcher::new(MockHttpClient::returning(Ok(png_bytes())));
        let tiles = addresses(&[(1, 2, 3), (2, 2, 3)]);

        let files = fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Tms,
            &tiles,
        );

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("1_2_3.png"));
        assert!(files[1].ends_with("2_2_3.png"));
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[test]
    fn test_fetch_serves_cached_tiles_without_download() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1_2_3.png"), png_bytes()).unwrap();

        let fetcher = HttpTileFetcher::new(MockHttpClient::returning(Err("offline".to_string())));
        let files = fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Tms,
            &addresses(&[(1, 2, 3)]),
        );

        assert_eq!(files.len(), 1);
        assert!(fetcher.http_client.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fetch_omits_failed_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpTileFetcher::new(MockHttpClient::returning(Err("HTTP 404".to_string())));

        let files = fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Tms,
            &addresses(&[(1, 2, 3), (2, 2, 3), (3, 2, 3)]),
        );

        assert!(files.is_empty(), "failed tiles must be omitted, not error");
    }

    #[test]
    fn test_fetch_rejects_non_png_payload() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher =
            HttpTileFetcher::new(MockHttpClient::returning(Ok(b"<html>404</html>".to_vec())));

        let files = fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Tms,
            &addresses(&[(1, 2, 3)]),
        );

        assert!(files.is_empty());
    }

    #[test]
    fn test_url_template_uses_scheme_converted_indices() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpTileFetcher::new(MockHttpClient::returning(Ok(png_bytes())));

        fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Google,
            &addresses(&[(5, 3, 4)]),
        );

        let requested = fetcher.http_client.requested.lock().unwrap();
        // Google row for TMS row 3 at zoom 4 is 15 - 3 = 12.
        assert_eq!(requested.as_slice(), ["http://tiles.test/4/5/12.png"]);
    }

    #[test]
    fn test_cache_filename_keeps_canonical_address() {
        // Even under Google indexing the cache file uses the canonical
        // address, so re-renders under a different scheme reuse nothing
        // they should not.
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpTileFetcher::new(MockHttpClient::returning(Ok(png_bytes())));

        let files = fetcher.fetch(
            dir.path(),
            "http://tiles.test/{z}/{x}/{y}.png",
            &[],
            TileIndexing::Google,
            &addresses(&[(5, 3, 4)]),
        );

        assert!(files[0].ends_with("5_3_4.png"));
    }
}
