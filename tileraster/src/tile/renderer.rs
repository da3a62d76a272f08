//! The tile renderer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::{RenderOptions, RenderedTile};
use crate::coord::TileKey;
use crate::engine::RasterEngine;
use crate::error::TileError;
use crate::source::RasterSource;

/// Sidecar files an engine may leave next to a written tile:
/// `<path>.aux.xml` and `<stem>.aux.xml`.
pub fn aux_sidecars(path: &Path) -> [PathBuf; 2] {
    let mut full = path.as_os_str().to_owned();
    full.push(".aux.xml");
    [PathBuf::from(full), path.with_extension("aux.xml")]
}

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling of `path` that a tile is written to before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tile".to_string());
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}-{}.part", name, std::process::id(), seq))
}

fn remove_aux_sidecars(path: &Path) {
    for sidecar in aux_sidecars(path) {
        match fs::remove_file(&sidecar) {
            Ok(()) => trace!(sidecar = %sidecar.display(), "Removed sidecar"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!(sidecar = %sidecar.display(), error = %e, "Could not remove sidecar"),
        }
    }
}

/// Cuts tiles out of raster sources with a shared engine.
///
/// Synchronous: callers in async contexts run it on the blocking pool.
pub struct TileRenderer<E: RasterEngine> {
    engine: Arc<E>,
    options: RenderOptions,
}

impl<E: RasterEngine> TileRenderer<E> {
    pub fn new(engine: Arc<E>, options: RenderOptions) -> Self {
        Self { engine, options }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Validate the request and warp the tile.
    ///
    /// Invalid sources fail with their stored error and tiles outside the
    /// footprint with `TileOutsideSource`, both without calling the engine.
    fn prepare(&self, source: &RasterSource<E::Dataset>, key: &TileKey) -> Result<E::Dataset, TileError> {
        let (dataset, footprint) = source.ready()?;

        if !footprint.intersects_tile(key) {
            return Err(TileError::TileOutsideSource(*key));
        }

        self.engine
            .warp(dataset, &self.options.warp_options(key))
            .map_err(|e| TileError::RenderFailure(e.to_string()))
    }

    /// Render a tile to bytes. Nothing is written to disk.
    pub fn render(&self, source: &RasterSource<E::Dataset>, key: &TileKey) -> Result<RenderedTile, TileError> {
        let warped = self.prepare(source, key)?;
        let data = self
            .engine
            .encode(&warped, self.options.format)
            .map_err(|e| TileError::RenderFailure(e.to_string()))?;

        trace!(source = source.id(), tile = %key, bytes = data.len(), "Rendered tile");
        Ok(RenderedTile::new(data, self.options.format))
    }

    /// Render a tile into a named file.
    ///
    /// The tile is written to a staging file in the same directory and
    /// renamed over `path`, so a failed render leaves any existing file at
    /// `path` untouched and no partial output behind. Auxiliary `.aux.xml`
    /// sidecars next to the output are removed.
    pub fn render_to_file(
        &self,
        source: &RasterSource<E::Dataset>,
        key: &TileKey,
        path: &Path,
    ) -> Result<(), TileError> {
        let warped = self.prepare(source, key)?;

        let staging = staging_path(path);
        let written = self
            .engine
            .write(&warped, self.options.format, &staging)
            .map_err(|e| TileError::RenderFailure(e.to_string()))
            .and_then(|()| {
                fs::rename(&staging, path).map_err(|e| {
                    TileError::RenderFailure(format!("{}: {}", path.display(), e))
                })
            });
        remove_aux_sidecars(&staging);
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        remove_aux_sidecars(path);

        trace!(source = source.id(), tile = %key, path = %path.display(), "Saved tile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::FakeEngine;
    use crate::engine::{GeoTransform, TileFormat};
    use tempfile::TempDir;

    fn renderer(engine: FakeEngine) -> (Arc<FakeEngine>, TileRenderer<FakeEngine>) {
        let engine = Arc::new(engine);
        let renderer = TileRenderer::new(Arc::clone(&engine), RenderOptions::default());
        (engine, renderer)
    }

    #[test]
    fn test_render_inside_footprint() {
        let (engine, renderer) = renderer(FakeEngine::new());
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        let tile = renderer.render(&source, &TileKey::new(3, 4, 2).unwrap()).unwrap();

        assert_eq!(tile.format(), TileFormat::Png);
        assert!(tile.data().starts_with(b"png:ac.tif|0.000000,"));
        assert!(tile.data().ends_with(b"|bilinear"));
        assert_eq!(engine.warps(), 1);
    }

    #[test]
    fn test_outside_footprint_skips_engine() {
        let (engine, renderer) = renderer(FakeEngine::new());
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        let key = TileKey::new(3, 0, 7).unwrap();

        let err = renderer.render(&source, &key).unwrap_err();
        assert_eq!(err, TileError::TileOutsideSource(key));
        assert!(err.is_client_error());
        assert_eq!(engine.warps(), 0);
    }

    #[test]
    fn test_invalid_source_returns_stored_error() {
        let (engine, renderer) = renderer(FakeEngine::new().with_geo_transform(GeoTransform::IDENTITY));
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");

        for _ in 0..3 {
            let err = renderer.render(&source, &TileKey::root()).unwrap_err();
            assert_eq!(err, TileError::MissingGeoreference("geotransform".to_string()));
        }
        assert_eq!(engine.warps(), 0);
        assert_eq!(engine.opens(), 1);
    }

    #[test]
    fn test_warp_failure_is_render_failure() {
        let (engine, renderer) = renderer(FakeEngine::new().with_warp_failure("out of memory"));
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        let err = renderer.render(&source, &TileKey::root()).unwrap_err();
        assert_eq!(err, TileError::RenderFailure("out of memory".to_string()));
        assert!(source.is_ready(), "request errors never poison the source");
    }

    #[test]
    fn test_render_to_file_removes_sidecars() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("3_4_2.png");
        let [full, stem] = aux_sidecars(&out);
        fs::write(&full, "<PAMDataset/>").unwrap();
        fs::write(&stem, "<PAMDataset/>").unwrap();

        let (engine, renderer) = renderer(FakeEngine::new());
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        renderer
            .render_to_file(&source, &TileKey::new(3, 4, 2).unwrap(), &out)
            .unwrap();

        assert!(fs::read(&out).unwrap().starts_with(b"png:"));
        assert!(!full.exists());
        assert!(!stem.exists());
    }

    #[test]
    fn test_render_to_file_outside_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("tile.png");
        let (engine, renderer) = renderer(FakeEngine::new());
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");

        assert!(renderer
            .render_to_file(&source, &TileKey::new(3, 0, 7).unwrap(), &out)
            .is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_failed_write_keeps_existing_tile() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("3_4_2.png");
        fs::write(&out, b"previous tile").unwrap();

        let (engine, renderer) = renderer(FakeEngine::new().with_encode_failure("encoder crashed"));
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        let err = renderer
            .render_to_file(&source, &TileKey::new(3, 4, 2).unwrap(), &out)
            .unwrap_err();

        assert!(matches!(err, TileError::RenderFailure(_)));
        assert_eq!(fs::read(&out).unwrap(), b"previous tile");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_render_to_file_replaces_existing_tile() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("3_4_2.png");
        fs::write(&out, b"previous tile").unwrap();

        let (engine, renderer) = renderer(FakeEngine::new());
        let source = RasterSource::open(engine.as_ref(), "ac", "ac.tif");
        renderer
            .render_to_file(&source, &TileKey::new(3, 4, 2).unwrap(), &out)
            .unwrap();

        assert!(fs::read(&out).unwrap().starts_with(b"png:"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let staging = staging_path(Path::new("/tiles/3/4/2.png"));
        assert_eq!(staging.parent(), Some(Path::new("/tiles/3/4")));
        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".2.png."));
        assert!(name.ends_with(".part"));
        assert_ne!(staging, staging_path(Path::new("/tiles/3/4/2.png")));
    }

    #[test]
    fn test_aux_sidecar_names() {
        let [full, stem] = aux_sidecars(Path::new("/tmp/tile.png"));
        assert_eq!(full, PathBuf::from("/tmp/tile.png.aux.xml"));
        assert_eq!(stem, PathBuf::from("/tmp/tile.aux.xml"));
    }
}
