//! Counting fake engine for pipeline and catalog tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Dataset, EngineError, GeoTransform, RasterEngine, TileFormat, WarpOptions};
use crate::geometry::{Crs, Point, SRS_WGS84};

#[derive(Debug)]
pub(crate) struct FakeDataset {
    geo_transform: GeoTransform,
    spatial_ref: String,
    size: (u32, u32),
    label: String,
}

impl Dataset for FakeDataset {
    fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    fn spatial_ref(&self) -> &str {
        &self.spatial_ref
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Fake engine whose single dataset covers lon -10..50, lat 30..70 in WGS84
/// unless configured otherwise. Encoded tiles are the format name followed by
/// the warp bounds, so different tiles encode differently.
pub(crate) struct FakeEngine {
    geo_transform: GeoTransform,
    spatial_ref: String,
    open_failure: Option<String>,
    transform_failure: Option<String>,
    warp_failure: Option<String>,
    encode_failure: Option<String>,
    warp_delay: Duration,
    opens: AtomicUsize,
    transforms: AtomicUsize,
    warps: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            geo_transform: GeoTransform([-10.0, 1.0, 0.0, 70.0, 0.0, -1.0]),
            spatial_ref: SRS_WGS84.to_string(),
            open_failure: None,
            transform_failure: None,
            warp_failure: None,
            encode_failure: None,
            warp_delay: Duration::ZERO,
            opens: AtomicUsize::new(0),
            transforms: AtomicUsize::new(0),
            warps: AtomicUsize::new(0),
        }
    }

    pub fn with_geo_transform(mut self, gt: GeoTransform) -> Self {
        self.geo_transform = gt;
        self
    }

    pub fn with_spatial_ref(mut self, srs: &str) -> Self {
        self.spatial_ref = srs.to_string();
        self
    }

    pub fn with_open_failure(mut self, message: &str) -> Self {
        self.open_failure = Some(message.to_string());
        self
    }

    pub fn with_transform_failure(mut self, message: &str) -> Self {
        self.transform_failure = Some(message.to_string());
        self
    }

    pub fn with_warp_failure(mut self, message: &str) -> Self {
        self.warp_failure = Some(message.to_string());
        self
    }

    pub fn with_encode_failure(mut self, message: &str) -> Self {
        self.encode_failure = Some(message.to_string());
        self
    }

    pub fn with_warp_delay(mut self, delay: Duration) -> Self {
        self.warp_delay = delay;
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn transforms(&self) -> usize {
        self.transforms.load(Ordering::SeqCst)
    }

    pub fn warps(&self) -> usize {
        self.warps.load(Ordering::SeqCst)
    }
}

impl RasterEngine for FakeEngine {
    type Dataset = FakeDataset;

    fn open(&self, path: &Path) -> Result<FakeDataset, EngineError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.open_failure {
            return Err(EngineError::Open {
                path: path.to_path_buf(),
                message: message.clone(),
            });
        }
        Ok(FakeDataset {
            geo_transform: self.geo_transform,
            spatial_ref: self.spatial_ref.clone(),
            size: (60, 40),
            label: path.display().to_string(),
        })
    }

    /// Identity "reprojection" that still exercises the error path.
    fn transform_points(&self, points: &[Point], _src: &Crs, _dst: &Crs) -> Result<Vec<Point>, EngineError> {
        self.transforms.fetch_add(1, Ordering::SeqCst);
        match &self.transform_failure {
            Some(message) => Err(EngineError::Transform(message.clone())),
            None => Ok(points.to_vec()),
        }
    }

    fn warp(&self, dataset: &FakeDataset, options: &WarpOptions) -> Result<FakeDataset, EngineError> {
        self.warps.fetch_add(1, Ordering::SeqCst);
        if !self.warp_delay.is_zero() {
            std::thread::sleep(self.warp_delay);
        }
        if let Some(message) = &self.warp_failure {
            return Err(EngineError::Warp(message.clone()));
        }
        let b = &options.output_bounds;
        Ok(FakeDataset {
            geo_transform: GeoTransform::IDENTITY,
            spatial_ref: options.target_crs.to_string(),
            size: (options.width, options.height),
            label: format!(
                "{}|{:.6},{:.6},{:.6},{:.6}|{}",
                dataset.label, b.min.x, b.min.y, b.max.x, b.max.y, options.resample
            ),
        })
    }

    fn encode(&self, dataset: &FakeDataset, format: TileFormat) -> Result<Vec<u8>, EngineError> {
        if let Some(message) = &self.encode_failure {
            return Err(EngineError::Encode(message.clone()));
        }
        Ok(format!("{}:{}", format, dataset.label).into_bytes())
    }
}
