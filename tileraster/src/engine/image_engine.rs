//! Pure-Rust raster engine built on the `image` crate.
//!
//! Georeference comes from sidecar files next to the raster: an ESRI world
//! file (`.pgw`, `.jgw`, `.tfw`, `.wld`, ...) for the geotransform and a
//! `.prj` file holding a PROJ.4 string or `EPSG:<code>` for the spatial
//! reference. Rasters without sidecars open fine but report the identity
//! geotransform and an empty spatial reference.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, trace};

use super::{
    parse_world_file, transform_points, world_file_candidates, Dataset, EngineError, GeoTransform,
    RasterEngine, Reprojection, ResampleKind, TileFormat, WarpOptions,
};
use crate::geometry::{Crs, GeoBox, Point};

/// Default JPEG quality (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// In-memory RGBA raster with its georeference.
#[derive(Debug, Clone)]
pub struct ImageDataset {
    pixels: RgbaImage,
    geo_transform: GeoTransform,
    spatial_ref: String,
}

impl ImageDataset {
    pub fn new(pixels: RgbaImage, geo_transform: GeoTransform, spatial_ref: impl Into<String>) -> Self {
        Self {
            pixels,
            geo_transform,
            spatial_ref: spatial_ref.into(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl Dataset for ImageDataset {
    fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    fn spatial_ref(&self) -> &str {
        &self.spatial_ref
    }

    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Raster engine backed by the `image` crate and proj4rs.
#[derive(Debug, Clone)]
pub struct ImageEngine {
    jpeg_quality: u8,
}

impl Default for ImageEngine {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JPEG quality (clamped to 1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

/// Read the first world file that exists next to `path`.
fn read_world_file(path: &Path) -> Result<Option<GeoTransform>, EngineError> {
    for candidate in world_file_candidates(path) {
        match fs::read_to_string(&candidate) {
            Ok(text) => {
                trace!(world_file = %candidate.display(), "Reading world file");
                return parse_world_file(&text).map(Some);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(EngineError::Io(e)),
        }
    }
    Ok(None)
}

/// Read the `.prj` sidecar, if any.
fn read_projection(path: &Path) -> Result<Option<String>, EngineError> {
    match fs::read_to_string(path.with_extension("prj")) {
        Ok(text) => Ok(Some(text.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EngineError::Io(e)),
    }
}

fn sample(image: &RgbaImage, col: f64, row: f64, resample: ResampleKind) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    if !(col >= 0.0 && row >= 0.0 && col < f64::from(width) && row < f64::from(height)) {
        return TRANSPARENT;
    }
    match resample {
        ResampleKind::Nearest => *image.get_pixel(col as u32, row as u32),
        ResampleKind::Bilinear => bilinear(image, col, row),
    }
}

/// Bilinear interpolation between the four nearest pixel centres, clamped at
/// the raster edge.
fn bilinear(image: &RgbaImage, col: f64, row: f64) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    let u = (col - 0.5).max(0.0);
    let v = (row - 0.5).max(0.0);
    let x0 = (u.floor() as u32).min(width - 1);
    let y0 = (v.floor() as u32).min(height - 1);
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = (u - f64::from(x0)).clamp(0.0, 1.0);
    let fy = (v - f64::from(y0)).clamp(0.0, 1.0);

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

impl RasterEngine for ImageEngine {
    type Dataset = ImageDataset;

    fn open(&self, path: &Path) -> Result<ImageDataset, EngineError> {
        let start = Instant::now();
        let pixels = image::open(path)
            .map_err(|e| EngineError::Open {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();

        let geo_transform = read_world_file(path)?.unwrap_or(GeoTransform::IDENTITY);
        let spatial_ref = read_projection(path)?.unwrap_or_default();

        debug!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            georeferenced = !geo_transform.is_identity(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Opened raster"
        );

        Ok(ImageDataset::new(pixels, geo_transform, spatial_ref))
    }

    fn transform_points(
        &self,
        points: &[Point],
        src: &Crs,
        dst: &Crs,
    ) -> Result<Vec<Point>, EngineError> {
        transform_points(points, src, dst)
    }

    fn warp(&self, dataset: &ImageDataset, options: &WarpOptions) -> Result<ImageDataset, EngineError> {
        let (width, height) = (options.width, options.height);
        if width == 0 || height == 0 {
            return Err(EngineError::Warp(format!(
                "output size {}x{} is empty",
                width, height
            )));
        }
        if dataset.spatial_ref().trim().is_empty() {
            return Err(EngineError::Warp("source has no spatial reference".to_string()));
        }
        let source_crs = Crs::new(dataset.spatial_ref());
        let source_gt = dataset.geo_transform();
        if source_gt.invert(Point::new(0.0, 0.0)).is_none() {
            return Err(EngineError::Warp("source geotransform is not invertible".to_string()));
        }

        // Output extent in the target CRS.
        let bounds = &options.output_bounds;
        let corners = transform_points(&bounds.corners(), &bounds.crs, &options.target_crs)?;
        let extent = GeoBox::enclosing(&corners, options.target_crs.clone())
            .ok_or_else(|| EngineError::Warp("empty output bounds".to_string()))?;
        let target_gt = GeoTransform::north_up(
            Point::new(extent.min.x, extent.max.y),
            extent.width() / f64::from(width),
            extent.height() / f64::from(height),
        );

        let to_source = Reprojection::new(&options.target_crs, &source_crs)?;
        let rows = (0..height)
            .into_par_iter()
            .map(|row| -> Result<Vec<u8>, EngineError> {
                let centres: Vec<Point> = (0..width)
                    .map(|col| target_gt.apply(f64::from(col) + 0.5, f64::from(row) + 0.5))
                    .collect();
                let world = to_source.apply(&centres)?;

                let mut line = Vec::with_capacity(width as usize * 4);
                for p in world {
                    let pixel = match source_gt.invert(p) {
                        Some((src_col, src_row)) => {
                            sample(&dataset.pixels, src_col, src_row, options.resample)
                        }
                        None => TRANSPARENT,
                    };
                    line.extend_from_slice(&pixel.0);
                }
                Ok(line)
            })
            .collect::<Result<Vec<Vec<u8>>, EngineError>>()?;

        let pixels = RgbaImage::from_raw(width, height, rows.concat())
            .ok_or_else(|| EngineError::Warp("output buffer size mismatch".to_string()))?;

        Ok(ImageDataset::new(
            pixels,
            target_gt,
            options.target_crs.as_str(),
        ))
    }

    fn encode(&self, dataset: &ImageDataset, format: TileFormat) -> Result<Vec<u8>, EngineError> {
        let (width, height) = dataset.size();
        let mut buf = Vec::new();
        match format {
            TileFormat::Png => PngEncoder::new(&mut buf)
                .write_image(dataset.pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| EngineError::Encode(e.to_string()))?,
            TileFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(dataset.pixels.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| EngineError::Encode(e.to_string()))?
            }
        }
        Ok(buf)
    }
}
