//! Coordinate transformation using proj4rs (pure Rust).
//!
//! CRS references are resolved to PROJ.4 strings first: `EPSG:<code>`
//! references through the crs-definitions database, anything else is taken
//! as a PROJ.4 definition verbatim.

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::EngineError;
use crate::geometry::{Crs, Point};

/// Get the PROJ.4 string for a CRS.
fn proj_string(crs: &Crs) -> Result<&str, EngineError> {
    match crs.epsg_code() {
        Some(code) => crs_definitions::from_code(code)
            .map(|def| def.proj4)
            .ok_or_else(|| {
                EngineError::Unsupported(format!(
                    "CRS EPSG:{} (not in the crs-definitions database)",
                    code
                ))
            }),
        None if crs.as_str().starts_with('+') => Ok(crs.as_str()),
        None => Err(EngineError::Unsupported(format!(
            "CRS definition '{}' (expected PROJ.4 or EPSG:<code>)",
            crs
        ))),
    }
}

/// Projection plus whether it works in degrees (proj4rs wants radians).
struct Projection {
    proj: Proj,
    geographic: bool,
}

impl Projection {
    fn new(crs: &Crs) -> Result<Self, EngineError> {
        let definition = proj_string(crs)?;
        let proj = Proj::from_proj_string(definition)
            .map_err(|e| EngineError::Transform(format!("invalid projection '{}': {:?}", crs, e)))?;
        Ok(Self {
            proj,
            geographic: definition.contains("+proj=longlat") || definition.contains("+proj=latlong"),
        })
    }
}

/// A prepared `src` to `dst` transformation, reusable across batches.
pub struct Reprojection {
    src: Crs,
    dst: Crs,
    projections: Option<(Projection, Projection)>,
}

impl Reprojection {
    /// Resolves both CRSs. Equal CRSs need no projection at all.
    pub fn new(src: &Crs, dst: &Crs) -> Result<Self, EngineError> {
        let projections = if src == dst {
            None
        } else {
            Some((Projection::new(src)?, Projection::new(dst)?))
        };
        Ok(Self {
            src: src.clone(),
            dst: dst.clone(),
            projections,
        })
    }

    /// Reprojects `points`.
    ///
    /// Any point that fails to transform, or lands on a non-finite
    /// coordinate, fails the whole batch.
    pub fn apply(&self, points: &[Point]) -> Result<Vec<Point>, EngineError> {
        let Some((source, target)) = &self.projections else {
            return Ok(points.to_vec());
        };

        points
            .iter()
            .map(|p| {
                let mut point = if source.geographic {
                    (p.x.to_radians(), p.y.to_radians(), 0.0)
                } else {
                    (p.x, p.y, 0.0)
                };

                transform(&source.proj, &target.proj, &mut point).map_err(|e| {
                    EngineError::Transform(format!(
                        "({}, {}) from {} to {}: {:?}",
                        p.x, p.y, self.src, self.dst, e
                    ))
                })?;

                let (x, y) = if target.geographic {
                    (point.0.to_degrees(), point.1.to_degrees())
                } else {
                    (point.0, point.1)
                };
                if !x.is_finite() || !y.is_finite() {
                    return Err(EngineError::Transform(format!(
                        "({}, {}) has no finite image in {}",
                        p.x, p.y, self.dst
                    )));
                }
                Ok(Point::new(x, y))
            })
            .collect()
    }
}

/// Reprojects points from `src` to `dst` in one shot.
pub fn transform_points(points: &[Point], src: &Crs, dst: &Crs) -> Result<Vec<Point>, EngineError> {
    Reprojection::new(src, dst)?.apply(points)
}
