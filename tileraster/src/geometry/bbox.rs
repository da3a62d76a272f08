//! Axis-aligned boxes.

use serde::Serialize;

use super::{Crs, Point, Polygon};

/// Axis-aligned rectangle in a named CRS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoBox {
    pub min: Point,
    pub max: Point,
    #[serde(serialize_with = "serialize_crs")]
    pub crs: Crs,
}

fn serialize_crs<S: serde::Serializer>(crs: &Crs, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(crs.as_str())
}

impl GeoBox {
    /// Create a box from two opposite corners in any order.
    pub fn new(a: Point, b: Point, crs: Crs) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
            crs,
        }
    }

    /// Smallest box around a set of points. `None` for an empty slice.
    pub fn enclosing(points: &[Point], crs: Crs) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max, crs })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Inclusive point test.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// True when the boxes share at least one point, edges included.
    pub fn intersects_box(&self, other: &GeoBox) -> bool {
        self.crs == other.crs
            && !(self.max.x < other.min.x
                || self.min.x > other.max.x
                || self.max.y < other.min.y
                || self.min.y > other.max.y)
    }

    /// Corners in counter-clockwise order starting at the south-west corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec(), self.crs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs(min: (f64, f64), max: (f64, f64)) -> GeoBox {
        GeoBox::new(min.into(), max.into(), Crs::WGS84)
    }

    #[test]
    fn test_new_orders_corners() {
        let b = GeoBox::new(Point::new(10.0, -5.0), Point::new(-10.0, 5.0), Crs::WGS84);
        assert_eq!(b.min, Point::new(-10.0, -5.0));
        assert_eq!(b.max, Point::new(10.0, 5.0));
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 10.0);
    }

    #[test]
    fn test_enclosing() {
        let pts = [Point::new(1.0, 2.0), Point::new(-3.0, 4.0), Point::new(0.0, -1.0)];
        let b = GeoBox::enclosing(&pts, Crs::WGS84).unwrap();
        assert_eq!(b.min, Point::new(-3.0, -1.0));
        assert_eq!(b.max, Point::new(1.0, 4.0));
        assert!(GeoBox::enclosing(&[], Crs::WGS84).is_none());
    }

    #[test]
    fn test_intersects_box_touching_edges() {
        let a = wgs((0.0, 0.0), (1.0, 1.0));
        let b = wgs((1.0, 0.0), (2.0, 1.0));
        assert!(a.intersects_box(&b));
        assert!(b.intersects_box(&a));
    }

    #[test]
    fn test_intersects_box_disjoint() {
        let a = wgs((0.0, 0.0), (1.0, 1.0));
        let b = wgs((1.5, 0.0), (2.0, 1.0));
        assert!(!a.intersects_box(&b));
    }

    #[test]
    fn test_intersects_box_requires_same_crs() {
        let a = wgs((0.0, 0.0), (1.0, 1.0));
        let b = GeoBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Crs::PSEUDO_MERCATOR);
        assert!(!a.intersects_box(&b));
    }

    #[test]
    fn test_to_polygon_is_closed() {
        let poly = wgs((0.0, 0.0), (2.0, 1.0)).to_polygon();
        let pts = poly.points();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts.first(), pts.last());
    }
}
