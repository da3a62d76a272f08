//! Simple polygons and the intersection test used for footprint checks.

use serde::Serialize;

use super::{Crs, GeoBox, Point};

/// Closed ring of points in a named CRS.
///
/// The ring is closed on construction (first point repeated at the end) and
/// its bounding box is cached for the cheap rejection step of
/// [`intersects`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    ring: Vec<Point>,
    #[serde(skip)]
    crs: Crs,
    #[serde(skip)]
    bounds: Option<GeoBox>,
}

impl Polygon {
    pub fn new(mut points: Vec<Point>, crs: Crs) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if first != last {
                points.push(first);
            }
        }
        let bounds = GeoBox::enclosing(&points, crs.clone());
        Self {
            ring: points,
            crs,
            bounds,
        }
    }

    /// Points of the closed ring; the last point equals the first.
    pub fn points(&self) -> &[Point] {
        &self.ring
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Bounding box, `None` for an empty polygon.
    pub fn bounds(&self) -> Option<&GeoBox> {
        self.bounds.as_ref()
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ring.windows(2).map(|w| (w[0], w[1]))
    }

    /// Even-odd rule point test. Points exactly on an edge may land either
    /// way; [`intersects`] catches boundary contact through its edge test.
    pub fn contains_point(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

impl From<&GeoBox> for Polygon {
    fn from(b: &GeoBox) -> Self {
        b.to_polygon()
    }
}

/// 2D intersection test between two simple polygons.
///
/// Shared boundary points count as an intersection. Shapes in different CRSs
/// never intersect. The test is symmetric in its arguments.
pub fn intersects(a: &Polygon, b: &Polygon) -> bool {
    if a.crs != b.crs {
        return false;
    }
    let (Some(a_box), Some(b_box)) = (a.bounds(), b.bounds()) else {
        return false;
    };
    if !a_box.intersects_box(b_box) {
        return false;
    }

    for (p1, p2) in a.edges() {
        for (q1, q2) in b.edges() {
            if segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    // No crossing edges: either one contains the other or they are apart.
    b.contains_point(a.ring[0]) || a.contains_point(b.ring[0])
}

fn orientation(p: Point, q: Point, r: Point) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
