//! Intersection primitives for radar beams
//!
//! Every function here is pure. Beams and obstacle edges are both `Segment`s;
//! results are world-space points. Points exactly on a boundary count as
//! intersecting, so a grazing beam still reports the obstacle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A line segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.direction().length_squared()
    }

    /// Same segment traversed the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Segment shifted by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

/// Axis-aligned rectangle; `position` is the corner with the smallest x and y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub position: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(position: DVec2, size: DVec2) -> Self {
        Self { position, size }
    }

    /// Rectangle spanning two opposite corners
    pub fn from_bounds(min: DVec2, max: DVec2) -> Self {
        Self::new(min, max - min)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.position + self.size
    }

    /// Corners in the order they are connected
    pub fn corners(&self) -> [DVec2; 4] {
        let p = self.position;
        [
            p,
            p + DVec2::new(self.size.x, 0.0),
            p + self.size,
            p + DVec2::new(0.0, self.size.y),
        ]
    }

    /// Boundary edges in winding order
    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Boundary-inclusive containment
    pub fn contains(&self, point: DVec2) -> bool {
        point_inside_rectangle(self, point)
    }
}

/// Intersection points of two circles (Paul Bourke's method).
///
/// Empty when the circles are too far apart, nested, or concentric. Tangent
/// circles yield two coincident points.
pub fn circle_circle_intersection(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Vec<DVec2> {
    let delta = c2 - c1;
    let d_sq = delta.length_squared();
    let d = d_sq.sqrt();

    if d > r1 + r2 || d < (r1 - r2).abs() || d == 0.0 {
        return Vec::new();
    }

    let a = (r1 * r1 - r2 * r2 + d_sq) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + delta * (a / d);
    let offset = DVec2::new(delta.y, -delta.x) * (h / d);

    vec![mid + offset, mid - offset]
}

/// Intersection points of a circle with a line segment.
///
/// Uses the determinant/discriminant form from Wolfram MathWorld on the
/// infinite line, then keeps only candidates that lie within the segment.
pub fn circle_line_intersection(center: DVec2, radius: f64, segment: &Segment) -> Vec<DVec2> {
    let p1 = segment.start - center;
    let p2 = segment.end - center;

    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let len_sq = dx * dx + dy * dy;
    let det = p1.x * p2.y - p1.y * p2.x;
    let discriminant = radius * radius * len_sq - det * det;

    if discriminant < 0.0 || len_sq == 0.0 {
        return Vec::new();
    }

    let sign_dy = if dy < 0.0 { -1.0 } else { 1.0 };
    let root = discriminant.sqrt();

    let mut candidates = Vec::with_capacity(2);
    candidates.push(DVec2::new(
        (det * dy + sign_dy * dx * root) / len_sq,
        (-det * dx + dy.abs() * root) / len_sq,
    ));
    if discriminant > 0.0 {
        candidates.push(DVec2::new(
            (det * dy - sign_dy * dx * root) / len_sq,
            (-det * dx - dy.abs() * root) / len_sq,
        ));
    }

    let forward = p2 - p1;
    let backward = p1 - p2;
    candidates
        .into_iter()
        .filter(|c| forward.dot(*c - p1) >= 0.0 && backward.dot(*c - p2) >= 0.0)
        .map(|c| c + center)
        .collect()
}

/// Intersection of two segments, `None` when parallel or disjoint
pub fn line_line_intersection(a: &Segment, b: &Segment) -> Option<DVec2> {
    let r = a.direction();
    let s = b.direction();
    let cross = r.perp_dot(s);

    if cross == 0.0 {
        return None;
    }

    let q = b.start - a.start;
    let t = q.perp_dot(s) / cross;
    let u = q.perp_dot(r) / cross;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a.start + r * t)
    } else {
        None
    }
}

/// Intersections of a segment with the four rectangle edges.
///
/// A segment through a corner reports that corner once per touching edge.
pub fn rectangle_line_intersection(rect: &Rect, segment: &Segment) -> Vec<DVec2> {
    rect.edges()
        .iter()
        .filter_map(|edge| line_line_intersection(segment, edge))
        .collect()
}

/// Intersections of a segment with every edge of a closed polygon
pub fn polygon_line_intersection(vertices: &[DVec2], segment: &Segment) -> Vec<DVec2> {
    polygon_edges(vertices)
        .filter_map(|edge| line_line_intersection(segment, &edge))
        .collect()
}

/// Edges of a closed polygon, starting with the closing edge (last -> first)
pub fn polygon_edges(vertices: &[DVec2]) -> impl Iterator<Item = Segment> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| Segment::new(vertices[(i + n - 1) % n], vertices[i]))
}

/// Intersections of a segment with a rotated ellipse.
///
/// The segment is mapped into the frame where the ellipse is the unit circle,
/// intersected there, and the hits mapped back. `rotation` is in radians.
pub fn ellipse_line_intersection(
    center: DVec2,
    width: f64,
    height: f64,
    rotation: f64,
    segment: &Segment,
) -> Vec<DVec2> {
    let half = DVec2::new(width / 2.0, height / 2.0);
    if half.x <= 0.0 || half.y <= 0.0 {
        return Vec::new();
    }

    let to_local = DVec2::from_angle(-rotation);
    let to_world = DVec2::from_angle(rotation);

    let local = Segment::new(
        to_local.rotate(segment.start - center) / half,
        to_local.rotate(segment.end - center) / half,
    );

    circle_line_intersection(DVec2::ZERO, 1.0, &local)
        .into_iter()
        .map(|p| to_world.rotate(p * half) + center)
        .collect()
}

/// Boundary-inclusive point-in-rectangle test
#[inline]
pub fn point_inside_rectangle(rect: &Rect, point: DVec2) -> bool {
    let max = rect.max();
    rect.position.x <= point.x
        && point.x <= max.x
        && rect.position.y <= point.y
        && point.y <= max.y
}

/// Boundary-inclusive point-in-ellipse test
pub fn point_inside_ellipse(
    center: DVec2,
    width: f64,
    height: f64,
    rotation: f64,
    point: DVec2,
) -> bool {
    let half = DVec2::new(width / 2.0, height / 2.0);
    if half.x <= 0.0 || half.y <= 0.0 {
        return false;
    }
    let local = DVec2::from_angle(-rotation).rotate(point - center) / half;
    local.length_squared() <= 1.0
}

/// Even-odd point-in-polygon test (works for concave polygons)
pub fn point_inside_polygon(vertices: &[DVec2], point: DVec2) -> bool {
    let mut inside = false;
    for edge in polygon_edges(vertices) {
        let (a, b) = (edge.start, edge.end);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Distance from `origin` to the nearest of `points` (by squared distance)
pub fn nearest_distance(origin: DVec2, points: &[DVec2]) -> Option<f64> {
    points
        .iter()
        .map(|p| (*p - origin).length_squared())
        .min_by(|a, b| a.total_cmp(b))
        .map(f64::sqrt)
}
