//! Angular shadows used to prune radar beams
//!
//! Treat the scan center as a light source: an obstacle blocks light over some
//! arc of directions around it. Only beams inside that arc need an exact
//! intersection test.
//!
//! All angles are degrees in [0, 360). An arc runs counter-clockwise from
//! `start` to `end`, so `start > end` means it wraps through 0°.

use glam::DVec2;
use serde::Serialize;

use super::geometry::{Rect, circle_circle_intersection, circle_line_intersection};
use crate::{degrees_between, normalize_degrees};

/// Counter-clockwise arc of directions, in degrees.
///
/// Only built through `new` (or `FULL`), so both ends are always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleRange {
    /// Start angle (degrees, [0, 360))
    start: f64,
    /// End angle (degrees, [0, 360), or exactly 360 for the full circle)
    end: f64,
}

impl AngleRange {
    /// Every direction
    pub const FULL: AngleRange = AngleRange {
        start: 0.0,
        end: 360.0,
    };

    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: normalize_degrees(start),
            end: normalize_degrees(end),
        }
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.end - self.start >= 360.0
    }

    /// True if the arc passes through 0°
    #[inline]
    pub fn wraps(&self) -> bool {
        !self.is_full() && self.start > self.end
    }

    /// Angular span of the arc (handles wraparound)
    pub fn span(&self) -> f64 {
        if self.is_full() {
            return 360.0;
        }
        let mut span = self.end - self.start;
        if span < 0.0 {
            span += 360.0;
        }
        span
    }

    /// Check if a direction is within the arc (boundary inclusive)
    pub fn contains(&self, angle: f64) -> bool {
        if self.is_full() {
            return true;
        }
        let angle = normalize_degrees(angle);
        if self.start <= self.end {
            angle >= self.start && angle <= self.end
        } else {
            angle >= self.start || angle <= self.end
        }
    }
}

/// Shadow of a circle as seen from `point`: the arc between the two tangent lines.
///
/// Full when `point` is inside (or on) the circle.
pub fn circle_shadow_angle_range(point: DVec2, center: DVec2, radius: f64) -> AngleRange {
    let dist = point.distance(center);
    if dist <= radius {
        return AngleRange::FULL;
    }
    let offset = (radius / dist).asin().to_degrees();
    if offset.is_nan() {
        return AngleRange::FULL;
    }
    let base = degrees_between(point, center);
    AngleRange::new(base - offset, base + offset)
}

/// Shadow of an axis-aligned rectangle as seen from `point`.
///
/// Seen from outside, the rectangle subtends less than a half turn, so the
/// extreme corners can be found with cross-product comparisons against the
/// running low and high directions.
pub fn rectangle_shadow_angle_range(point: DVec2, rect: &Rect) -> AngleRange {
    if rect.contains(point) {
        return AngleRange::FULL;
    }

    let corners = rect.corners();
    let mut low = corners[0] - point;
    let mut high = low;

    for corner in &corners[1..] {
        let v = *corner - point;
        if low.perp_dot(v) < 0.0 {
            low = v;
        }
        if high.perp_dot(v) > 0.0 {
            high = v;
        }
    }

    AngleRange::new(
        low.y.atan2(low.x).to_degrees(),
        high.y.atan2(high.x).to_degrees(),
    )
}

/// Arc of circle 1 (measured from its center) between the two points where
/// the circle boundaries cross.
///
/// `None` unless the boundaries cross at two points.
pub fn circle_circle_intersect_angle_range(
    c1: DVec2,
    r1: f64,
    c2: DVec2,
    r2: f64,
) -> Option<AngleRange> {
    let points = circle_circle_intersection(c1, r1, c2, r2);
    if points.len() < 2 {
        return None;
    }

    let v1 = points[0] - c1;
    let v2 = points[1] - c1;
    let a1 = degrees_between(c1, points[0]);
    let a2 = degrees_between(c1, points[1]);

    let cross = v1.perp_dot(v2);
    if cross < 0.0 {
        Some(AngleRange::new(a2, a1))
    } else if cross > 0.0 {
        Some(AngleRange::new(a1, a2))
    } else {
        Some(AngleRange::FULL)
    }
}

/// Arc (relative to `c1`) guaranteed to contain every direction in which
/// circle 2 lies within `r1` of `c1`.
///
/// `None` when the circles do not overlap. When circle 2's tangent points
/// are within reach the tangent shadow is the exact extent; otherwise the
/// boundary crossing points are.
pub fn circle_circle_overlap_angle_range(
    c1: DVec2,
    r1: f64,
    c2: DVec2,
    r2: f64,
) -> Option<AngleRange> {
    let d_sq = c1.distance_squared(c2);
    let d = d_sq.sqrt();

    if d <= r2 {
        return Some(AngleRange::FULL);
    }
    if d >= r1 + r2 {
        return None;
    }

    let tangent_sq = d_sq - r2 * r2;
    if tangent_sq <= r1 * r1 {
        return Some(circle_shadow_angle_range(c1, c2, r2));
    }

    circle_circle_intersect_angle_range(c1, r1, c2, r2)
        .or_else(|| Some(circle_shadow_angle_range(c1, c2, r2)))
}

/// Arc (relative to `center`) containing every direction in which the
/// rectangle lies within `radius`.
///
/// Full when `center` is inside the rectangle, `None` when the rectangle is
/// entirely out of reach.
pub fn circle_rectangle_overlap_angle_range(
    center: DVec2,
    radius: f64,
    rect: &Rect,
) -> Option<AngleRange> {
    if rect.contains(center) {
        return Some(AngleRange::FULL);
    }

    let corner_in_reach = rect
        .corners()
        .iter()
        .any(|corner| corner.distance(center) < radius);
    let edge_crosses = || {
        rect.edges()
            .iter()
            .any(|edge| !circle_line_intersection(center, radius, edge).is_empty())
    };

    if !corner_in_reach && !edge_crosses() {
        return None;
    }

    Some(rectangle_shadow_angle_range(center, rect))
}
