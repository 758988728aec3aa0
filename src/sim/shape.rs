//! Obstacle shapes
//!
//! A closed set of shapes behind one capability surface: exact beam
//! intersection, angular shadow for beam pruning, and point containment.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{
    Rect, Segment, circle_line_intersection, ellipse_line_intersection, point_inside_ellipse,
    point_inside_polygon, polygon_line_intersection, rectangle_line_intersection,
};
use super::shadow::{
    AngleRange, circle_circle_overlap_angle_range, circle_rectangle_overlap_angle_range,
};
use crate::error::{Result, SimError};

/// A closed polygon (last vertex connects back to the first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRepr")]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

#[derive(Deserialize)]
struct PolygonRepr {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(SimError::PolygonTooFewVertices(vertices.len()));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(SimError::InvalidShape(
                "polygon vertices must be finite".to_string(),
            ));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Axis-aligned bounding box of the vertices
    pub fn bounding_rect(&self) -> Rect {
        let (min, max) = self.vertices.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        );
        Rect::from_bounds(min, max)
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v + offset).collect(),
        }
    }
}

impl TryFrom<PolygonRepr> for Polygon {
    type Error = SimError;

    fn try_from(repr: PolygonRepr) -> Result<Self> {
        Self::new(repr.vertices)
    }
}

/// Obstacle geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        center: DVec2,
        radius: f64,
    },
    /// Axis-aligned; `position` is the lower corner
    Rectangle {
        position: DVec2,
        width: f64,
        height: f64,
    },
    /// `rotation` in radians, counter-clockwise from +x
    Ellipse {
        center: DVec2,
        width: f64,
        height: f64,
        #[serde(default)]
        rotation: f64,
    },
    Polygon(Polygon),
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle {
            center: DVec2::ZERO,
            radius,
        }
    }

    pub fn rectangle(width: f64, height: f64) -> Self {
        Shape::Rectangle {
            position: DVec2::ZERO,
            width,
            height,
        }
    }

    pub fn ellipse(width: f64, height: f64) -> Self {
        Shape::Ellipse {
            center: DVec2::ZERO,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn polygon(vertices: Vec<DVec2>) -> Result<Self> {
        Ok(Shape::Polygon(Polygon::new(vertices)?))
    }

    /// Reject non-positive or non-finite dimensions
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidShape(format!(
                    "{name} must be positive and finite, got {v}"
                )))
            }
        };
        match self {
            Shape::Circle { radius, .. } => positive("circle radius", *radius),
            Shape::Rectangle { width, height, .. } => {
                positive("rectangle width", *width)?;
                positive("rectangle height", *height)
            }
            Shape::Ellipse { width, height, .. } => {
                positive("ellipse width", *width)?;
                positive("ellipse height", *height)
            }
            Shape::Polygon(polygon) => {
                if polygon.vertices.len() < 3 {
                    Err(SimError::PolygonTooFewVertices(polygon.vertices.len()))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Polygon(_) => "polygon",
        }
    }

    /// Exact intersection points with a segment
    pub fn intersect(&self, segment: &Segment) -> Vec<DVec2> {
        match self {
            Shape::Circle { center, radius } => circle_line_intersection(*center, *radius, segment),
            Shape::Rectangle { .. } => rectangle_line_intersection(&self.bounding_rect(), segment),
            Shape::Ellipse {
                center,
                width,
                height,
                rotation,
            } => ellipse_line_intersection(*center, *width, *height, *rotation, segment),
            Shape::Polygon(polygon) => polygon_line_intersection(&polygon.vertices, segment),
        }
    }

    /// Arc of directions from `scan_center` in which this shape lies within `range`.
    ///
    /// Ellipses use their bounding circle and polygons their bounding box, so
    /// the arc may be wider than needed but never narrower.
    pub fn angular_shadow(&self, scan_center: DVec2, range: f64) -> Option<AngleRange> {
        match self {
            Shape::Circle { center, radius } => {
                circle_circle_overlap_angle_range(scan_center, range, *center, *radius)
            }
            Shape::Ellipse {
                center,
                width,
                height,
                ..
            } => circle_circle_overlap_angle_range(
                scan_center,
                range,
                *center,
                width.max(*height) / 2.0,
            ),
            Shape::Rectangle { .. } | Shape::Polygon(_) => {
                circle_rectangle_overlap_angle_range(scan_center, range, &self.bounding_rect())
            }
        }
    }

    /// Point containment (circle interior strict, other shapes boundary inclusive)
    pub fn contains_point(&self, point: DVec2) -> bool {
        match self {
            Shape::Circle { center, radius } => point.distance_squared(*center) < radius * radius,
            Shape::Rectangle { .. } => self.bounding_rect().contains(point),
            Shape::Ellipse {
                center,
                width,
                height,
                rotation,
            } => point_inside_ellipse(*center, *width, *height, *rotation, point),
            Shape::Polygon(polygon) => point_inside_polygon(&polygon.vertices, point),
        }
    }

    /// Axis-aligned bounding box
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Shape::Circle { center, radius } => {
                Rect::from_bounds(*center - DVec2::splat(*radius), *center + DVec2::splat(*radius))
            }
            Shape::Rectangle {
                position,
                width,
                height,
            } => Rect::new(*position, DVec2::new(*width, *height)),
            Shape::Ellipse {
                center,
                width,
                height,
                ..
            } => {
                let r = width.max(*height) / 2.0;
                Rect::from_bounds(*center - DVec2::splat(r), *center + DVec2::splat(r))
            }
            Shape::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    /// Radius of a circle around the shape's anchor that contains the whole shape
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Circle { center, radius } => center.length() + radius,
            Shape::Rectangle {
                position,
                width,
                height,
            } => Rect::new(*position, DVec2::new(*width, *height))
                .corners()
                .iter()
                .map(|c| c.length())
                .fold(0.0, f64::max),
            Shape::Ellipse {
                center,
                width,
                height,
                ..
            } => center.length() + width.max(*height) / 2.0,
            Shape::Polygon(polygon) => polygon
                .vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0, f64::max),
        }
    }

    /// Same shape shifted by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        match self {
            Shape::Circle { center, radius } => Shape::Circle {
                center: *center + offset,
                radius: *radius,
            },
            Shape::Rectangle {
                position,
                width,
                height,
            } => Shape::Rectangle {
                position: *position + offset,
                width: *width,
                height: *height,
            },
            Shape::Ellipse {
                center,
                width,
                height,
                rotation,
            } => Shape::Ellipse {
                center: *center + offset,
                width: *width,
                height: *height,
                rotation: *rotation,
            },
            Shape::Polygon(polygon) => Shape::Polygon(polygon.translated(offset)),
        }
    }

    /// Overwrite the placement of this shape from a local template, reusing
    /// the polygon vertex buffer instead of reallocating each tick
    pub(crate) fn place_from(&mut self, local: &Shape, offset: DVec2, heading: Option<f64>) {
        match (self, local) {
            (Shape::Polygon(placed), Shape::Polygon(template))
                if placed.vertices.len() == template.vertices.len() =>
            {
                for (dst, src) in placed.vertices.iter_mut().zip(&template.vertices) {
                    *dst = *src + offset;
                }
            }
            (this, _) => {
                let mut placed = local.translated(offset);
                if let (
                    Shape::Ellipse {
                        center, rotation, ..
                    },
                    Some(heading),
                ) = (&mut placed, heading)
                {
                    // Heading turns the ellipse about the obstacle anchor
                    *center = offset + DVec2::from_angle(heading).rotate(*center - offset);
                    *rotation = heading;
                }
                *this = placed;
            }
        }
    }
}
