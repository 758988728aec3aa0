//! Deterministic simulation module
//!
//! Everything the radar perceives lives here. This module must be pure and
//! deterministic:
//! - Time only advances through `Environment::step`
//! - Seeded RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering or platform dependencies

pub mod environment;
pub mod geometry;
pub mod motion;
pub mod obstacle;
pub mod radar;
pub mod shadow;
pub mod shape;

pub use environment::{Environment, EnvironmentBuilder, ObstacleFlags};
pub use geometry::{
    Rect, Segment, circle_circle_intersection, circle_line_intersection,
    ellipse_line_intersection, line_line_intersection, point_inside_ellipse,
    point_inside_polygon, point_inside_rectangle, polygon_line_intersection,
    rectangle_line_intersection,
};
pub use motion::{CircularMotion, MotionPattern, PathMotion, RandomWalk, Waypoint};
pub use obstacle::Obstacle;
pub use radar::{Radar, RadarScan};
pub use shadow::{
    AngleRange, circle_circle_intersect_angle_range, circle_circle_overlap_angle_range,
    circle_rectangle_overlap_angle_range, circle_shadow_angle_range,
    rectangle_shadow_angle_range,
};
pub use shape::{Polygon, Shape};
