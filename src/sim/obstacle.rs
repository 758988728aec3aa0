//! Obstacle entity
//!
//! An obstacle pairs a shape in its local frame with a motion pattern. The
//! world-frame shape is recomputed once per tick and reused by every scan.

use glam::DVec2;

use super::motion::MotionPattern;
use super::shape::Shape;
use crate::consts::DEFAULT_FILL_COLOR;
use crate::error::Result;

/// A static or moving obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Cosmetic only
    pub fill_color: [u8; 3],
    /// Geometry relative to `coordinate`
    shape: Shape,
    motion: MotionPattern,
    coordinate: DVec2,
    last_position: DVec2,
    /// World-frame geometry at `coordinate`
    placed: Shape,
}

impl Obstacle {
    /// Create an obstacle placed at its t = 0 position
    pub fn new(id: u32, shape: Shape, mut motion: MotionPattern) -> Result<Self> {
        shape.validate()?;
        motion.validate()?;

        let coordinate = motion.advance_to(0.0);
        let placed = shape.translated(coordinate);
        Ok(Self {
            id,
            fill_color: DEFAULT_FILL_COLOR,
            shape,
            motion,
            coordinate,
            last_position: coordinate,
            placed,
        })
    }

    pub fn with_color(mut self, fill_color: [u8; 3]) -> Self {
        self.fill_color = fill_color;
        self
    }

    /// Move to the position for simulation time `time`
    pub fn update(&mut self, time: f64) {
        self.last_position = self.coordinate;
        self.coordinate = self.motion.advance_to(time);
        let heading = self.heading();
        self.placed.place_from(&self.shape, self.coordinate, heading);
    }

    /// Local-frame shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// World-frame shape for the current tick
    pub fn placed(&self) -> &Shape {
        &self.placed
    }

    pub fn motion(&self) -> &MotionPattern {
        &self.motion
    }

    pub fn coordinate(&self) -> DVec2 {
        self.coordinate
    }

    pub fn last_position(&self) -> DVec2 {
        self.last_position
    }

    /// Displacement over the last tick
    pub fn velocity(&self) -> DVec2 {
        self.coordinate - self.last_position
    }

    /// Direction of travel over the last tick (radians), `None` when stationary
    pub fn heading(&self) -> Option<f64> {
        let v = self.velocity();
        if v.length_squared() > 0.0 {
            Some(v.y.atan2(v.x))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.motion.is_static()
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        self.placed.contains_point(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::PathMotion;

    #[test]
    fn test_new_places_at_time_zero() {
        let obstacle = Obstacle::new(
            0,
            Shape::circle(2.0),
            MotionPattern::stationary(DVec2::new(10.0, 5.0)),
        )
        .unwrap();
        assert_eq!(obstacle.coordinate(), DVec2::new(10.0, 5.0));
        assert_eq!(obstacle.velocity(), DVec2::ZERO);
        assert!(!obstacle.is_dynamic());
        assert!(obstacle.contains_point(DVec2::new(11.0, 5.0)));
        assert_eq!(obstacle.fill_color, DEFAULT_FILL_COLOR);
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        let result = Obstacle::new(0, Shape::circle(-1.0), MotionPattern::stationary(DVec2::ZERO));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_follows_motion() {
        let motion =
            MotionPattern::Path(PathMotion::with_speed(&[DVec2::ZERO, DVec2::new(10.0, 0.0)], 1.0, false).unwrap());
        let mut obstacle = Obstacle::new(3, Shape::rectangle(2.0, 2.0), motion).unwrap();
        assert!(obstacle.is_dynamic());

        obstacle.update(4.0);
        assert_eq!(obstacle.coordinate(), DVec2::new(4.0, 0.0));
        assert_eq!(obstacle.last_position(), DVec2::ZERO);
        assert_eq!(obstacle.velocity(), DVec2::new(4.0, 0.0));
        assert_eq!(obstacle.heading(), Some(0.0));
        assert!(obstacle.contains_point(DVec2::new(5.0, 1.0)));
        assert!(!obstacle.contains_point(DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_ellipse_turns_with_velocity() {
        let motion = MotionPattern::Path(
            PathMotion::with_speed(&[DVec2::ZERO, DVec2::new(0.0, 50.0)], 1.0, false).unwrap(),
        );
        let mut obstacle = Obstacle::new(0, Shape::ellipse(20.0, 4.0), motion).unwrap();

        // Moving along +y: the long axis points up
        obstacle.update(10.0);
        assert!(obstacle.contains_point(DVec2::new(0.0, 18.0)));
        assert!(!obstacle.contains_point(DVec2::new(8.0, 10.0)));

        // Stopped at the end of the path: back to the shape's own rotation
        obstacle.update(60.0);
        obstacle.update(70.0);
        assert_eq!(obstacle.heading(), None);
        assert!(obstacle.contains_point(DVec2::new(8.0, 50.0)));
    }
}
