//! Obstacle motion patterns
//!
//! A motion pattern maps elapsed simulation time to a position. Every variant
//! is a pure function of time (`position_at`). The tick driver uses
//! `advance_to`, which gives the same answer but lets the random walk keep its
//! RNG cursor between ticks instead of replaying from the seed.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_STEP_INTERVAL;
use crate::error::{Result, SimError};
use crate::polar_to_cartesian;

/// A path position with the time the obstacle arrives there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: DVec2,
    pub time: f64,
}

impl Waypoint {
    pub fn new(position: DVec2, time: f64) -> Self {
        Self { position, time }
    }
}

/// Uniform circular motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularMotion {
    pub center: DVec2,
    pub radius: f64,
    /// Radians per second (positive = counter-clockwise)
    pub angular_speed: f64,
    /// Angle at t = 0 (radians)
    #[serde(default)]
    pub phase_offset: f64,
}

impl CircularMotion {
    pub fn new(center: DVec2, radius: f64, angular_speed: f64, phase_offset: f64) -> Self {
        Self {
            center,
            radius,
            angular_speed,
            phase_offset,
        }
    }

    /// Circular motion at a linear speed along the circle
    pub fn from_speed(center: DVec2, radius: f64, speed: f64, phase_offset: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidMotion(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        if !speed.is_finite() {
            return Err(SimError::InvalidSpeed(speed));
        }
        Ok(Self::new(center, radius, speed / radius, phase_offset))
    }

    pub fn position_at(&self, time: f64) -> DVec2 {
        let theta = self.phase_offset + self.angular_speed * time;
        self.center + polar_to_cartesian(self.radius, theta)
    }
}

/// Piecewise-linear motion through timestamped waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMotion {
    waypoints: Vec<Waypoint>,
    /// Restart from the first waypoint after the last one is reached
    #[serde(default = "default_looping")]
    looping: bool,
}

fn default_looping() -> bool {
    true
}

impl PathMotion {
    /// Path through explicitly timestamped waypoints (strictly increasing times)
    pub fn timestamped(waypoints: Vec<Waypoint>, looping: bool) -> Result<Self> {
        let path = Self { waypoints, looping };
        path.validate()?;
        Ok(path)
    }

    /// Path travelled at a constant speed.
    ///
    /// Consecutive duplicate points are dropped so timestamps stay strictly
    /// increasing. A speed of zero (or a path with no length) stands still at
    /// the first point.
    pub fn with_speed(points: &[DVec2], speed: f64, looping: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(SimError::PathTooShort(points.len()));
        }
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(SimError::InvalidSpeed(speed));
        }

        let first = points[0];
        let standing = || {
            vec![Waypoint::new(first, 0.0), Waypoint::new(first, 1.0)]
        };

        let waypoints = if speed == 0.0 {
            standing()
        } else {
            let mut waypoints = vec![Waypoint::new(first, 0.0)];
            let mut last = waypoints[0];
            for point in &points[1..] {
                let time = last.time + last.position.distance(*point) / speed;
                if time <= last.time {
                    continue;
                }
                last = Waypoint::new(*point, time);
                waypoints.push(last);
            }
            if waypoints.len() < 2 { standing() } else { waypoints }
        };

        Self::timestamped(waypoints, looping)
    }

    pub fn validate(&self) -> Result<()> {
        if self.waypoints.len() < 2 {
            return Err(SimError::PathTooShort(self.waypoints.len()));
        }
        for (index, pair) in self.waypoints.windows(2).enumerate() {
            if !(pair[1].time > pair[0].time) {
                return Err(SimError::NonIncreasingTimestamps { index: index + 1 });
            }
        }
        if self.waypoints.iter().any(|w| !w.position.is_finite() || !w.time.is_finite()) {
            return Err(SimError::InvalidMotion(
                "path waypoints must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Time between the first and last waypoint
    pub fn duration(&self) -> f64 {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    pub fn position_at(&self, time: f64) -> DVec2 {
        let (Some(first), Some(last)) = (self.waypoints.first(), self.waypoints.last()) else {
            return DVec2::ZERO;
        };

        let duration = last.time - first.time;
        let time = if self.looping && duration > 0.0 {
            first.time + (time - first.time).rem_euclid(duration)
        } else {
            time
        };

        if time <= first.time {
            return first.position;
        }
        if time >= last.time {
            return last.position;
        }

        // First waypoint strictly after `time`; always in 1..len here
        let next = self.waypoints.partition_point(|w| w.time <= time);
        let a = self.waypoints[next - 1];
        let b = self.waypoints[next];
        let frac = (time - a.time) / (b.time - a.time);
        a.position + (b.position - a.position) * frac
    }
}

/// Random walk: one unit step of length `speed` per `step_interval` seconds.
///
/// Directions come from a seeded PCG stream, so the walk is reproducible and
/// the position at any time can be recomputed from the seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomWalk {
    pub origin: DVec2,
    /// Length of each step
    pub speed: f64,
    /// Seconds between steps
    pub step_interval: f64,
    pub seed: u64,
    #[serde(skip)]
    cursor: Option<WalkCursor>,
}

/// Progress of a walk already drawn from the RNG
#[derive(Debug, Clone)]
struct WalkCursor {
    steps: u64,
    position: DVec2,
    rng: Pcg32,
}

impl WalkCursor {
    fn start(walk: &RandomWalk) -> Self {
        Self {
            steps: 0,
            position: walk.origin,
            rng: Pcg32::seed_from_u64(walk.seed),
        }
    }

    fn advance(&mut self, speed: f64, steps: u64) {
        while self.steps < steps {
            let theta = self.rng.random_range(0.0..TAU);
            self.position += DVec2::from_angle(theta) * speed;
            self.steps += 1;
        }
    }
}

impl RandomWalk {
    pub fn new(origin: DVec2, speed: f64, step_interval: f64, seed: u64) -> Result<Self> {
        let walk = Self {
            origin,
            speed,
            step_interval,
            seed,
            cursor: None,
        };
        walk.validate()?;
        Ok(walk)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(SimError::InvalidSpeed(self.speed));
        }
        if !(self.step_interval.is_finite() && self.step_interval >= MIN_STEP_INTERVAL) {
            return Err(SimError::InvalidMotion(format!(
                "random step interval must be at least {MIN_STEP_INTERVAL}, got {}",
                self.step_interval
            )));
        }
        Ok(())
    }

    /// Number of whole steps completed by `time`; the remainder carries over
    pub fn steps_due(&self, time: f64) -> u64 {
        if time <= 0.0 {
            0
        } else {
            (time / self.step_interval).floor() as u64
        }
    }

    /// Replays the walk from the seed.
    ///
    /// Costs one RNG draw per step due, i.e. O(time / step_interval).
    pub fn position_at(&self, time: f64) -> DVec2 {
        let mut cursor = WalkCursor::start(self);
        cursor.advance(self.speed, self.steps_due(time));
        cursor.position
    }

    /// Continues the walk from the last evaluated time, rewinding if time went back.
    ///
    /// Moving forward only draws the new steps; a rewind costs a full replay.
    pub fn advance_to(&mut self, time: f64) -> DVec2 {
        let steps = self.steps_due(time);
        let mut cursor = match self.cursor.take() {
            Some(cursor) if cursor.steps <= steps => cursor,
            _ => WalkCursor::start(self),
        };
        cursor.advance(self.speed, steps);
        let position = cursor.position;
        self.cursor = Some(cursor);
        position
    }
}

/// Rule mapping elapsed time to an obstacle position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionPattern {
    Static { position: DVec2 },
    Circular(CircularMotion),
    Path(PathMotion),
    Random(RandomWalk),
}

impl MotionPattern {
    pub fn stationary(position: DVec2) -> Self {
        MotionPattern::Static { position }
    }

    pub fn circular(center: DVec2, radius: f64, speed: f64, phase_offset: f64) -> Result<Self> {
        Ok(MotionPattern::Circular(CircularMotion::from_speed(
            center,
            radius,
            speed,
            phase_offset,
        )?))
    }

    pub fn path(points: &[DVec2], speed: f64, looping: bool) -> Result<Self> {
        Ok(MotionPattern::Path(PathMotion::with_speed(
            points, speed, looping,
        )?))
    }

    pub fn timestamped_path(waypoints: Vec<Waypoint>, looping: bool) -> Result<Self> {
        Ok(MotionPattern::Path(PathMotion::timestamped(
            waypoints, looping,
        )?))
    }

    pub fn random_walk(origin: DVec2, speed: f64, step_interval: f64, seed: u64) -> Result<Self> {
        Ok(MotionPattern::Random(RandomWalk::new(
            origin,
            speed,
            step_interval,
            seed,
        )?))
    }

    /// Check invariants (used after deserialization)
    pub fn validate(&self) -> Result<()> {
        match self {
            MotionPattern::Static { position } => {
                if position.is_finite() {
                    Ok(())
                } else {
                    Err(SimError::InvalidMotion(
                        "static position must be finite".to_string(),
                    ))
                }
            }
            MotionPattern::Circular(circle) => {
                if circle.radius.is_finite()
                    && circle.radius >= 0.0
                    && circle.angular_speed.is_finite()
                {
                    Ok(())
                } else {
                    Err(SimError::InvalidMotion(format!(
                        "bad circular motion {circle:?}"
                    )))
                }
            }
            MotionPattern::Path(path) => path.validate(),
            MotionPattern::Random(walk) => walk.validate(),
        }
    }

    /// True for patterns that never move
    pub fn is_static(&self) -> bool {
        matches!(self, MotionPattern::Static { .. })
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            MotionPattern::Static { .. } => "static",
            MotionPattern::Circular(_) => "circular",
            MotionPattern::Path(_) => "path",
            MotionPattern::Random(_) => "random",
        }
    }

    pub fn position_at(&self, time: f64) -> DVec2 {
        match self {
            MotionPattern::Static { position } => *position,
            MotionPattern::Circular(circle) => circle.position_at(time),
            MotionPattern::Path(path) => path.position_at(time),
            MotionPattern::Random(walk) => walk.position_at(time),
        }
    }

    /// Same as `position_at`, reusing random-walk progress from earlier calls
    pub fn advance_to(&mut self, time: f64) -> DVec2 {
        match self {
            MotionPattern::Random(walk) => walk.advance_to(time),
            other => other.position_at(time),
        }
    }
}
