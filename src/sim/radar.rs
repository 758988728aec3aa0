//! Radar scan engine
//!
//! A radar casts `sample_count` beams of length `range` from a scan center,
//! beam `i` pointing at `i * degree_step` degrees. Each obstacle only gets
//! exact intersection tests on the beams inside its angular shadow.

use std::ops::Range;

use glam::DVec2;

use super::environment::Environment;
use super::geometry::{Segment, nearest_distance};
use super::obstacle::Obstacle;
use super::shadow::AngleRange;
use crate::consts::{BEAM_WINDOW_EPSILON, MAX_SAMPLE_COUNT};
use crate::error::{Result, SimError};
use crate::unit_vec_from_degrees;

/// Radar configuration with cached beam vectors
#[derive(Debug, Clone, PartialEq)]
pub struct Radar {
    range: f64,
    degree_step: f64,
    /// Unit direction times range, one per sample
    beams: Vec<DVec2>,
}

impl Radar {
    pub fn new(range: f64, degree_step: f64) -> Result<Self> {
        check_range(range)?;
        check_degree_step(degree_step)?;
        let mut radar = Self {
            range,
            degree_step,
            beams: Vec::new(),
        };
        radar.rebuild_beams();
        log::debug!(
            "Radar: range {} step {}° ({} beams)",
            range,
            degree_step,
            radar.sample_count()
        );
        Ok(radar)
    }

    fn rebuild_beams(&mut self) {
        let count = ((360.0 / self.degree_step) + BEAM_WINDOW_EPSILON).floor().max(1.0) as usize;
        self.beams.clear();
        self.beams.extend(
            (0..count).map(|i| unit_vec_from_degrees(i as f64 * self.degree_step) * self.range),
        );
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn degree_step(&self) -> f64 {
        self.degree_step
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.beams.len()
    }

    pub fn set_range(&mut self, range: f64) -> Result<()> {
        check_range(range)?;
        self.range = range;
        self.rebuild_beams();
        Ok(())
    }

    pub fn set_degree_step(&mut self, degree_step: f64) -> Result<()> {
        check_degree_step(degree_step)?;
        self.degree_step = degree_step;
        self.rebuild_beams();
        Ok(())
    }

    /// Beam direction in degrees
    #[inline]
    pub fn angle_of(&self, index: usize) -> f64 {
        index as f64 * self.degree_step
    }

    /// Beam vector (direction times range)
    pub fn beam(&self, index: usize) -> Option<DVec2> {
        self.beams.get(index).copied()
    }

    pub fn beams(&self) -> &[DVec2] {
        &self.beams
    }

    /// Beam indices covered by an arc, as up to two index ranges
    pub fn beam_windows(&self, arc: &AngleRange) -> [Range<usize>; 2] {
        let count = self.sample_count();
        if arc.is_full() {
            return [0..count, 0..0];
        }

        let lo = ((arc.start() / self.degree_step) - BEAM_WINDOW_EPSILON)
            .ceil()
            .max(0.0) as usize;
        let hi = ((arc.end() / self.degree_step) + BEAM_WINDOW_EPSILON).floor() as usize;
        let lo = lo.min(count);

        if arc.wraps() {
            return [lo..count, 0..(hi + 1).min(count)];
        }

        // An arc ending just below 360° can still catch beam 0 when the beams
        // tile the full circle
        let closes_circle = (count as f64 * self.degree_step - 360.0).abs() < BEAM_WINDOW_EPSILON;
        let tail = if hi >= count && closes_circle { 0..1 } else { 0..0 };
        [lo..(hi + 1).min(count).max(lo), tail]
    }

    /// Scan against an arbitrary set of obstacles
    pub fn scan_obstacles<'a, I>(&self, center: DVec2, obstacles: I) -> RadarScan
    where
        I: IntoIterator<Item = &'a Obstacle>,
    {
        let mut distances = vec![self.range; self.sample_count()];

        for obstacle in obstacles {
            let shape = obstacle.placed();
            let Some(arc) = shape.angular_shadow(center, self.range) else {
                continue;
            };
            for window in self.beam_windows(&arc) {
                for index in window {
                    let segment = Segment::new(center, center + self.beams[index]);
                    if let Some(hit) = nearest_distance(center, &shape.intersect(&segment)) {
                        let slot = &mut distances[index];
                        *slot = slot.min(hit);
                    }
                }
            }
        }

        RadarScan {
            distances,
            range: self.range,
            degree_step: self.degree_step,
        }
    }

    /// Scan every obstacle in the environment
    pub fn scan(&self, env: &Environment, center: DVec2) -> RadarScan {
        self.scan_obstacles(center, env.obstacles())
    }

    /// Scan only moving obstacles
    pub fn scan_dynamic_only(&self, env: &Environment, center: DVec2) -> RadarScan {
        self.scan_obstacles(center, env.dynamic_obstacles())
    }

    /// Nearest moving obstacle hit by a single beam at `angle` degrees
    pub fn nearest_obstacle_at_angle<'a>(
        &self,
        env: &'a Environment,
        center: DVec2,
        angle: f64,
    ) -> Option<&'a Obstacle> {
        self.nearest_in(center, angle, env.dynamic_obstacles())
    }

    /// Nearest obstacle from `obstacles` hit by a single beam at `angle` degrees
    pub fn nearest_in<'a, I>(&self, center: DVec2, angle: f64, obstacles: I) -> Option<&'a Obstacle>
    where
        I: IntoIterator<Item = &'a Obstacle>,
    {
        let segment = Segment::new(center, center + unit_vec_from_degrees(angle) * self.range);
        let mut best: Option<(&Obstacle, f64)> = None;
        for obstacle in obstacles {
            let Some(hit) = nearest_distance(center, &obstacle.placed().intersect(&segment)) else {
                continue;
            };
            if best.is_none_or(|(_, d)| hit < d) {
                best = Some((obstacle, hit));
            }
        }
        best.map(|(obstacle, _)| obstacle)
    }
}

pub(crate) fn check_range(range: f64) -> Result<()> {
    if range.is_finite() && range > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRadarRange(range))
    }
}

/// Step must be in (0, 360] and coarse enough to stay under `MAX_SAMPLE_COUNT` beams
pub(crate) fn check_degree_step(degree_step: f64) -> Result<()> {
    if degree_step.is_finite()
        && degree_step > 0.0
        && degree_step <= 360.0
        && 360.0 / degree_step <= MAX_SAMPLE_COUNT as f64 + BEAM_WINDOW_EPSILON
    {
        Ok(())
    } else {
        Err(SimError::InvalidDegreeStep(degree_step))
    }
}

/// Distances measured by one scan; index `i` is the beam at `i * degree_step`
#[derive(Debug, Clone, PartialEq)]
pub struct RadarScan {
    distances: Vec<f64>,
    range: f64,
    degree_step: f64,
}

impl RadarScan {
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn into_distances(self) -> Vec<f64> {
        self.distances
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied()
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    /// Beam direction in degrees
    pub fn angle_of(&self, index: usize) -> f64 {
        index as f64 * self.degree_step
    }

    /// Nearest return as `(index, distance)`, `None` if nothing was hit
    pub fn closest(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| *d < self.range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Distances divided by range, in [0, 1]
    pub fn relative(&self) -> Vec<f64> {
        self.distances.iter().map(|d| d / self.range).collect()
    }

    /// Number of beams that hit something
    pub fn hit_count(&self) -> usize {
        self.distances.iter().filter(|d| **d < self.range).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::environment::EnvironmentBuilder;
    use crate::sim::motion::MotionPattern;
    use crate::sim::shape::Shape;
    use proptest::prelude::*;

    fn env_with(shapes: Vec<(Shape, DVec2)>) -> Environment {
        let mut builder = EnvironmentBuilder::new(400.0, 400.0);
        for (shape, position) in shapes {
            builder
                .add_obstacle(shape, MotionPattern::stationary(position))
                .unwrap();
        }
        builder.build()
    }

    fn brute_force(radar: &Radar, env: &Environment, center: DVec2) -> Vec<f64> {
        let mut distances = vec![radar.range(); radar.sample_count()];
        for obstacle in env.obstacles() {
            for (index, beam) in radar.beams().iter().enumerate() {
                let segment = Segment::new(center, center + *beam);
                if let Some(hit) = nearest_distance(center, &obstacle.placed().intersect(&segment)) {
                    distances[index] = distances[index].min(hit);
                }
            }
        }
        distances
    }

    #[test]
    fn test_invalid_radar() {
        assert!(matches!(Radar::new(0.0, 1.0), Err(SimError::InvalidRadarRange(_))));
        assert!(matches!(Radar::new(f64::INFINITY, 1.0), Err(SimError::InvalidRadarRange(_))));
        assert!(matches!(Radar::new(100.0, 0.0), Err(SimError::InvalidDegreeStep(_))));
        assert!(matches!(Radar::new(100.0, -2.0), Err(SimError::InvalidDegreeStep(_))));
        assert!(Radar::new(100.0, 360.0).is_ok());
    }

    #[test]
    fn test_rejects_step_finer_than_max_sample_count() {
        assert!(matches!(Radar::new(100.0, 1e-300), Err(SimError::InvalidDegreeStep(_))));
        assert!(matches!(Radar::new(100.0, 1e-3), Err(SimError::InvalidDegreeStep(_))));
        assert_eq!(Radar::new(100.0, 0.01).unwrap().sample_count(), MAX_SAMPLE_COUNT);

        let mut radar = Radar::new(100.0, 1.0).unwrap();
        assert!(radar.set_degree_step(f64::MIN_POSITIVE).is_err());
        assert_eq!(radar.sample_count(), 360);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(Radar::new(100.0, 1.0).unwrap().sample_count(), 360);
        assert_eq!(Radar::new(100.0, 0.5).unwrap().sample_count(), 720);
        assert_eq!(Radar::new(100.0, 0.7).unwrap().sample_count(), 514);
        assert_eq!(Radar::new(100.0, 0.1).unwrap().sample_count(), 3600);
    }

    #[test]
    fn test_set_degree_step_rebuilds_beams() {
        let mut radar = Radar::new(50.0, 1.0).unwrap();
        radar.set_degree_step(2.0).unwrap();
        assert_eq!(radar.sample_count(), 180);
        assert!((radar.beam(45).unwrap() - DVec2::new(0.0, 50.0)).length() < 1e-9);
        assert!(radar.set_degree_step(0.0).is_err());
        assert_eq!(radar.degree_step(), 2.0);

        radar.set_range(10.0).unwrap();
        assert!((radar.beam(0).unwrap() - DVec2::new(10.0, 0.0)).length() < 1e-12);
        assert_eq!(radar.angle_of(3), 6.0);
    }

    #[test]
    fn test_empty_environment() {
        let radar = Radar::new(100.0, 1.0).unwrap();
        let env = env_with(vec![]);
        let scan = radar.scan(&env, DVec2::ZERO);
        assert_eq!(scan.len(), 360);
        assert!(scan.distances().iter().all(|d| *d == 100.0));
        assert_eq!(scan.closest(), None);
        assert_eq!(scan.hit_count(), 0);
    }

    #[test]
    fn test_circle_on_beam_zero() {
        let radar = Radar::new(100.0, 1.0).unwrap();
        let env = env_with(vec![(Shape::circle(10.0), DVec2::new(100.0, 0.0))]);
        let scan = radar.scan(&env, DVec2::ZERO);

        assert!((scan.distances()[0] - 90.0).abs() < 1e-9);
        assert_eq!(scan.distances()[90], 100.0);
        // Shadow wraps through 0°
        assert!(scan.distances()[5] < 100.0);
        assert!(scan.distances()[355] < 100.0);
        assert_eq!(scan.distances()[6], 100.0);
        assert_eq!(scan.distances()[354], 100.0);
        assert_eq!(scan.closest().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_circle_distance_is_d_minus_r() {
        let radar = Radar::new(100.0, 1.0).unwrap();
        let env = env_with(vec![(Shape::circle(5.0), DVec2::new(0.0, 50.0))]);
        let scan = radar.scan(&env, DVec2::ZERO);
        assert!((scan.distances()[90] - 45.0).abs() < 1e-9);
        assert_eq!(scan.distances()[270], 100.0);
        assert!((scan.angle_of(90) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_rectangle_on_beam_zero() {
        let radar = Radar::new(100.0, 1.0).unwrap();
        let env = env_with(vec![(Shape::rectangle(20.0, 10.0), DVec2::new(40.0, -5.0))]);
        let scan = radar.scan(&env, DVec2::ZERO);
        assert!((scan.distances()[0] - 40.0).abs() < 1e-9);
        assert_eq!(scan.distances()[180], 100.0);
    }

    #[test]
    fn test_scan_from_inside_obstacle() {
        let radar = Radar::new(100.0, 10.0).unwrap();
        let env = env_with(vec![(Shape::circle(20.0), DVec2::ZERO)]);
        let scan = radar.scan(&env, DVec2::ZERO);
        assert!(scan.distances().iter().all(|d| (d - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_relative_scan() {
        let radar = Radar::new(100.0, 90.0).unwrap();
        let env = env_with(vec![(Shape::circle(10.0), DVec2::new(60.0, 0.0))]);
        let relative = radar.scan(&env, DVec2::ZERO).relative();
        assert_eq!(relative.len(), 4);
        assert!((relative[0] - 0.5).abs() < 1e-9);
        assert_eq!(relative[1], 1.0);
    }

    #[test]
    fn test_dynamic_only_and_nearest() {
        let mut builder = EnvironmentBuilder::new(400.0, 400.0);
        let wall = builder
            .add_obstacle(Shape::rectangle(5.0, 40.0), MotionPattern::stationary(DVec2::new(30.0, -20.0)))
            .unwrap();
        let near = builder
            .add_obstacle(
                Shape::circle(5.0),
                MotionPattern::path(&[DVec2::new(50.0, 0.0), DVec2::new(50.0, 10.0)], 1.0, true)
                    .unwrap(),
            )
            .unwrap();
        let far = builder
            .add_obstacle(
                Shape::circle(5.0),
                MotionPattern::path(&[DVec2::new(80.0, 0.0), DVec2::new(80.0, 10.0)], 1.0, true)
                    .unwrap(),
            )
            .unwrap();
        let env = builder.build();
        let radar = Radar::new(100.0, 1.0).unwrap();

        let full = radar.scan(&env, DVec2::ZERO);
        assert!((full.distances()[0] - 30.0).abs() < 1e-9);

        let dynamic = radar.scan_dynamic_only(&env, DVec2::ZERO);
        assert!((dynamic.distances()[0] - 45.0).abs() < 1e-9);

        // The static wall is ignored; the nearer moving circle wins
        let hit = radar.nearest_obstacle_at_angle(&env, DVec2::ZERO, 0.0);
        assert_eq!(hit.map(|o| o.id), Some(near));
        assert!(radar.nearest_obstacle_at_angle(&env, DVec2::ZERO, 180.0).is_none());

        let any = radar.nearest_in(DVec2::ZERO, 0.0, env.obstacles());
        assert_eq!(any.map(|o| o.id), Some(wall));
        let only_far = radar.nearest_in(DVec2::ZERO, 0.0, env.obstacle(far));
        assert_eq!(only_far.map(|o| o.id), Some(far));
    }

    #[test]
    fn test_scan_follows_moving_obstacle() {
        let mut builder = EnvironmentBuilder::new(400.0, 400.0);
        builder
            .add_obstacle(
                Shape::circle(5.0),
                MotionPattern::path(&[DVec2::new(50.0, 0.0), DVec2::new(0.0, 50.0)], 1.0, false)
                    .unwrap(),
            )
            .unwrap();
        let mut env = builder.build();
        let radar = Radar::new(100.0, 1.0).unwrap();

        assert!((radar.scan(&env, DVec2::ZERO).distances()[0] - 45.0).abs() < 1e-9);
        env.step(1000.0);
        let scan = radar.scan(&env, DVec2::ZERO);
        assert_eq!(scan.distances()[0], 100.0);
        assert!((scan.distances()[90] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_beam_windows() {
        let radar = Radar::new(100.0, 1.0).unwrap();
        let [a, b] = radar.beam_windows(&AngleRange::new(10.5, 20.0));
        assert_eq!(a, 11..21);
        assert!(b.is_empty());

        let [a, b] = radar.beam_windows(&AngleRange::new(350.2, 3.7));
        assert_eq!(a, 351..360);
        assert_eq!(b, 0..4);

        let [a, b] = radar.beam_windows(&AngleRange::new(10.2, 10.8));
        assert!(a.is_empty() && b.is_empty());

        let [a, b] = radar.beam_windows(&AngleRange::new(359.2, 359.9999999999999));
        assert!(a.is_empty());
        assert_eq!(b, 0..1);

        let [a, _] = radar.beam_windows(&AngleRange::FULL);
        assert_eq!(a, 0..360);
    }

    fn shape_strategy() -> impl Strategy<Value = Shape> {
        prop_oneof![
            (1.0..30.0f64).prop_map(Shape::circle),
            (1.0..40.0f64, 1.0..40.0f64).prop_map(|(w, h)| Shape::rectangle(w, h)),
            (1.0..40.0f64, 1.0..40.0f64, 0.0..std::f64::consts::TAU).prop_map(
                |(width, height, rotation)| Shape::Ellipse {
                    center: DVec2::ZERO,
                    width,
                    height,
                    rotation,
                }
            ),
            prop::collection::vec((-20.0..20.0f64, -20.0..20.0f64), 3..7).prop_map(|vs| {
                Shape::polygon(vs.into_iter().map(|(x, y)| DVec2::new(x, y)).collect()).unwrap()
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_pruned_scan_matches_brute_force(
            obstacles in prop::collection::vec(
                (shape_strategy(), -150.0..150.0f64, -150.0..150.0f64),
                0..6,
            ),
            center in (-50.0..50.0f64, -50.0..50.0f64),
            step in prop::sample::select(vec![1.0, 0.7, 2.5, 5.0]),
        ) {
            let env = env_with(
                obstacles
                    .into_iter()
                    .map(|(shape, x, y)| (shape, DVec2::new(x, y)))
                    .collect(),
            );
            let radar = Radar::new(100.0, step).unwrap();
            let center = DVec2::new(center.0, center.1);

            let scan = radar.scan(&env, center);
            prop_assert!(scan.distances().iter().all(|d| (0.0..=100.0).contains(d)));
            let expected = brute_force(&radar, &env, center);
            prop_assert_eq!(scan.distances(), expected.as_slice());
        }
    }
}
