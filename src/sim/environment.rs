//! Simulation environment
//!
//! Setup happens through [`EnvironmentBuilder`]; once built, the obstacle list
//! is fixed and only advanced in time by [`Environment::step`].

use glam::DVec2;

use super::motion::MotionPattern;
use super::obstacle::Obstacle;
use super::shape::Shape;
use crate::error::Result;

/// Which kinds of obstacle cover a point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleFlags {
    pub in_static: bool,
    pub in_dynamic: bool,
}

impl ObstacleFlags {
    #[inline]
    pub fn any(&self) -> bool {
        self.in_static || self.in_dynamic
    }
}

/// Collects obstacles before the simulation starts
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
}

impl EnvironmentBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    /// Add an obstacle and return its id
    pub fn add_obstacle(&mut self, shape: Shape, motion: MotionPattern) -> Result<u32> {
        let id = self.obstacles.len() as u32;
        self.obstacles.push(Obstacle::new(id, shape, motion)?);
        Ok(id)
    }

    pub fn add_obstacle_with_color(
        &mut self,
        shape: Shape,
        motion: MotionPattern,
        fill_color: [u8; 3],
    ) -> Result<u32> {
        let id = self.obstacles.len() as u32;
        self.obstacles
            .push(Obstacle::new(id, shape, motion)?.with_color(fill_color));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn build(self) -> Environment {
        if self.obstacles.is_empty() {
            log::warn!("Building environment with no obstacles");
        }
        let dynamic = self.obstacles.iter().filter(|o| o.is_dynamic()).count();
        log::debug!(
            "Environment {}x{}: {} obstacles ({} dynamic)",
            self.width,
            self.height,
            self.obstacles.len(),
            dynamic
        );
        Environment {
            width: self.width,
            height: self.height,
            obstacles: self.obstacles,
            elapsed: 0.0,
            tick_count: 0,
        }
    }
}

/// Obstacles and simulation clock
#[derive(Debug, Clone)]
pub struct Environment {
    width: f64,
    height: f64,
    /// Stable order by id
    obstacles: Vec<Obstacle>,
    elapsed: f64,
    tick_count: u64,
}

impl Environment {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn dynamic_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.is_dynamic())
    }

    pub fn static_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.is_dynamic())
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.get(id as usize)
    }

    /// Simulation time in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance the clock by `dt` and move every obstacle to the new time
    pub fn step(&mut self, dt: f64) {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite timestep {dt}");
            return;
        }

        self.elapsed += dt;
        self.tick_count += 1;
        for obstacle in &mut self.obstacles {
            obstacle.update(self.elapsed);
        }
        log::trace!("Tick {} at t={:.3}", self.tick_count, self.elapsed);
    }

    /// Report whether `point` lies inside a static and/or dynamic obstacle
    pub fn obstacle_flags(&self, point: DVec2) -> ObstacleFlags {
        let mut flags = ObstacleFlags::default();
        for obstacle in &self.obstacles {
            if obstacle.contains_point(point) {
                if obstacle.is_dynamic() {
                    flags.in_dynamic = true;
                } else {
                    flags.in_static = true;
                }
            }
        }
        flags
    }
}
