//! Radar Sim - Geometric radar simulation for mobile robots
//!
//! Core modules:
//! - `sim`: Geometry, shapes, obstacle motion, environment and the radar scan
//! - `config`: Data-driven simulation settings (JSON)
//! - `error`: Construction and configuration errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::{RadarConfig, ScanResolution, SimConfig};
pub use error::{Result, SimError};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Default radar range (world units)
    pub const DEFAULT_RADAR_RANGE: f64 = 100.0;
    /// Default angular resolution (degrees per beam)
    pub const DEFAULT_DEGREE_STEP: f64 = 1.0;
    /// Default simulation timestep (seconds per tick)
    pub const SIM_DT: f64 = 1.0;

    /// Default obstacle fill color
    pub const DEFAULT_FILL_COLOR: [u8; 3] = [0x44, 0xcc, 0xee];

    /// Upper bound on beams per scan (0.01° resolution)
    pub const MAX_SAMPLE_COUNT: usize = 36_000;

    /// Shortest allowed random-walk step interval (seconds)
    pub const MIN_STEP_INTERVAL: f64 = 1e-3;

    /// Widening applied to beam windows so a beam sitting on a shadow edge is never dropped
    pub const BEAM_WINDOW_EPSILON: f64 = 1e-9;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed smallest difference `b - a` in degrees, in [-180, 180)
#[inline]
pub fn angle_diff_degrees(a: f64, b: f64) -> f64 {
    (b - a + 180.0).rem_euclid(360.0) - 180.0
}

/// Direction from `from` to `to` in degrees, normalized to [0, 360)
#[inline]
pub fn degrees_between(from: DVec2, to: DVec2) -> f64 {
    let v = to - from;
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

/// Unit vector pointing at the given angle (degrees)
#[inline]
pub fn unit_vec_from_degrees(angle: f64) -> DVec2 {
    DVec2::from_angle(angle.to_radians())
}

/// Convert polar (r, theta radians) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta radians)
#[inline]
pub fn cartesian_to_polar(pos: DVec2) -> (f64, f64) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-12);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn test_degrees_between() {
        let origin = DVec2::ZERO;
        assert!((degrees_between(origin, DVec2::new(1.0, 0.0))).abs() < 1e-12);
        assert!((degrees_between(origin, DVec2::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
        assert!((degrees_between(origin, DVec2::new(0.0, -1.0)) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_diff_wraps() {
        assert!((angle_diff_degrees(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((angle_diff_degrees(10.0, 350.0) + 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_polar_round_trip() {
        let p = polar_to_cartesian(2.0, std::f64::consts::FRAC_PI_2);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 2.0).abs() < 1e-12);
        assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((unit_vec_from_degrees(90.0) - DVec2::Y).length() < 1e-12);
    }
}
