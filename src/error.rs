//! Error types for radar-sim

use thiserror::Error;

/// Errors raised while constructing simulation objects or loading configuration.
///
/// Scans never fail: numeric degeneracies are resolved locally and an empty
/// beam simply reports the radar range.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("radar range must be positive and finite, got {0}")]
    InvalidRadarRange(f64),

    #[error("radar degree step must be in (0, 360], got {0}")]
    InvalidDegreeStep(f64),

    #[error("path needs at least two waypoints, got {0}")]
    PathTooShort(usize),

    #[error("path timestamps must be strictly increasing (waypoint {index})")]
    NonIncreasingTimestamps { index: usize },

    #[error("speed must be non-negative and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("polygon needs at least three vertices, got {0}")]
    PolygonTooFewVertices(usize),

    #[error("invalid motion pattern: {0}")]
    InvalidMotion(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
