//! Construction-time errors
//!
//! Everything here is fatal: a simulation with an invalid configuration is
//! never allowed to run a tick.

use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("degenerate bounds: min {min} must be strictly below max {max} on both axes")]
    DegenerateBounds { min: DVec2, max: DVec2 },

    #[error("body {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: f64 },

    #[error("body {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("body {index} has a non-finite position or velocity")]
    NonFiniteState { index: usize },

    #[error("body {index} with radius {radius} does not fit inside the arena")]
    RadiusExceedsArena { index: usize, radius: f64 },

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("could only place {placed} of {requested} non-overlapping balls")]
    PlacementExhausted { placed: usize, requested: usize },
}
