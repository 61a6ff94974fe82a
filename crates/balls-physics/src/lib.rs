//! # Ball Physics
//!
//! Per-ball and per-pair kernels for a 2D bouncing-balls simulation: gravity
//! integration, elastic wall bounces and elastic ball-ball collisions, plus
//! the validated store that owns the balls of a run.

pub mod body;
pub mod collisions;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod integrator;

pub use body::*;
pub use collisions::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use integrator::*;
