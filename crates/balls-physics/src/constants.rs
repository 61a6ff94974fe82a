//! Physical constants for the bouncing-balls simulation
//!
//! SI units throughout: metres, seconds, kilograms. The arena is a few metres
//! across so that balls of a few centimetres stay visible at window scale.

/// Gravitational acceleration (m/s²), applied along -y
pub const GRAVITY: f64 = 9.81;

/// Slack added to every contact distance (m)
///
/// Absorbs floating-point drift so that balls resting in contact keep being
/// detected as touching instead of flickering between states.
pub const EPSILON: f64 = 1e-7;

/// Density of a ball (kg/m³)
pub const DENSITY: f64 = 1500.0;

/// Smallest ball radius handed out by the placement generator (m)
pub const RADIUS_MIN: f64 = 0.05;

/// Largest ball radius handed out by the placement generator (m)
pub const RADIUS_MAX: f64 = 0.10;

/// Maximum initial speed along each axis (m/s)
pub const MAX_INITIAL_SPEED: f64 = 3.0;

/// Default arena, lower-left corner (m)
pub const ARENA_MIN: [f64; 2] = [-1.5, -1.0];

/// Default arena, upper-right corner (m)
pub const ARENA_MAX: [f64; 2] = [1.5, 1.0];

/// Frames per second the default timestep is derived from
pub const FPS: u32 = 60;

/// Default fixed timestep (s)
pub const TIMESTEP: f64 = 1.0 / FPS as f64;

/// Number of balls when nothing else is requested
pub const BALL_COUNT: usize = 3;

/// Rejection-sampling attempts per ball before placement gives up
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Cells with fewer pairs than this are resolved on the calling thread
pub const PARALLEL_THRESHOLD: usize = 64;

/// Mass (kg) of a solid ball of the given radius at the given density
pub fn mass_from_radius(radius: f64, density: f64) -> f64 {
    density * 4.0 * std::f64::consts::PI * radius * radius * radius / 3.0
}
