//! Simulation parameters

use balls_physics::{
    Bounds, ConfigError, BALL_COUNT, DENSITY, EPSILON, GRAVITY, MAX_INITIAL_SPEED,
    MAX_PLACEMENT_ATTEMPTS, PARALLEL_THRESHOLD, RADIUS_MAX, RADIUS_MIN, TIMESTEP,
};

use crate::partition::PartitionStrategy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    // Arena
    pub bounds: Bounds,

    // Population
    pub ball_count: usize,
    /// Radii are drawn uniformly from `radius_min..=radius_max`
    pub radius_min: f64,
    pub radius_max: f64,
    /// Mass = density * volume of a sphere with the ball's radius
    pub density: f64,
    /// Each velocity component is drawn from `-max_initial_speed..=max_initial_speed`
    pub max_initial_speed: f64,
    pub max_placement_attempts: usize,
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,

    // Integration
    pub timestep: f64,
    pub gravity: f64,
    /// Contact slack for the pair resolver
    pub epsilon: f64,

    // Scheduling
    pub partition_strategy: PartitionStrategy,
    /// Cells with fewer pairs run on the calling thread
    pub parallel_threshold: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            ball_count: BALL_COUNT,
            radius_min: RADIUS_MIN,
            radius_max: RADIUS_MAX,
            density: DENSITY,
            max_initial_speed: MAX_INITIAL_SPEED,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            seed: None,
            timestep: TIMESTEP,
            gravity: GRAVITY,
            epsilon: EPSILON,
            partition_strategy: PartitionStrategy::Greedy,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl SimulationParams {
    /// Reject anything a tick could not run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;

        positive("timestep", self.timestep)?;
        positive("density", self.density)?;
        positive("radius_min", self.radius_min)?;
        positive("radius_max", self.radius_max)?;
        non_negative("epsilon", self.epsilon)?;
        non_negative("max_initial_speed", self.max_initial_speed)?;
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", self.gravity));
        }
        if self.radius_min > self.radius_max {
            return Err(invalid("radius_min", self.radius_min));
        }
        if !self.bounds.fits_radius(self.radius_max) {
            return Err(invalid("radius_max", self.radius_max));
        }
        if self.max_placement_attempts == 0 {
            return Err(invalid("max_placement_attempts", 0.0));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64) -> ConfigError {
    ConfigError::InvalidParameter { name, value }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value))
    }
}
