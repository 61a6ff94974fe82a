//! Ball state and the store that owns all balls of a run

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::error::ConfigError;
use crate::geometry::Bounds;

/// RGB colour, each channel in `[0, 1]`. Only the renderer looks at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl BodyColor {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for BodyColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A simulated circular ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Centre of the ball (m)
    pub position: DVec2,
    /// Velocity (m/s)
    pub velocity: DVec2,
    /// Radius (m)
    pub radius: f64,
    /// Mass (kg)
    pub mass: f64,
    pub color: BodyColor,
}

impl Body {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, mass: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            mass,
            color: BodyColor::default(),
        }
    }

    pub fn with_color(mut self, color: BodyColor) -> Self {
        self.color = color;
        self
    }

    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// GPU-compatible per-ball instance
///
/// What a renderer uploads after each tick. Laid out for a WGSL
/// `array<Instance>` storage buffer: 32 bytes, no implicit padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 2],
    pub radius: f32,
    pub _padding: f32,
    /// RGB plus alpha (always 1)
    pub color: [f32; 4],
}

impl From<&Body> for BodyInstance {
    fn from(body: &Body) -> Self {
        Self {
            position: body.position.as_vec2().to_array(),
            radius: body.radius as f32,
            _padding: 0.0,
            color: [body.color.r, body.color.g, body.color.b, 1.0],
        }
    }
}

/// All balls of a run plus the arena they bounce around in
///
/// Indices are stable for the lifetime of the store. Construction validates
/// every ball so that the per-tick kernels never have to.
#[derive(Debug, Clone)]
pub struct BodyStore {
    bodies: Vec<Body>,
    bounds: Bounds,
}

impl BodyStore {
    pub fn new(bodies: Vec<Body>, bounds: Bounds) -> Result<Self, ConfigError> {
        bounds.validate()?;

        for (index, body) in bodies.iter().enumerate() {
            if !(body.position.is_finite() && body.velocity.is_finite()) {
                return Err(ConfigError::NonFiniteState { index });
            }
            // Written negated so NaN is rejected as well
            if !(body.radius > 0.0) {
                return Err(ConfigError::NonPositiveRadius {
                    index,
                    radius: body.radius,
                });
            }
            if !(body.mass > 0.0) || !body.mass.is_finite() {
                return Err(ConfigError::NonPositiveMass {
                    index,
                    mass: body.mass,
                });
            }
            if !bounds.fits_radius(body.radius) {
                return Err(ConfigError::RadiusExceedsArena {
                    index,
                    radius: body.radius,
                });
            }
        }

        Ok(Self { bodies, bounds })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.bodies.iter().map(|b| b.position)
    }

    /// Snapshot for upload to a GPU buffer
    pub fn instances(&self) -> Vec<BodyInstance> {
        self.bodies.iter().map(BodyInstance::from).collect()
    }

    pub fn momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Mutable access for the tick kernels
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }
}
