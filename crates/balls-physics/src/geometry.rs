//! 2D geometry helpers: the arena rectangle and the circle overlap test

use glam::DVec2;
use rand::Rng;

use crate::constants::{ARENA_MAX, ARENA_MIN, EPSILON};
use crate::error::ConfigError;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Create bounds, rejecting empty or inverted rectangles
    pub fn new(min: DVec2, max: DVec2) -> Result<Self, ConfigError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if !finite || self.min.x >= self.max.x || self.min.y >= self.max.y {
            return Err(ConfigError::DegenerateBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Shrink every edge inwards by `n`. A negative `n` grows the rectangle.
    ///
    /// No validation happens here, so insetting by more than half the extent
    /// produces `min > max`.
    pub fn inset(&self, n: f64) -> Self {
        Self {
            min: self.min + DVec2::splat(n),
            max: self.max - DVec2::splat(n),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether a circle of this radius can sit inside the rectangle at all
    pub fn fits_radius(&self, radius: f64) -> bool {
        let size = self.size();
        2.0 * radius <= size.x && 2.0 * radius <= size.y
    }

    /// Uniformly sample a point inside the rectangle
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: DVec2::from_array(ARENA_MIN),
            max: DVec2::from_array(ARENA_MAX),
        }
    }
}

/// Whether two circles touch or overlap, with `EPSILON` of slack
///
/// Used by the placement generator; the pair resolver runs the same test with
/// its configured slack.
pub fn is_collision(p1: DVec2, r1: f64, p2: DVec2, r2: f64) -> bool {
    circles_touch(p1, r1, p2, r2, EPSILON)
}

/// `|p1 - p2| <= r1 + r2 + epsilon`, compared squared
#[inline]
pub fn circles_touch(p1: DVec2, r1: f64, p2: DVec2, r2: f64, epsilon: f64) -> bool {
    let reach = r1 + r2 + epsilon;
    p1.distance_squared(p2) <= reach * reach
}
