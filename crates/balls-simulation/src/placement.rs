//! Initial ball placement
//!
//! Balls start at random, non-overlapping positions found by rejection
//! sampling. Every candidate is tested as if it had the largest possible
//! radius, so the actual radii can be drawn afterwards without creating
//! overlaps.

use balls_physics::{
    is_collision, mass_from_radius, Body, BodyColor, BodyStore, Bounds, ConfigError,
};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::SimulationParams;

/// Random source for initial conditions
///
/// Owns its RNG, so two generators built from the same seed produce the same
/// balls.
pub struct Placement {
    rng: StdRng,
}

impl Placement {
    /// Seeded generator, or one seeded from OS entropy when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    /// `n` centres inside `bounds` such that circles of `radius` around them
    /// neither overlap each other nor cross the bounds
    pub fn non_overlapping_positions(
        &mut self,
        n: usize,
        bounds: &Bounds,
        radius: f64,
        max_attempts: usize,
    ) -> Result<Vec<DVec2>, ConfigError> {
        let area = bounds.inset(radius);
        let mut positions: Vec<DVec2> = Vec::with_capacity(n);

        while positions.len() < n {
            let mut placed = false;
            for _ in 0..max_attempts {
                let candidate = area.random_point(&mut self.rng);
                let overlapping = positions
                    .iter()
                    .any(|&p| is_collision(p, radius, candidate, radius));
                if !overlapping {
                    log::debug!("Placed ball {} at {}", positions.len(), candidate);
                    positions.push(candidate);
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(ConfigError::PlacementExhausted {
                    placed: positions.len(),
                    requested: n,
                });
            }
        }

        Ok(positions)
    }

    pub fn random_color(&mut self) -> BodyColor {
        BodyColor::rgb(
            self.rng.random_range(0.0..=1.0),
            self.rng.random_range(0.0..=1.0),
            self.rng.random_range(0.0..=1.0),
        )
    }

    /// Build a validated store of `params.ball_count` random balls
    pub fn bodies(&mut self, params: &SimulationParams) -> Result<BodyStore, ConfigError> {
        params.validate()?;

        let positions = self.non_overlapping_positions(
            params.ball_count,
            &params.bounds,
            params.radius_max,
            params.max_placement_attempts,
        )?;

        let speed = params.max_initial_speed;
        let bodies = positions
            .into_iter()
            .map(|position| {
                let radius = self.rng.random_range(params.radius_min..=params.radius_max);
                let velocity = DVec2::new(
                    self.rng.random_range(-speed..=speed),
                    self.rng.random_range(-speed..=speed),
                );
                let mass = mass_from_radius(radius, params.density);
                Body::new(position, velocity, radius, mass).with_color(self.random_color())
            })
            .collect();

        let store = BodyStore::new(bodies, params.bounds)?;
        log::info!("Created {} balls", store.len());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ball_count: usize, seed: u64) -> SimulationParams {
        SimulationParams {
            ball_count,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_balls() {
        let p = params(20, 42);
        let a = Placement::new(p.seed).bodies(&p).unwrap();
        let b = Placement::new(p.seed).bodies(&p).unwrap();
        assert_eq!(a.bodies(), b.bodies());

        let c = Placement::new(Some(43)).bodies(&p).unwrap();
        assert_ne!(a.bodies(), c.bodies());
    }

    #[test]
    fn test_balls_do_not_overlap() {
        let p = params(40, 1);
        let store = Placement::new(p.seed).bodies(&p).unwrap();
        let bodies = store.bodies();
        assert_eq!(bodies.len(), 40);

        for i in 0..bodies.len() {
            for j in i + 1..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);
                assert!(
                    a.position.distance(b.position) > a.radius + b.radius,
                    "balls {i} and {j} overlap"
                );
            }
        }
    }

    #[test]
    fn test_balls_respect_parameters() {
        let p = params(30, 9);
        let store = Placement::new(p.seed).bodies(&p).unwrap();
        let inner = p.bounds.inset(p.radius_max);

        for body in store.iter() {
            assert!(inner.contains(body.position));
            assert!(body.radius >= p.radius_min && body.radius <= p.radius_max);
            assert!(body.velocity.x.abs() <= p.max_initial_speed);
            assert!(body.velocity.y.abs() <= p.max_initial_speed);
            assert_eq!(body.mass, mass_from_radius(body.radius, p.density));
            for c in [body.color.r, body.color.g, body.color.b] {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_zero_balls() {
        let p = params(0, 3);
        let store = Placement::new(p.seed).bodies(&p).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_overcrowded_arena_is_rejected() {
        // A 1 x 1 box fits at most a handful of balls of radius 0.2
        let mut placement = Placement::new(Some(5));
        let bounds = Bounds::new(DVec2::ZERO, DVec2::ONE).unwrap();
        let err = placement
            .non_overlapping_positions(50, &bounds, 0.2, 200)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PlacementExhausted { requested: 50, .. }
        ));
    }

    #[test]
    fn test_invalid_params_rejected_before_sampling() {
        let p = SimulationParams {
            timestep: 0.0,
            ..params(3, 0)
        };
        assert!(Placement::new(p.seed).bodies(&p).is_err());
    }
}
