//! Collision response: ball against arena walls, and ball against ball
//!
//! Both responses are perfectly elastic. The wall pass touches one ball at a
//! time; the pair resolver touches exactly the two balls it is given, which is
//! what lets the scheduler run disjoint pairs concurrently.

use glam::DVec2;
use rayon::prelude::*;

use crate::body::Body;
use crate::geometry::{circles_touch, Bounds};

/// Keep one ball inside the arena
///
/// On each axis where the centre has left the arena shrunk by the ball's
/// radius, the centre is clamped back onto the edge and that velocity
/// component is reversed.
#[inline]
pub fn resolve_wall(body: &mut Body, bounds: &Bounds) {
    let inner = bounds.inset(body.radius);

    if body.position.x < inner.min.x || body.position.x > inner.max.x {
        body.position.x = body.position.x.clamp(inner.min.x, inner.max.x);
        body.velocity.x = -body.velocity.x;
    }
    if body.position.y < inner.min.y || body.position.y > inner.max.y {
        body.position.y = body.position.y.clamp(inner.min.y, inner.max.y);
        body.velocity.y = -body.velocity.y;
    }
}

/// Wall pass over every ball, in parallel
pub fn resolve_walls(bodies: &mut [Body], bounds: &Bounds) {
    bodies
        .par_iter_mut()
        .for_each(|body| resolve_wall(body, bounds));
}

/// Elastic collision between two balls
///
/// Returns `false` without touching either ball when they are not in contact.
/// Otherwise both centres are pushed apart symmetrically about their midpoint
/// until they are exactly `r1 + r2 + epsilon` apart, and the velocity
/// components along the line of centres are exchanged according to their
/// masses.
pub fn resolve_pair(b1: &mut Body, b2: &mut Body, epsilon: f64) -> bool {
    if !circles_touch(b1.position, b1.radius, b2.position, b2.radius, epsilon) {
        return false;
    }

    let delta = b2.position - b1.position;
    let dist = delta.length();
    // Coincident centres have no line of centres; separate along +x
    let normal = if dist > 0.0 { delta / dist } else { DVec2::X };

    let half_reach = 0.5 * (b1.radius + b2.radius + epsilon);
    let mid = (b1.position + b2.position) * 0.5;
    b1.position = mid - normal * half_reach;
    b2.position = mid + normal * half_reach;

    // Both updates read the pre-contact velocities through `relative`
    let relative = (b1.velocity - b2.velocity).dot(normal);
    let total = b1.mass + b2.mass;
    b1.velocity -= normal * (2.0 * b2.mass / total * relative);
    b2.velocity += normal * (2.0 * b1.mass / total * relative);

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EPSILON;

    const TOL: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOL
    }

    fn approx_vec(a: DVec2, b: DVec2) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y)
    }

    fn ball(pos: DVec2, vel: DVec2, radius: f64, mass: f64) -> Body {
        Body::new(pos, vel, radius, mass)
    }

    #[test]
    fn test_wall_bounce_right() {
        let bounds = Bounds::new(DVec2::new(-1.0, -1.0), DVec2::new(1.0, 1.0)).unwrap();
        let radius = 0.1;
        let mut body = ball(DVec2::new(0.95, 0.3), DVec2::new(2.0, -0.5), radius, 1.0);

        resolve_wall(&mut body, &bounds);

        assert_eq!(body.position.x, bounds.max.x - radius);
        assert_eq!(body.velocity.x, -2.0);
        assert_eq!(body.position.y, 0.3);
        assert_eq!(body.velocity.y, -0.5);
    }

    #[test]
    fn test_wall_bounce_corner() {
        let bounds = Bounds::new(DVec2::ZERO, DVec2::new(2.0, 1.0)).unwrap();
        let mut body = ball(DVec2::new(-0.2, -0.3), DVec2::new(-1.0, -3.0), 0.25, 1.0);

        resolve_wall(&mut body, &bounds);

        assert_eq!(body.position, DVec2::new(0.25, 0.25));
        assert_eq!(body.velocity, DVec2::new(1.0, 3.0));
    }

    #[test]
    fn test_wall_inside_is_untouched() {
        let bounds = Bounds::default();
        let original = ball(DVec2::new(0.2, 0.1), DVec2::new(1.0, 1.0), 0.1, 1.0);
        let mut body = original;
        resolve_wall(&mut body, &bounds);
        assert_eq!(body, original);
    }

    #[test]
    fn test_wall_pass_is_energy_preserving() {
        let bounds = Bounds::default();
        let mut bodies: Vec<Body> = (0..100)
            .map(|i| {
                let f = i as f64 * 0.07;
                ball(
                    DVec2::new(f.sin() * 2.0, f.cos() * 1.5),
                    DVec2::new(f.cos() * 3.0, -f.sin()),
                    0.05,
                    1.0 + f,
                )
            })
            .collect();
        let before: f64 = bodies.iter().map(Body::kinetic_energy).sum();

        resolve_walls(&mut bodies, &bounds);

        let after: f64 = bodies.iter().map(Body::kinetic_energy).sum();
        assert_eq!(before, after);
        let inner = |b: &Body| bounds.inset(b.radius).contains(b.position);
        assert!(bodies.iter().all(inner));
    }

    #[test]
    fn test_pair_no_contact_is_noop() {
        let a = ball(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.5), 0.1, 1.0);
        let b = ball(DVec2::new(0.3, 0.0), DVec2::new(-1.0, 0.2), 0.1, 2.0);
        let (mut a2, mut b2) = (a, b);

        assert!(!resolve_pair(&mut a2, &mut b2, EPSILON));

        assert_eq!(a2.position.x.to_bits(), a.position.x.to_bits());
        assert_eq!(a2.position.y.to_bits(), a.position.y.to_bits());
        assert_eq!(a2.velocity.x.to_bits(), a.velocity.x.to_bits());
        assert_eq!(a2.velocity.y.to_bits(), a.velocity.y.to_bits());
        assert_eq!(b2.position.x.to_bits(), b.position.x.to_bits());
        assert_eq!(b2.position.y.to_bits(), b.position.y.to_bits());
        assert_eq!(b2.velocity.x.to_bits(), b.velocity.x.to_bits());
        assert_eq!(b2.velocity.y.to_bits(), b.velocity.y.to_bits());
    }

    #[test]
    fn test_pair_head_on_equal_mass_swaps_velocities() {
        let v = 1.5;
        let mut a = ball(DVec2::new(0.0, 0.0), DVec2::new(v, 0.0), 1.0, 2.0);
        let mut b = ball(DVec2::new(1.5, 0.0), DVec2::new(-v, 0.0), 1.0, 2.0);

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        assert_eq!(a.velocity, DVec2::new(-v, 0.0));
        assert_eq!(b.velocity, DVec2::new(v, 0.0));
    }

    #[test]
    fn test_pair_separates_about_midpoint() {
        let mut a = ball(DVec2::new(0.0, 0.0), DVec2::ZERO, 0.3, 1.0);
        let mut b = ball(DVec2::new(0.2, 0.1), DVec2::ZERO, 0.2, 5.0);
        let mid = (a.position + b.position) * 0.5;

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        let dist = a.position.distance(b.position);
        assert!(dist >= a.radius + b.radius);
        assert!(approx(dist, a.radius + b.radius + EPSILON));
        assert!(approx_vec((a.position + b.position) * 0.5, mid));
        // Separation happens along the original line of centres
        let dir = (b.position - a.position).normalize();
        assert!(approx_vec(dir, DVec2::new(0.2, 0.1).normalize()));
    }

    #[test]
    fn test_pair_conserves_momentum_and_energy() {
        let mut a = ball(DVec2::new(0.0, 0.0), DVec2::new(2.0, 1.0), 0.1, 3.0);
        let mut b = ball(DVec2::new(0.15, 0.05), DVec2::new(-1.0, 0.5), 0.08, 1.25);
        let p_before = a.momentum() + b.momentum();
        let e_before = a.kinetic_energy() + b.kinetic_energy();

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        let p_after = a.momentum() + b.momentum();
        let e_after = a.kinetic_energy() + b.kinetic_energy();
        assert!(approx_vec(p_before, p_after));
        assert!(approx(e_before, e_after));
        // Something actually changed
        assert!(a.velocity != DVec2::new(2.0, 1.0));
    }

    #[test]
    fn test_pair_overlapping_while_separating_still_exchanges() {
        // Overlapping and already moving apart: velocities are exchanged anyway
        let mut a = ball(DVec2::new(0.0, 0.0), DVec2::new(-1.0, 0.0), 0.1, 1.0);
        let mut b = ball(DVec2::new(0.15, 0.0), DVec2::new(1.0, 0.0), 0.1, 1.0);

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        assert_eq!(a.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(b.velocity, DVec2::new(-1.0, 0.0));
        assert!(a.position.distance(b.position) >= 0.2);
    }

    #[test]
    fn test_pair_unequal_masses_follow_exchange_formula() {
        let mut a = ball(DVec2::new(0.0, 0.0), DVec2::new(0.5, 2.0), 0.1, 3.0);
        let mut b = ball(DVec2::new(0.18, 0.0), DVec2::new(2.0, -1.0), 0.1, 1.0);
        let (v1, v2) = (a.velocity, b.velocity);

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        // n = +x, (v1 - v2)·n = -1.5, total mass 4
        let n = DVec2::X;
        let rel = (v1 - v2).dot(n);
        assert!(approx_vec(a.velocity, v1 - n * (2.0 * 1.0 / 4.0 * rel)));
        assert!(approx_vec(b.velocity, v2 - n * (2.0 * 3.0 / 4.0 * -rel)));
        assert!(approx_vec(a.velocity, DVec2::new(1.25, 2.0)));
        assert!(approx_vec(b.velocity, DVec2::new(-0.25, -1.0)));
    }

    #[test]
    fn test_pair_coincident_centres_use_x_axis() {
        let p = DVec2::new(0.4, -0.2);
        let mut a = ball(p, DVec2::ZERO, 0.1, 1.0);
        let mut b = ball(p, DVec2::ZERO, 0.1, 1.0);

        assert!(resolve_pair(&mut a, &mut b, EPSILON));

        assert!(a.position.is_finite() && b.position.is_finite());
        assert_eq!(a.position.y, p.y);
        assert_eq!(b.position.y, p.y);
        assert!(a.position.x < b.position.x);
        assert!(approx(b.position.x - a.position.x, 0.2 + EPSILON));
    }

    #[test]
    fn test_pair_custom_epsilon() {
        // 0.21 apart with radii summing to 0.2: only a contact with the wider band
        let mut a = ball(DVec2::ZERO, DVec2::new(1.0, 0.0), 0.1, 1.0);
        let mut b = ball(DVec2::new(0.21, 0.0), DVec2::ZERO, 0.1, 1.0);
        assert!(!resolve_pair(&mut a, &mut b, EPSILON));
        assert!(resolve_pair(&mut a, &mut b, 0.05));
        assert!(approx(a.position.distance(b.position), 0.25));
        assert_eq!(b.velocity, DVec2::new(1.0, 0.0));
    }
}
