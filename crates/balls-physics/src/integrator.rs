//! Semi-implicit Euler integration under uniform gravity

use rayon::prelude::*;

use crate::body::Body;

/// Advance one ball by `dt`: gravity first, then position from the new velocity
#[inline]
pub fn integrate_body(body: &mut Body, dt: f64, gravity: f64) {
    body.velocity.y -= gravity * dt;
    body.position += body.velocity * dt;
}

/// Advance every ball by `dt`. Balls never read each other, so this runs in
/// parallel over the slice.
pub fn integrate(bodies: &mut [Body], dt: f64, gravity: f64) {
    bodies
        .par_iter_mut()
        .for_each(|body| integrate_body(body, dt, gravity));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_integrate_body() {
        let mut body = Body::new(DVec2::new(1.0, 2.0), DVec2::new(0.5, 1.0), 0.1, 1.0);
        integrate_body(&mut body, 0.5, 2.0);
        // vy = 1 - 2 * 0.5 = 0, so y does not move
        assert_eq!(body.velocity, DVec2::new(0.5, 0.0));
        assert_eq!(body.position, DVec2::new(1.25, 2.0));
    }

    #[test]
    fn test_integrate_without_gravity_is_linear() {
        let mut body = Body::new(DVec2::ZERO, DVec2::new(2.0, -1.0), 0.1, 1.0);
        for _ in 0..4 {
            integrate_body(&mut body, 0.25, 0.0);
        }
        assert_eq!(body.position, DVec2::new(2.0, -1.0));
        assert_eq!(body.velocity, DVec2::new(2.0, -1.0));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut parallel: Vec<Body> = (0..257)
            .map(|i| {
                let f = i as f64;
                Body::new(DVec2::new(f, -f), DVec2::new(0.1 * f, 0.3), 0.1, 1.0)
            })
            .collect();
        let mut serial = parallel.clone();

        integrate(&mut parallel, 1.0 / 60.0, 9.81);
        for body in &mut serial {
            integrate_body(body, 1.0 / 60.0, 9.81);
        }
        assert_eq!(parallel, serial);
    }
}
