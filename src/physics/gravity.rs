use nalgebra::Vector2;

use crate::dynamics::state::{EARTH_MASS, EARTH_RADIUS, G_CONST};

/// Standard gravitational parameter of the reference planet, m^3/s^2.
pub const MU_EARTH: f64 = G_CONST * EARTH_MASS;

/// Inverse-square gravity magnitude at a given altitude above the reference surface.
pub fn local_gravity(altitude: f64) -> f64 {
    let r = EARTH_RADIUS + altitude.max(0.0);
    MU_EARTH / (r * r)
}

/// Point-mass gravity for a planet-centred position vector.
pub fn gravity_pointmass(pos: &Vector2<f64>) -> Vector2<f64> {
    let r = pos.norm();
    if r < 1.0 {
        return Vector2::zeros();
    }
    -MU_EARTH / (r * r * r) * pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_gravity() {
        let g = local_gravity(0.0);
        assert!((g - 9.82).abs() < 0.005);
    }

    #[test]
    fn gravity_decreases_with_altitude() {
        assert!(local_gravity(100_000.0) < local_gravity(0.0));
    }

    #[test]
    fn pointmass_matches_scalar_and_points_inward() {
        let pos = Vector2::new(0.0, EARTH_RADIUS + 10_000.0);
        let a = gravity_pointmass(&pos);
        assert!(a.y < 0.0);
        assert!(a.x.abs() < 1e-12);
        assert!((a.norm() - local_gravity(10_000.0)).abs() < 1e-9);
    }

    #[test]
    fn pointmass_degenerate_at_centre() {
        assert_eq!(gravity_pointmass(&Vector2::zeros()), Vector2::zeros());
    }
}
