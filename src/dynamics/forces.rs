use nalgebra::Vector2;

use crate::dynamics::model::{FlightModel, Frame};
use crate::dynamics::state::{Deriv, State};
use crate::physics::{aerodynamics, atmosphere, gravity};

/// Below this altitude an ascending missile holds its launch pointing.
pub const POINTING_ALTITUDE: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Planar equations of motion
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given state and flight model.
///
/// Forces modeled:
///   1. Thrust  : staged only, scales with mass, pointing per `thrust_direction`
///   2. Gravity : inverse-square, toward the planet centre (straight down in the flat frame)
///   3. Drag    : quadratic with Mach-corrected Cd, opposing velocity
///   4. Rotation: staged only, centrifugal + Coriolis in the launch plane
///
/// Reads `state.separated` but never changes it.
pub fn derivatives(state: &State, model: &FlightModel) -> Deriv {
    let alt = model.frame.altitude(&state.pos);
    let atm = atmosphere::isa(alt);
    let up = model.frame.up(&state.pos);

    // --- Gravity ---
    let a_gravity = match model.frame {
        Frame::Flat => -up * atm.gravity,
        Frame::Planet => gravity::gravity_pointmass(&state.pos),
    };

    // --- Thrust ---
    let thrusting = model.thrusting(state);
    let (a_thrust, dmass) = match (&model.propulsion, thrusting) {
        (Some(p), true) => {
            // F = F0 * m / m0, so F / m is constant over the burn
            let accel = p.thrust / p.launch_mass;
            (thrust_direction(state, model, alt, &up) * accel, -p.mass_flow)
        }
        _ => (Vector2::zeros(), 0.0),
    };

    // --- Aerodynamic drag ---
    let a_drag = {
        let speed = state.speed();
        let mach = if atm.sound_speed > 0.0 {
            speed / atm.sound_speed
        } else {
            0.0
        };
        let cd = aerodynamics::effective_cd(model.base_cd, mach);
        let k = match &model.propulsion {
            // lumped coefficient already carries A/(2m), scale with density ratio
            None => cd * atm.density / atmosphere::RHO0,
            Some(p) => {
                let area = if state.separated {
                    p.payload_area
                } else {
                    p.area
                };
                if state.mass > 0.0 {
                    0.5 * atm.density * cd * area / state.mass
                } else {
                    0.0
                }
            }
        };
        aerodynamics::drag_accel(&state.vel, k)
    };

    // --- Planet rotation ---
    let a_rotation = rotation_accel(&state.pos, &state.vel, model.omega);

    Deriv {
        dpos: state.vel,
        dvel: a_gravity + a_thrust + a_drag + a_rotation,
        dmass,
    }
}

/// Thrust pointing policy.
///
/// Above 10 km: along velocity (gravity turn). Below 10 km while ascending:
/// the local vertical rotated by `elevation - 90°`. Otherwise along velocity;
/// at rest the fixed pointing is used.
pub fn thrust_direction(
    state: &State,
    model: &FlightModel,
    alt: f64,
    up: &Vector2<f64>,
) -> Vector2<f64> {
    let speed = state.speed();
    let ascending = state.vel.dot(up) >= 0.0;
    if speed < 1e-6 || (alt <= POINTING_ALTITUDE && ascending) {
        rotate(up, model.elevation - std::f64::consts::FRAC_PI_2)
    } else {
        state.vel / speed
    }
}

/// Centrifugal and Coriolis accelerations in the Earth-fixed launch plane.
///
/// Rotation axis is normal to the plane and chosen so downrange flight is
/// prograde: `ω = -Ω·ẑ`, centrifugal `Ω²·r`, Coriolis `-2ω×v = 2Ω·(-v_y, v_x)`.
pub fn rotation_accel(pos: &Vector2<f64>, vel: &Vector2<f64>, omega: f64) -> Vector2<f64> {
    if omega == 0.0 {
        return Vector2::zeros();
    }
    let centrifugal = pos * (omega * omega);
    let coriolis = Vector2::new(-vel.y, vel.x) * (2.0 * omega);
    centrifugal + coriolis
}

/// Counter-clockwise rotation of a planar vector.
fn rotate(v: &Vector2<f64>, angle: f64) -> Vector2<f64> {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::{EARTH_OMEGA, EARTH_RADIUS};
    use crate::vehicle::{SimulationParameters, StagedBuilder};

    fn staged_model() -> (FlightModel, SimulationParameters) {
        let p = SimulationParameters::staged(80.0, 0.3, StagedBuilder::new().build());
        (FlightModel::new(&p).unwrap(), p)
    }

    #[test]
    fn simple_vacuum_is_pure_gravity() {
        let p = SimulationParameters::simple(300.0, 45.0, 0.0);
        let m = FlightModel::new(&p).unwrap();
        let s = m.initial_state(&p);
        let d = derivatives(&s, &m);
        assert_eq!(d.dpos, s.vel);
        assert!(d.dvel.x.abs() < 1e-12);
        assert!((d.dvel.y + gravity::local_gravity(0.0)).abs() < 1e-12);
        assert_eq!(d.dmass, 0.0);
    }

    #[test]
    fn simple_drag_slows_horizontal_motion() {
        let p = SimulationParameters::simple(300.0, 0.0, 0.01).with_release_height(100.0);
        let m = FlightModel::new(&p).unwrap();
        let d = derivatives(&m.initial_state(&p), &m);
        assert!(d.dvel.x < 0.0);
    }

    #[test]
    fn net_upward_accel_on_pad() {
        let (m, p) = staged_model();
        let s = m.initial_state(&p);
        let d = derivatives(&s, &m);
        assert!(d.dvel.y > 0.0, "TWR > 1 -> net upward, got {}", d.dvel.y);
        assert!(d.dvel.x > 0.0, "80 deg pointing leans downrange");
        assert!(d.dmass < 0.0);
    }

    #[test]
    fn no_thrust_after_separation() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.separated = true;
        s.mass = 1_000.0;
        s.time = 5.0;
        let d = derivatives(&s, &m);
        assert_eq!(d.dmass, 0.0);
        assert!(d.dvel.y < 0.0);
    }

    #[test]
    fn no_thrust_past_burn_cutoff() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.time = 1e4;
        assert!(!m.thrusting(&s));
        assert_eq!(derivatives(&s, &m).dmass, 0.0);
    }

    #[test]
    fn separated_body_uses_payload_area() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.time = 1e4; // motor off
        s.vel = Vector2::new(200.0, 0.0);
        s.mass = 1_000.0;
        let attached = derivatives(&s, &m).dvel.x;
        s.separated = true;
        let separated = derivatives(&s, &m).dvel.x;
        // half the area -> half the drag; rotation term is identical in both
        let rot = rotation_accel(&s.pos, &s.vel, m.omega).x;
        assert!(((separated - rot) / (attached - rot) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pointing_follows_velocity_above_10km() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.pos = Vector2::new(0.0, EARTH_RADIUS + 20_000.0);
        s.vel = Vector2::new(300.0, 400.0);
        let up = m.frame.up(&s.pos);
        let dir = thrust_direction(&s, &m, 20_000.0, &up);
        assert!((dir - Vector2::new(0.6, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn pointing_holds_elevation_low_and_ascending() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.vel = Vector2::new(0.0, 50.0);
        let up = m.frame.up(&s.pos);
        let dir = thrust_direction(&s, &m, 500.0, &up);
        let e = 80.0_f64.to_radians();
        assert!((dir - Vector2::new(e.cos(), e.sin())).norm() < 1e-9);
    }

    #[test]
    fn pointing_follows_velocity_when_descending_low() {
        let (m, p) = staged_model();
        let mut s = m.initial_state(&p);
        s.vel = Vector2::new(30.0, -40.0);
        let up = m.frame.up(&s.pos);
        let dir = thrust_direction(&s, &m, 500.0, &up);
        assert!((dir - Vector2::new(0.6, -0.8)).norm() < 1e-12);
    }

    #[test]
    fn eastward_motion_feels_lighter() {
        let pos = Vector2::new(0.0, EARTH_RADIUS);
        let a = rotation_accel(&pos, &Vector2::new(1_000.0, 0.0), EARTH_OMEGA);
        assert!(a.y > 0.0);
        assert!(a.x.abs() < 1e-12);
    }

    #[test]
    fn flat_frame_has_no_rotation() {
        let a = rotation_accel(&Vector2::new(1.0, 2.0), &Vector2::new(3.0, 4.0), 0.0);
        assert_eq!(a, Vector2::zeros());
    }
}
