use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2
pub const EARTH_RADIUS: f64 = 6_371_000.0; // mean Earth radius, m
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const G_CONST: f64 = 6.674_30e-11; // m^3/(kg s^2)
pub const EARTH_OMEGA: f64 = 7.292_115_9e-5; // sidereal rotation rate, rad/s

// ---------------------------------------------------------------------------
// Planar state: position, velocity, mass, separation flag
// ---------------------------------------------------------------------------

/// Integrator state at a single point in time.
///
/// Simple mode: `pos = [downrange, altitude]` in a flat frame.
/// Staged mode: `pos` is planet-centred, launch site at `[0, R_E + h0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub time: f64,             // s
    pub pos: Vector2<f64>,     // m
    pub vel: Vector2<f64>,     // m/s
    pub mass: f64,             // kg
    pub separated: bool,       // one-way, committed by the driver only
}

impl State {
    /// Advance state by a derivative scaled by dt (used inside RK4).
    /// `separated` is carried over untouched.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            mass: (self.mass + d.dmass * dt).max(0.0),
            separated: self.separated,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

// ---------------------------------------------------------------------------
// State derivative (dp/dt, dv/dt, dm/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>,   // velocity
    pub dvel: Vector2<f64>,   // acceleration
    pub dmass: f64,           // mass flow rate (negative during burn)
}

// ---------------------------------------------------------------------------
// Driver policy
// ---------------------------------------------------------------------------

/// Termination policy for the trajectory driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hard ceiling on simulated time, s.
    pub max_time: f64,
    /// Ground contact is ignored before this much time has elapsed, s.
    pub grace_period: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_time: 3_600.0,  // 1 h covers intercontinental flights
            grace_period: 0.1,
        }
    }
}
