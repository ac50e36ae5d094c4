use nalgebra::Vector2;

use crate::dynamics::state::{State, EARTH_OMEGA, EARTH_RADIUS};
use crate::error::Result;
use crate::vehicle::{Mode, SimulationParameters};

/// Thrust stays available for this multiple of the nominal burn time.
pub const BURN_TIME_MARGIN: f64 = 1.05;

// ---------------------------------------------------------------------------
// Reference frame
// ---------------------------------------------------------------------------

/// Geometry the position vector lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// `[downrange, altitude]`, gravity straight down.
    Flat,
    /// Planet-centred, launch site on the +y axis, downrange is clockwise.
    Planet,
}

impl Frame {
    pub fn altitude(&self, pos: &Vector2<f64>) -> f64 {
        match self {
            Frame::Flat => pos.y,
            Frame::Planet => pos.norm() - EARTH_RADIUS,
        }
    }

    /// Local vertical unit vector.
    pub fn up(&self, pos: &Vector2<f64>) -> Vector2<f64> {
        match self {
            Frame::Flat => Vector2::y(),
            Frame::Planet => {
                let r = pos.norm();
                if r > 1.0 {
                    pos / r
                } else {
                    Vector2::y()
                }
            }
        }
    }

    /// Signed distance along the surface from `origin` to `pos`.
    ///
    /// Planet frame: central angle times the reference radius, regardless of
    /// the altitude of either point.
    pub fn downrange(&self, origin: &Vector2<f64>, pos: &Vector2<f64>) -> f64 {
        match self {
            Frame::Flat => pos.x - origin.x,
            Frame::Planet => {
                let cross = origin.y * pos.x - origin.x * pos.y;
                cross.atan2(origin.dot(pos)) * EARTH_RADIUS
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Propulsion, resolved once per run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Propulsion {
    pub thrust: f64,         // N at ignition
    pub mass_flow: f64,      // kg/s
    pub launch_mass: f64,    // kg
    pub empty_mass: f64,     // kg
    pub payload_mass: f64,   // kg
    pub burn_cutoff: f64,    // s, burn time with margin
    pub area: f64,           // m^2, full body
    pub payload_area: f64,   // m^2, after separation
}

// ---------------------------------------------------------------------------
// Flight model: everything the derivative function reads besides the state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FlightModel {
    pub frame: Frame,
    pub base_cd: f64,
    pub elevation: f64,                  // rad
    pub propulsion: Option<Propulsion>,
    pub omega: f64,                      // planet rotation, rad/s (0 in flat frame)
}

impl FlightModel {
    /// Validate parameters and resolve them into the integrator's model.
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        params.validate()?;

        let model = match &params.mode {
            Mode::Simple => FlightModel {
                frame: Frame::Flat,
                base_cd: params.drag_coefficient,
                elevation: params.launch_angle_deg.to_radians(),
                propulsion: None,
                omega: 0.0,
            },
            Mode::Staged(s) => FlightModel {
                frame: Frame::Planet,
                base_cd: params.drag_coefficient,
                elevation: params.launch_angle_deg.to_radians(),
                propulsion: Some(Propulsion {
                    thrust: s.thrust(),
                    mass_flow: s.mass_flow(),
                    launch_mass: s.launch_mass,
                    empty_mass: s.empty_mass,
                    payload_mass: s.payload_mass,
                    burn_cutoff: s.burn_time() * BURN_TIME_MARGIN,
                    area: s.cross_section,
                    payload_area: s.payload_area(),
                }),
                omega: EARTH_OMEGA,
            },
        };
        Ok(model)
    }

    /// State at t = 0: launch site at the release height, velocity along the
    /// launch angle in the local horizontal/vertical basis.
    pub fn initial_state(&self, params: &SimulationParameters) -> State {
        let (sin, cos) = self.elevation.sin_cos();
        let vel = Vector2::new(cos, sin) * params.initial_speed;
        let (pos, mass) = match self.frame {
            Frame::Flat => (Vector2::new(0.0, params.release_height), 1.0),
            Frame::Planet => (
                Vector2::new(0.0, EARTH_RADIUS + params.release_height),
                self.propulsion.as_ref().map_or(1.0, |p| p.launch_mass),
            ),
        };
        State {
            time: 0.0,
            pos,
            vel,
            mass,
            separated: false,
        }
    }

    /// Whether the motor is producing thrust in this state.
    pub fn thrusting(&self, state: &State) -> bool {
        match &self.propulsion {
            Some(p) => {
                !state.separated
                    && state.mass > p.empty_mass
                    && state.time < p.burn_cutoff
                    && p.thrust > 0.0
            }
            None => false,
        }
    }

    pub fn altitude(&self, state: &State) -> f64 {
        self.frame.altitude(&state.pos)
    }
}
