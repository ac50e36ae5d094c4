use serde::{Deserialize, Serialize};

use crate::dynamics::state::G0;

/// Fraction of the body cross-section left after warhead separation, used
/// when no explicit payload cross-section is given.
pub const DEFAULT_PAYLOAD_AREA_FRACTION: f64 = 0.5;

// ---------------------------------------------------------------------------
// Staged (powered) vehicle definition
// ---------------------------------------------------------------------------

/// Propulsion and mass properties of a single-burn missile.
///
/// Mass budget: `payload_mass <= empty_mass <= launch_mass`. The propellant is
/// `launch_mass - empty_mass`; the warhead (`payload_mass`) separates once it
/// is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedParameters {
    pub launch_mass: f64,         // kg
    pub empty_mass: f64,          // kg, structure + payload at burnout
    pub payload_mass: f64,        // kg, separated warhead
    pub thrust_to_weight: f64,    // at ignition
    pub specific_impulse: f64,    // s
    #[serde(default)]
    pub burn_time: Option<f64>,   // s, derived when absent
    pub cross_section: f64,       // m^2
    #[serde(default)]
    pub payload_cross_section: Option<f64>, // m^2
}

impl StagedParameters {
    /// Ignition thrust: F0 = TWR * m0 * g0
    pub fn thrust(&self) -> f64 {
        self.thrust_to_weight * self.launch_mass * G0
    }

    pub fn exhaust_velocity(&self) -> f64 {
        self.specific_impulse * G0
    }

    /// Propellant mass flow rate: mdot = F0 / (Isp * g0)
    pub fn mass_flow(&self) -> f64 {
        self.thrust() / self.exhaust_velocity()
    }

    pub fn propellant_mass(&self) -> f64 {
        self.launch_mass - self.empty_mass
    }

    /// Explicit burn time, or the self-consistent one from propellant and mass flow.
    pub fn burn_time(&self) -> f64 {
        match self.burn_time {
            Some(t) => t,
            None => {
                let mdot = self.mass_flow();
                if mdot > 0.0 {
                    self.propellant_mass() / mdot
                } else {
                    0.0
                }
            }
        }
    }

    pub fn payload_area(&self) -> f64 {
        self.payload_cross_section
            .unwrap_or(self.cross_section * DEFAULT_PAYLOAD_AREA_FRACTION)
    }

    /// Ideal delta-v (Tsiolkovsky rocket equation)
    pub fn delta_v(&self) -> f64 {
        self.exhaust_velocity() * (self.launch_mass / self.empty_mass).ln()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct StagedBuilder {
    launch_mass: f64,
    empty_mass: f64,
    payload_mass: f64,
    thrust_to_weight: f64,
    specific_impulse: f64,
    burn_time: Option<f64>,
    cross_section: f64,
    payload_cross_section: Option<f64>,
}

impl StagedBuilder {
    pub fn new() -> Self {
        Self {
            launch_mass: 6_000.0,
            empty_mass: 2_000.0,
            payload_mass: 1_000.0,
            thrust_to_weight: 2.0,
            specific_impulse: 230.0,
            burn_time: None,
            cross_section: 0.6,
            payload_cross_section: None,
        }
    }

    pub fn launch_mass(mut self, v: f64) -> Self { self.launch_mass = v; self }
    pub fn empty_mass(mut self, v: f64) -> Self { self.empty_mass = v; self }
    pub fn payload_mass(mut self, v: f64) -> Self { self.payload_mass = v; self }
    pub fn thrust_to_weight(mut self, v: f64) -> Self { self.thrust_to_weight = v; self }
    pub fn specific_impulse(mut self, v: f64) -> Self { self.specific_impulse = v; self }
    pub fn burn_time(mut self, v: f64) -> Self { self.burn_time = Some(v); self }
    pub fn cross_section(mut self, v: f64) -> Self { self.cross_section = v; self }
    pub fn payload_cross_section(mut self, v: f64) -> Self {
        self.payload_cross_section = Some(v);
        self
    }

    pub fn build(self) -> StagedParameters {
        StagedParameters {
            launch_mass: self.launch_mass,
            empty_mass: self.empty_mass,
            payload_mass: self.payload_mass,
            thrust_to_weight: self.thrust_to_weight,
            specific_impulse: self.specific_impulse,
            burn_time: self.burn_time,
            cross_section: self.cross_section,
            payload_cross_section: self.payload_cross_section,
        }
    }
}

impl Default for StagedBuilder {
    fn default() -> Self {
        Self::new()
    }
}
