use serde::{Deserialize, Serialize};

use super::stage::StagedParameters;
use crate::error::{Result, SimError};
use crate::physics::aerodynamics::MAX_CD_FACTOR;
use crate::sim::integrator::RK4_STABILITY_LIMIT;

/// Which force model the integrator runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    /// Flat frame, gravity and drag only, constant mass.
    Simple,
    /// Planet-centred frame with thrust, mass depletion, separation and rotation.
    Staged(StagedParameters),
}

/// Input to a single trajectory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub initial_speed: f64,      // m/s
    pub launch_angle_deg: f64,   // deg from local horizontal
    /// Base drag coefficient. Staged: Cd. Simple: lumped `Cd·A/(2m)` at sea level.
    pub drag_coefficient: f64,
    pub time_step: f64,          // s
    pub release_height: f64,     // m above the reference surface
    pub mode: Mode,
}

impl SimulationParameters {
    /// Simple-mode projectile.
    pub fn simple(initial_speed: f64, launch_angle_deg: f64, drag_coefficient: f64) -> Self {
        Self {
            initial_speed,
            launch_angle_deg,
            drag_coefficient,
            time_step: 0.01,
            release_height: 0.0,
            mode: Mode::Simple,
        }
    }

    /// Staged missile fired from rest at the given elevation.
    pub fn staged(elevation_deg: f64, drag_coefficient: f64, staged: StagedParameters) -> Self {
        Self {
            initial_speed: 0.0,
            launch_angle_deg: elevation_deg,
            drag_coefficient,
            time_step: 0.1,
            release_height: 0.0,
            mode: Mode::Staged(staged),
        }
    }

    pub fn with_time_step(mut self, dt: f64) -> Self {
        self.time_step = dt;
        self
    }

    pub fn with_release_height(mut self, h: f64) -> Self {
        self.release_height = h;
        self
    }

    pub fn staged_params(&self) -> Option<&StagedParameters> {
        match &self.mode {
            Mode::Staged(s) => Some(s),
            Mode::Simple => None,
        }
    }

    /// Reject values that break integrator invariants. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        non_negative("initial_speed", self.initial_speed)?;
        finite("launch_angle_deg", self.launch_angle_deg)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        positive("time_step", self.time_step)?;
        non_negative("release_height", self.release_height)?;

        if let Mode::Simple = self.mode {
            // Quadratic drag linearises to a decay rate of 2·k·v; the launch
            // speed bounds v since gravity alone only reaches terminal speed.
            let decay = 2.0 * self.drag_coefficient * MAX_CD_FACTOR * self.initial_speed;
            if decay * self.time_step > RK4_STABILITY_LIMIT {
                return Err(SimError::invalid(
                    "time_step",
                    format!(
                        "{} s is unstable for drag {} at {} m/s; use at most {:.2e} s",
                        self.time_step,
                        self.drag_coefficient,
                        self.initial_speed,
                        RK4_STABILITY_LIMIT / decay
                    ),
                ));
            }
        }

        if let Mode::Staged(s) = &self.mode {
            positive("launch_mass", s.launch_mass)?;
            positive("empty_mass", s.empty_mass)?;
            positive("payload_mass", s.payload_mass)?;
            if s.empty_mass > s.launch_mass {
                return Err(SimError::invalid(
                    "empty_mass",
                    format!("{} kg exceeds launch mass {} kg", s.empty_mass, s.launch_mass),
                ));
            }
            if s.payload_mass > s.empty_mass {
                return Err(SimError::invalid(
                    "payload_mass",
                    format!("{} kg exceeds empty mass {} kg", s.payload_mass, s.empty_mass),
                ));
            }
            non_negative("thrust_to_weight", s.thrust_to_weight)?;
            positive("specific_impulse", s.specific_impulse)?;
            if let Some(t) = s.burn_time {
                non_negative("burn_time", t)?;
            }
            positive("cross_section", s.cross_section)?;
            if let Some(a) = s.payload_cross_section {
                positive("payload_cross_section", a)?;
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("must be finite, got {v}")))
    }
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("must be positive, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<()> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("must be non-negative, got {v}")))
    }
}
