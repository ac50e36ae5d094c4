use log::debug;
use serde::{Deserialize, Serialize};

use super::params::SimulationParameters;
use super::stage::StagedBuilder;
use crate::error::Result;

// Accepted user ranges. Values outside are pulled back to the nearest bound.
const ANGLE_RANGE: (f64, f64) = (-90.0, 90.0);
const ELEVATION_RANGE: (f64, f64) = (10.0, 90.0);
const SPEED_RANGE: (f64, f64) = (0.0, 5_000.0);
const RELEASE_HEIGHT_RANGE: (f64, f64) = (0.0, 10_000.0);
const TIME_STEP_RANGE: (f64, f64) = (1e-4, 1.0);
const LAUNCH_MASS_RANGE: (f64, f64) = (100.0, 250_000.0);
const TWR_RANGE: (f64, f64) = (0.5, 10.0);
const ISP_RANGE: (f64, f64) = (100.0, 450.0);
const CROSS_SECTION_RANGE: (f64, f64) = (0.01, 20.0);
const SIMPLE_DRAG_RANGE: (f64, f64) = (0.0, 1.0);
const STAGED_CD_RANGE: (f64, f64) = (0.0, 2.0);

fn default_simple_dt() -> f64 {
    0.01
}

fn default_staged_dt() -> f64 {
    0.1
}

/// User-entered configuration, as read from a scenario file or the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ManualInput {
    Simple {
        v0: f64,
        angle: f64,
        drag: f64,
        #[serde(default = "default_simple_dt")]
        dt: f64,
        #[serde(default)]
        release_height: f64,
    },
    Staged {
        elevation: f64,
        launch_mass: f64,
        empty_mass: f64,
        payload_mass: f64,
        thrust_to_weight: f64,
        specific_impulse: f64,
        #[serde(default)]
        burn_time: Option<f64>,
        cross_section: f64,
        #[serde(default)]
        payload_cross_section: Option<f64>,
        drag: f64,
        #[serde(default = "default_staged_dt")]
        dt: f64,
        #[serde(default)]
        release_height: f64,
    },
}

/// Soft clamp. NaN passes through so validation can reject it.
fn clamp(field: &str, v: f64, (lo, hi): (f64, f64)) -> f64 {
    let c = v.clamp(lo, hi);
    if c != v && !v.is_nan() {
        debug!("manual input `{field}` = {v} clamped to {c}");
    }
    c
}

impl ManualInput {
    /// Clamp to accepted ranges and build validated parameters.
    ///
    /// The mass ordering is not repaired here; an inverted budget is
    /// rejected by [`SimulationParameters::validate`].
    pub fn into_parameters(self) -> Result<SimulationParameters> {
        let params = match self {
            ManualInput::Simple {
                v0,
                angle,
                drag,
                dt,
                release_height,
            } => SimulationParameters::simple(
                clamp("v0", v0, SPEED_RANGE),
                clamp("angle", angle, ANGLE_RANGE),
                clamp("drag", drag, SIMPLE_DRAG_RANGE),
            )
            .with_time_step(clamp("dt", dt, TIME_STEP_RANGE))
            .with_release_height(clamp("release_height", release_height, RELEASE_HEIGHT_RANGE)),

            ManualInput::Staged {
                elevation,
                launch_mass,
                empty_mass,
                payload_mass,
                thrust_to_weight,
                specific_impulse,
                burn_time,
                cross_section,
                payload_cross_section,
                drag,
                dt,
                release_height,
            } => {
                let mut builder = StagedBuilder::new()
                    .launch_mass(clamp("launch_mass", launch_mass, LAUNCH_MASS_RANGE))
                    .empty_mass(empty_mass)
                    .payload_mass(payload_mass)
                    .thrust_to_weight(clamp("thrust_to_weight", thrust_to_weight, TWR_RANGE))
                    .specific_impulse(clamp("specific_impulse", specific_impulse, ISP_RANGE))
                    .cross_section(clamp("cross_section", cross_section, CROSS_SECTION_RANGE));
                if let Some(t) = burn_time {
                    builder = builder.burn_time(t);
                }
                if let Some(a) = payload_cross_section {
                    builder = builder.payload_cross_section(a);
                }
                SimulationParameters::staged(
                    clamp("elevation", elevation, ELEVATION_RANGE),
                    clamp("drag", drag, STAGED_CD_RANGE),
                    builder.build(),
                )
                .with_time_step(clamp("dt", dt, TIME_STEP_RANGE))
                .with_release_height(clamp("release_height", release_height, RELEASE_HEIGHT_RANGE))
            }
        };
        params.validate()?;
        Ok(params)
    }
}
