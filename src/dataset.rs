use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::sim::simulate;
use crate::vehicle::SimulationParameters;

/// Names of the engineered feature columns, in order.
pub const FEATURE_NAMES: [&str; 7] = [
    "velocity", "angle", "drag", "sin_angle", "cos_angle", "sin_2angle", "v0_sin2",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

const SPEED_RANGE: (f64, f64) = (80.0, 1_200.0);
const DRAG_RANGE: (f64, f64) = (0.002, 0.035);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub n_samples: usize,
    pub seed: u64,
    /// Release height drawn uniformly from `[lo, hi]`; a zero-width range is fixed.
    pub release_height_range: (f64, f64),
    pub time_step: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            n_samples: 2_000,
            seed: 42,
            release_height_range: (0.0, 0.0),
            time_step: 0.01,
        }
    }
}

/// One labelled row: engineered features and the simulated impact distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSample {
    pub features: [f64; FEATURE_COUNT],
    pub release_height: f64,
    pub impact_distance: f64,
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// `[v0, angle, drag, sin θ, cos θ, sin 2θ, v0·sin 2θ]` with θ in radians.
pub fn features(v0: f64, angle_deg: f64, drag: f64) -> [f64; FEATURE_COUNT] {
    let theta = angle_deg.to_radians();
    let sin_2 = (2.0 * theta).sin();
    [v0, angle_deg, drag, theta.sin(), theta.cos(), sin_2, v0 * sin_2]
}

/// Stratified launch angle: the slot `index % 20` picks the band so every
/// block of 20 draws holds 6 downward, 5 upward, 5 near-optimal and 4
/// near-horizontal shots.
fn stratified_angle(index: usize, rng: &mut ChaCha8Rng) -> f64 {
    match index % 20 {
        0..=5 => rng.gen_range(-85.0..-5.0),
        6..=10 => rng.gen_range(5.0..85.0),
        11..=15 => rng.gen_range(30.0..60.0),
        _ => rng.gen_range(-15.0..15.0),
    }
}

fn draw(range: (f64, f64), rng: &mut ChaCha8Rng) -> f64 {
    if range.1 > range.0 {
        rng.gen_range(range.0..range.1)
    } else {
        range.0
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a labelled dataset of simple-mode trajectories.
///
/// Parameters are drawn sequentially from a seeded stream so the draw does
/// not depend on thread scheduling; the simulations then run in parallel and
/// are collected in draw order. Failed runs are skipped with a warning.
pub fn generate(config: &DatasetConfig) -> Result<Vec<TrainingSample>> {
    let (lo, hi) = config.release_height_range;
    if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && hi >= lo) {
        return Err(SimError::invalid(
            "release_height_range",
            format!("expected 0 <= lo <= hi, got ({lo}, {hi})"),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let draws: Vec<SimulationParameters> = (0..config.n_samples)
        .map(|i| {
            let v0 = draw(SPEED_RANGE, &mut rng);
            let angle = stratified_angle(i, &mut rng);
            let drag = draw(DRAG_RANGE, &mut rng);
            let h = draw(config.release_height_range, &mut rng);
            SimulationParameters::simple(v0, angle, drag)
                .with_time_step(config.time_step)
                .with_release_height(h)
        })
        .collect();

    let rows: Vec<Option<TrainingSample>> = draws
        .par_iter()
        .enumerate()
        .map(|(i, p)| match simulate(p.clone()) {
            Ok(r) => Some(TrainingSample {
                features: features(p.initial_speed, p.launch_angle_deg, p.drag_coefficient),
                release_height: p.release_height,
                impact_distance: r.summary.impact_distance,
            }),
            Err(e) => {
                warn!("simulation failed for sample {i}: {e}");
                None
            }
        })
        .collect();

    let samples: Vec<TrainingSample> = rows.into_iter().flatten().collect();
    info!(
        "generated {}/{} training samples, columns {:?}",
        samples.len(),
        config.n_samples,
        FEATURE_NAMES
    );
    Ok(samples)
}
