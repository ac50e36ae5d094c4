use nalgebra::Vector2;
use serde::Serialize;

use crate::dynamics::model::Frame;
use crate::dynamics::state::G0;
use crate::sim::event::FlightEvent;

// ---------------------------------------------------------------------------
// Per-step samples
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Powered,
    Ballistic,
}

/// One accepted integrator step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub time: f64,                   // s
    pub position: Vector2<f64>,      // m, frame coordinates
    pub downrange: f64,              // m along the surface from launch
    pub altitude: f64,               // m
    pub speed: f64,                  // m/s
    pub mach: f64,
    pub flight_path_angle_deg: f64,  // from local horizontal, positive up
    pub mass: Option<f64>,           // kg, staged mode only
    pub phase: Phase,
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Dropped below the reference surface after the grace period.
    Ground,
    /// Hit the time ceiling; the trajectory is incomplete.
    TimeCeiling,
}

/// Summary statistics computed from the full sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub max_altitude: f64,
    pub max_altitude_downrange: f64,
    /// Flat: last minus first downrange. Planet: central angle times R_E.
    pub range: f64,
    /// Range with the last step interpolated to zero altitude.
    pub impact_distance: f64,
    pub flight_time: f64,
    pub max_speed: f64,
    pub max_mach: f64,
    pub impact_speed: f64,
    pub impact_mach: f64,
    pub impact_angle_deg: f64,
    /// Kinetic energy lost per unit mass, as a percentage of launch energy.
    pub energy_loss_percent: Option<f64>,
    pub sample_count: usize,
    pub termination: Termination,
}

impl FlightSummary {
    /// Compute summary from samples. `None` for an empty run.
    pub fn from_samples(
        samples: &[TrajectorySample],
        frame: Frame,
        termination: Termination,
    ) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;

        let apogee = samples
            .iter()
            .fold(first, |best, s| if s.altitude > best.altitude { s } else { best });

        let max_speed = samples.iter().map(|s| s.speed).fold(0.0_f64, f64::max);
        let max_mach = samples.iter().map(|s| s.mach).fold(0.0_f64, f64::max);

        let range = match frame {
            Frame::Flat => last.downrange - first.downrange,
            Frame::Planet => last.downrange.abs(),
        };

        let impact_distance = match (termination, samples.len()) {
            (Termination::Ground, n) if n >= 2 => {
                let prev = &samples[n - 2];
                let impact = interpolate_impact(prev, last);
                match frame {
                    Frame::Flat => impact - first.downrange,
                    Frame::Planet => impact.abs(),
                }
            }
            _ => range,
        };

        let energy_loss_percent = if first.speed > 0.0 {
            Some((1.0 - (last.speed * last.speed) / (first.speed * first.speed)) * 100.0)
        } else {
            None
        };

        Some(FlightSummary {
            max_altitude: apogee.altitude,
            max_altitude_downrange: apogee.downrange,
            range,
            impact_distance,
            flight_time: last.time,
            max_speed,
            max_mach,
            impact_speed: last.speed,
            impact_mach: last.mach,
            impact_angle_deg: last.flight_path_angle_deg.abs(),
            energy_loss_percent,
            sample_count: samples.len(),
            termination,
        })
    }

    pub fn reached_ground(&self) -> bool {
        self.termination == Termination::Ground
    }
}

/// Downrange where the segment between two samples crosses zero altitude.
fn interpolate_impact(a: &TrajectorySample, b: &TrajectorySample) -> f64 {
    let dh = b.altitude - a.altitude;
    if dh.abs() > f64::EPSILON {
        let t = -a.altitude / dh;
        a.downrange + t * (b.downrange - a.downrange)
    } else {
        b.downrange
    }
}

/// Complete result of a single run.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryResult {
    pub samples: Vec<TrajectorySample>,
    pub events: Vec<FlightEvent>,
    pub summary: FlightSummary,
}

impl TrajectoryResult {
    /// Downrange coordinates, parallel to [`TrajectoryResult::ys`].
    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.downrange).collect()
    }

    /// Altitudes, parallel to [`TrajectoryResult::xs`].
    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.altitude).collect()
    }
}

// ---------------------------------------------------------------------------
// Vacuum reference
// ---------------------------------------------------------------------------

/// Closed-form drag-free trajectory over flat ground with constant gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealTrajectory {
    pub flight_time: f64,
    pub max_height: f64,
    pub max_range: f64,
}

impl IdealTrajectory {
    pub fn vacuum(v0: f64, angle_deg: f64) -> Self {
        Self::with_gravity(v0, angle_deg, G0)
    }

    pub fn with_gravity(v0: f64, angle_deg: f64, g: f64) -> Self {
        let angle = angle_deg.to_radians();
        let vy = v0 * angle.sin();
        IdealTrajectory {
            flight_time: 2.0 * vy / g,
            max_height: vy * vy / (2.0 * g),
            max_range: v0 * v0 * (2.0 * angle).sin() / g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, downrange: f64, altitude: f64, speed: f64) -> TrajectorySample {
        TrajectorySample {
            time,
            position: Vector2::new(downrange, altitude),
            downrange,
            altitude,
            speed,
            mach: speed / 340.0,
            flight_path_angle_deg: -30.0,
            mass: None,
            phase: Phase::Ballistic,
        }
    }

    fn simple_trajectory() -> Vec<TrajectorySample> {
        vec![
            sample(0.0, 0.0, 0.0, 100.0),
            sample(10.0, 500.0, 5000.0, 20.0),
            sample(19.0, 990.0, 10.0, 45.0),
            sample(20.0, 1000.0, -10.0, 50.0),
        ]
    }

    fn summarize(termination: Termination) -> FlightSummary {
        FlightSummary::from_samples(&simple_trajectory(), Frame::Flat, termination).unwrap()
    }

    #[test]
    fn summary_computes_apogee() {
        let s = summarize(Termination::Ground);
        assert!((s.max_altitude - 5000.0).abs() < 1e-9);
        assert!((s.max_altitude_downrange - 500.0).abs() < 1e-9);
        assert_eq!(s.sample_count, 4);
        assert!(s.reached_ground());
    }

    #[test]
    fn impact_interpolated_to_zero_altitude() {
        let s = summarize(Termination::Ground);
        assert!((s.range - 1000.0).abs() < 1e-9);
        assert!((s.impact_distance - 995.0).abs() < 1e-9);
        assert!((s.impact_speed - 50.0).abs() < 1e-12);
        assert!((s.impact_angle_deg - 30.0).abs() < 1e-12);
        assert!((s.energy_loss_percent.unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn ceiling_skips_interpolation() {
        let s = summarize(Termination::TimeCeiling);
        assert_eq!(s.impact_distance, s.range);
        assert!(!s.reached_ground());
    }

    #[test]
    fn empty_run_has_no_summary() {
        assert!(FlightSummary::from_samples(&[], Frame::Flat, Termination::Ground).is_none());
    }

    #[test]
    fn vacuum_reference_values() {
        let ideal = IdealTrajectory::vacuum(300.0, 45.0);
        assert!((ideal.max_range - 9_177.45).abs() < 0.05);
        assert!((ideal.max_height - 2_294.36).abs() < 0.05);
        assert!((ideal.flight_time - 43.26).abs() < 0.01);
    }
}
