use log::{debug, info, warn};
use nalgebra::Vector2;

use crate::dynamics::forces::{derivatives, POINTING_ALTITUDE};
use crate::dynamics::model::FlightModel;
use crate::dynamics::state::{SimConfig, State};
use crate::error::{Result, SimError};
use crate::physics::atmosphere;
use crate::vehicle::SimulationParameters;
use super::event::{default_detectors, AltitudeDetector, EventKind, FlightEvent};
use super::integrator::rk4_step;
use super::summary::{FlightSummary, Phase, Termination, TrajectoryResult, TrajectorySample};

// ---------------------------------------------------------------------------
// Stage separation logic
// ---------------------------------------------------------------------------

/// Commit warhead separation on an accepted state once the propellant is gone.
/// The flag is one-way; the mass drops to the payload mass.
fn commit_separation(state: &mut State, model: &FlightModel) {
    if let Some(p) = &model.propulsion {
        if !state.separated && state.mass <= p.empty_mass {
            state.mass = p.payload_mass;
            state.separated = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

fn sample(model: &FlightModel, origin: &Vector2<f64>, state: &State) -> TrajectorySample {
    let altitude = model.altitude(state);
    let atm = atmosphere::isa(altitude);
    let up = model.frame.up(&state.pos);
    let east = Vector2::new(up.y, -up.x);
    let speed = state.speed();

    let flight_path_angle_deg = if speed > 0.0 {
        state.vel.dot(&up).atan2(state.vel.dot(&east)).to_degrees()
    } else {
        0.0
    };

    TrajectorySample {
        time: state.time,
        position: state.pos,
        downrange: model.frame.downrange(origin, &state.pos),
        altitude,
        speed,
        mach: speed / atm.sound_speed,
        flight_path_angle_deg,
        mass: model.propulsion.as_ref().map(|_| state.mass),
        phase: if model.thrusting(state) {
            Phase::Powered
        } else {
            Phase::Ballistic
        },
    }
}

/// Reject a step that left the state non-finite before it is ever sampled.
fn check_finite(state: &State) -> Result<()> {
    let finite = state.pos.iter().chain(state.vel.iter()).all(|v| v.is_finite())
        && state.mass.is_finite()
        && state.time.is_finite();
    if finite {
        Ok(())
    } else {
        Err(SimError::NumericalDivergence { time: state.time })
    }
}

fn validate_config(config: &SimConfig) -> Result<()> {
    if !(config.max_time.is_finite() && config.max_time > 0.0) {
        return Err(SimError::invalid(
            "max_time",
            format!("must be positive, got {}", config.max_time),
        ));
    }
    if !(config.grace_period.is_finite() && config.grace_period >= 0.0) {
        return Err(SimError::invalid(
            "grace_period",
            format!("must be non-negative, got {}", config.grace_period),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Full trajectory run
// ---------------------------------------------------------------------------

/// Run one trajectory with a custom termination policy.
///
/// Each iteration records the current state, checks termination, then takes
/// one RK4 step. Invalid parameters fail before the first step.
pub fn simulate_with(
    params: &SimulationParameters,
    config: &SimConfig,
) -> Result<TrajectoryResult> {
    validate_config(config)?;
    let model = FlightModel::new(params)?;
    let dt = params.time_step;

    let mut state = model.initial_state(params);
    let origin = state.pos;

    debug!(
        "trajectory start: frame={:?} v0={} angle={} cd={} dt={} h0={}",
        model.frame,
        params.initial_speed,
        params.launch_angle_deg,
        params.drag_coefficient,
        dt,
        params.release_height
    );

    let capacity = (config.max_time / dt) as usize + 1;
    let mut samples = Vec::with_capacity(capacity.min(200_000));
    let mut events = Vec::new();

    let mut detectors = default_detectors();
    if model.propulsion.is_some() {
        detectors.push(Box::new(AltitudeDetector::new(POINTING_ALTITUDE, true)));
    }

    let termination = loop {
        samples.push(sample(&model, &origin, &state));

        // Ground impact, ignoring launch-time artefacts
        if model.altitude(&state) < 0.0 && state.time > config.grace_period {
            events.push(FlightEvent::at(&model, &state, EventKind::Impact));
            break Termination::Ground;
        }

        if state.time >= config.max_time {
            warn!(
                "trajectory hit the {} s time ceiling at altitude {:.0} m",
                config.max_time,
                model.altitude(&state)
            );
            events.push(FlightEvent::at(&model, &state, EventKind::TimeCeiling));
            break Termination::TimeCeiling;
        }

        let mut next = rk4_step(&state, dt, |s| derivatives(s, &model));
        if let Err(e) = check_finite(&next) {
            warn!("{e}");
            return Err(e);
        }
        commit_separation(&mut next, &model);

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&model, &state, &next) {
                debug!("event {:?} at t={:.2}s", kind, next.time);
                events.push(FlightEvent::at(&model, &next, kind));
            }
        }

        state = next;
    };

    let summary = FlightSummary::from_samples(&samples, model.frame, termination)
        .ok_or_else(|| SimError::invalid("time_step", "run produced no samples"))?;

    info!(
        "trajectory done: {} samples, range {:.1} m, apex {:.1} m, {:.2} s",
        summary.sample_count, summary.impact_distance, summary.max_altitude, summary.flight_time
    );

    Ok(TrajectoryResult { samples, events, summary })
}

/// Run one trajectory with the default termination policy.
pub fn simulate(params: SimulationParameters) -> Result<TrajectoryResult> {
    simulate_with(&params, &SimConfig::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::summary::IdealTrajectory;
    use crate::vehicle::StagedBuilder;

    fn sounding_missile() -> SimulationParameters {
        // 4 t of propellant, F0 = 2 * m0 * g0, derived burn ~77 s
        SimulationParameters::staged(80.0, 0.3, StagedBuilder::new().build())
    }

    #[test]
    fn vacuum_range_matches_closed_form() {
        let r = simulate(SimulationParameters::simple(300.0, 45.0, 0.0)).unwrap();
        let ideal = IdealTrajectory::vacuum(300.0, 45.0);
        let err = (r.summary.impact_distance - ideal.max_range).abs() / ideal.max_range;
        assert!(err < 0.01, "range {} vs {}", r.summary.impact_distance, ideal.max_range);
        assert!(r.summary.reached_ground());
    }

    #[test]
    fn drag_shortens_flight() {
        let clean = simulate(SimulationParameters::simple(300.0, 45.0, 0.0)).unwrap();
        let draggy = simulate(SimulationParameters::simple(300.0, 45.0, 0.01)).unwrap();
        assert!(draggy.summary.impact_distance > 0.0);
        assert!(draggy.summary.impact_distance < clean.summary.impact_distance);
        assert!(draggy.summary.max_altitude < clean.summary.max_altitude);
    }

    #[test]
    fn release_height_extends_range() {
        let ground = simulate(SimulationParameters::simple(100.0, 0.0, 0.001)).unwrap();
        let high_release =
            SimulationParameters::simple(100.0, 0.0, 0.001).with_release_height(500.0);
        let high = simulate(high_release).unwrap();
        assert!(high.summary.impact_distance > ground.summary.impact_distance);
        assert!((high.samples[0].altitude - 500.0).abs() < 1e-12);
    }

    #[test]
    fn downward_shot_from_height_lands() {
        let p = SimulationParameters::simple(50.0, -30.0, 0.001).with_release_height(200.0);
        let r = simulate(p).unwrap();
        assert!(r.summary.reached_ground());
        assert!(r.summary.impact_distance > 0.0);
        assert!((r.summary.max_altitude - 200.0).abs() < 1e-9);
    }

    #[test]
    fn time_ceiling_returns_incomplete_result() {
        let config = SimConfig { max_time: 5.0, grace_period: 0.1 };
        let r = simulate_with(&SimulationParameters::simple(300.0, 80.0, 0.0), &config).unwrap();
        assert_eq!(r.summary.termination, Termination::TimeCeiling);
        assert!(r.summary.flight_time >= 5.0 - 1e-9);
        assert!(r.samples.last().unwrap().altitude > 1_000.0);
        assert!(r.events.iter().any(|e| e.kind == EventKind::TimeCeiling));
    }

    #[test]
    fn non_finite_step_is_reported() {
        let mut s = State {
            time: 1.5,
            pos: Vector2::new(10.0, 20.0),
            vel: Vector2::new(1.0, 1.0),
            mass: 1.0,
            separated: false,
        };
        assert!(check_finite(&s).is_ok());
        s.vel.x = f64::NAN;
        assert!(matches!(
            check_finite(&s),
            Err(SimError::NumericalDivergence { time }) if time == 1.5
        ));
        s.vel.x = 1.0;
        s.pos.y = f64::INFINITY;
        assert!(check_finite(&s).is_err());
    }

    #[test]
    fn heavy_drag_never_yields_non_finite_summary() {
        for drag in [0.05, 0.1, 0.3, 0.9, 1.0, 5.0] {
            match simulate(SimulationParameters::simple(300.0, 45.0, drag)) {
                Ok(r) => {
                    let s = &r.summary;
                    assert!(s.reached_ground(), "drag {drag} hit the ceiling");
                    for v in [s.impact_distance, s.max_altitude, s.max_speed, s.impact_speed] {
                        assert!(v.is_finite(), "drag {drag} gave {v}");
                    }
                    assert!(r
                        .samples
                        .iter()
                        .all(|p| p.altitude.is_finite() && p.speed.is_finite()));
                }
                Err(SimError::InvalidParameter { field, .. }) => assert_eq!(field, "time_step"),
                Err(e) => panic!("drag {drag}: unexpected error {e}"),
            }
        }
    }

    #[test]
    fn heavy_drag_with_fine_step_lands() {
        let p = SimulationParameters::simple(300.0, 45.0, 1.0).with_time_step(1e-3);
        let r = simulate(p).unwrap();
        assert!(r.summary.reached_ground());
        assert!(r.summary.impact_distance.is_finite());
        assert!(r.summary.impact_distance > 0.0);
    }

    #[test]
    fn bad_config_rejected() {
        let config = SimConfig { max_time: 0.0, grace_period: 0.1 };
        assert!(simulate_with(&SimulationParameters::simple(300.0, 45.0, 0.0), &config).is_err());
    }

    #[test]
    fn missile_separates_and_lands() {
        let r = simulate(sounding_missile()).unwrap();
        assert!(r.summary.reached_ground());
        assert!(r.events.iter().any(|e| e.kind == EventKind::Separation));
        assert!(r.events.iter().any(|e| e.kind == EventKind::Apogee));
        assert!(r.summary.range > 10_000.0, "range {}", r.summary.range);
        assert!(r.summary.max_mach > 1.0);
        let last_mass = r.samples.last().unwrap().mass.unwrap();
        assert_eq!(last_mass, 1_000.0);
    }

    #[test]
    fn missile_phases_are_powered_then_ballistic() {
        let r = simulate(sounding_missile()).unwrap();
        assert_eq!(r.samples[0].phase, Phase::Powered);
        let first_ballistic = r.samples.iter().position(|s| s.phase == Phase::Ballistic).unwrap();
        assert!(r.samples[first_ballistic..].iter().all(|s| s.phase == Phase::Ballistic));
    }

    #[test]
    fn separation_flag_never_reverts() {
        let r = simulate(sounding_missile()).unwrap();
        let sep_time = r
            .events
            .iter()
            .find(|e| e.kind == EventKind::Separation)
            .map(|e| e.time)
            .unwrap();
        assert!(r
            .samples
            .iter()
            .filter(|s| s.time >= sep_time)
            .all(|s| s.mass == Some(1_000.0)));
    }
}
