use ballistic_sim::io::parse_scenario;
use ballistic_sim::physics::atmosphere;
use ballistic_sim::sim::{simulate, simulate_with, EventKind, IdealTrajectory, Termination};
use ballistic_sim::vehicle::{preset, SimulationParameters, StagedBuilder};
use ballistic_sim::{SimConfig, SimError};

fn range(v0: f64, angle: f64, drag: f64) -> f64 {
    simulate(SimulationParameters::simple(v0, angle, drag))
        .unwrap()
        .summary
        .impact_distance
}

#[test]
fn vacuum_matches_closed_form_across_angles() {
    for angle in [15.0, 30.0, 45.0, 60.0, 75.0] {
        let sim = range(250.0, angle, 0.0);
        let ideal = IdealTrajectory::vacuum(250.0, angle).max_range;
        assert!(
            ((sim - ideal) / ideal).abs() < 0.01,
            "angle {angle}: {sim} vs {ideal}"
        );
    }
}

#[test]
fn more_drag_always_flies_shorter() {
    let ranges: Vec<f64> = [0.0, 0.0005, 0.002, 0.01, 0.03]
        .iter()
        .map(|&k| range(300.0, 45.0, k))
        .collect();
    assert!(ranges.windows(2).all(|w| w[1] < w[0]), "{ranges:?}");
}

#[test]
fn light_drag_lob_falls_short_of_vacuum() {
    let r = simulate(SimulationParameters::simple(300.0, 45.0, 0.01)).unwrap();
    let ideal = IdealTrajectory::vacuum(300.0, 45.0);
    assert!(r.summary.reached_ground());
    assert!(r.summary.impact_distance > 0.0);
    assert!(r.summary.impact_distance < ideal.max_range);
    assert!(r.summary.max_altitude < ideal.max_height);
    assert!(r.summary.energy_loss_percent.unwrap() > 0.0);
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let p = preset("v2").unwrap().params.clone();
    let a = simulate(p.clone()).unwrap();
    let b = simulate(p).unwrap();
    assert_eq!(a.samples, b.samples);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn staged_mass_is_monotone() {
    let staged = StagedBuilder::new().build();
    let burn = staged.burn_time();
    let r = simulate(SimulationParameters::staged(75.0, 0.3, staged)).unwrap();

    let masses: Vec<f64> = r.samples.iter().map(|s| s.mass.unwrap()).collect();
    assert!(masses.windows(2).all(|w| w[1] <= w[0]));

    // constant once the burn window has closed
    let tail: Vec<f64> = r
        .samples
        .iter()
        .filter(|s| s.time > burn * 1.05 + 0.2)
        .map(|s| s.mass.unwrap())
        .collect();
    assert!(!tail.is_empty());
    assert!(tail.iter().all(|&m| m == tail[0]));
}

#[test]
fn separation_happens_once_near_burnout() {
    let staged = StagedBuilder::new().build();
    let burn = staged.burn_time();
    let r = simulate(SimulationParameters::staged(75.0, 0.3, staged)).unwrap();

    let seps: Vec<_> = r.events.iter().filter(|e| e.kind == EventKind::Separation).collect();
    assert_eq!(seps.len(), 1);
    assert!((seps[0].time - burn).abs() < 1.0, "separated at {} for burn {}", seps[0].time, burn);
}

#[test]
fn short_ceiling_reports_incomplete_flight() {
    let p = preset("scud-b").unwrap().params.clone();
    let r = simulate_with(&p, &SimConfig { max_time: 30.0, ..SimConfig::default() }).unwrap();
    assert_eq!(r.summary.termination, Termination::TimeCeiling);
    assert!(r.samples.last().unwrap().altitude > 0.0);
}

#[test]
fn invalid_inputs_fail_before_integration() {
    let bad_dt = SimulationParameters::simple(300.0, 45.0, 0.01).with_time_step(-1.0);
    assert!(matches!(simulate(bad_dt), Err(SimError::InvalidParameter { field: "time_step", .. })));

    let bad_height = SimulationParameters::simple(300.0, 45.0, 0.01).with_release_height(-5.0);
    assert!(matches!(
        simulate(bad_height),
        Err(SimError::InvalidParameter { field: "release_height", .. })
    ));
}

#[test]
fn atmosphere_is_continuous_at_layer_boundaries() {
    for h in [11_000.0, 20_000.0, 32_000.0] {
        let below = atmosphere::density(h - 1e-3);
        let above = atmosphere::density(h + 1e-3);
        assert!(((below - above) / below).abs() < 1e-5, "jump at {h}");
    }
}

#[test]
fn scenario_end_to_end() {
    let yaml = "\
name: high release
manual:
  mode: simple
  v0: 120
  angle: -20
  drag: 0.002
  release_height: 800
";
    let (params, config) = parse_scenario(yaml).unwrap().resolve().unwrap();
    let r = simulate_with(&params, &config).unwrap();
    assert!(r.summary.reached_ground());
    assert!((r.summary.max_altitude - 800.0).abs() < 1e-9);
    assert!(r.summary.impact_distance > 0.0);
}
