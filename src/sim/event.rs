use serde::Serialize;

use crate::dynamics::model::FlightModel;
use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Burnout,
    Separation,
    Apogee,
    Impact,
    TimeCeiling,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, Serialize)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub altitude: f64,
    pub speed: f64,
}

impl FlightEvent {
    pub fn at(model: &FlightModel, state: &State, kind: EventKind) -> Self {
        Self {
            time: state.time,
            kind,
            altitude: model.altitude(state),
            speed: state.speed(),
        }
    }
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive accepted states and report events.
pub trait EventDetector {
    fn check(&mut self, model: &FlightModel, prev: &State, current: &State) -> Option<EventKind>;
}

/// Detects motor cutoff (thrust on in `prev`, off in `current`).
pub struct BurnoutDetector;

impl EventDetector for BurnoutDetector {
    fn check(&mut self, model: &FlightModel, prev: &State, current: &State) -> Option<EventKind> {
        if model.thrusting(prev) && !model.thrusting(current) {
            Some(EventKind::Burnout)
        } else {
            None
        }
    }
}

/// Detects the committed separation transition.
pub struct SeparationDetector;

impl EventDetector for SeparationDetector {
    fn check(&mut self, _model: &FlightModel, prev: &State, current: &State) -> Option<EventKind> {
        if !prev.separated && current.separated {
            Some(EventKind::Separation)
        } else {
            None
        }
    }
}

/// Detects apogee (vertical velocity going from positive to non-positive).
#[derive(Default)]
pub struct ApogeeDetector {
    fired: bool,
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, model: &FlightModel, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let v_prev = prev.vel.dot(&model.frame.up(&prev.pos));
        let v_curr = current.vel.dot(&model.frame.up(&current.pos));
        if v_prev > 0.0 && v_curr <= 0.0 {
            self.fired = true;
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Fires once when altitude crosses a threshold in the chosen direction.
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, model: &FlightModel, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let (h_prev, h_curr) = (model.altitude(prev), model.altitude(current));
        let crossed = if self.ascending {
            h_prev < self.altitude && h_curr >= self.altitude
        } else {
            h_prev > self.altitude && h_curr <= self.altitude
        };
        if crossed {
            self.fired = true;
            let dir = if self.ascending { "up" } else { "down" };
            Some(EventKind::Custom(format!("{:.1} km {dir}", self.altitude / 1000.0)))
        } else {
            None
        }
    }
}

/// Detectors every run gets.
pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(BurnoutDetector),
        Box::new(SeparationDetector),
        Box::new(ApogeeDetector::default()),
    ]
}
