use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::sim::summary::{FlightSummary, TrajectoryResult};
use crate::sim::FlightEvent;

/// Flat response shape for one prediction: plot arrays plus headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub impact_physics: f64,
    pub max_height: f64,
    pub max_range: f64,
    pub flight_time: f64,
    pub trajectory_points: usize,
    pub summary: FlightSummary,
    pub events: Vec<FlightEvent>,
}

impl From<&TrajectoryResult> for PredictResponse {
    fn from(r: &TrajectoryResult) -> Self {
        let s = &r.summary;
        PredictResponse {
            xs: r.xs(),
            ys: r.ys(),
            impact_physics: s.impact_distance,
            max_height: s.max_altitude,
            max_range: s.range,
            flight_time: s.flight_time,
            trajectory_points: s.sample_count,
            summary: s.clone(),
            events: r.events.clone(),
        }
    }
}

/// Serialize any value as JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}
