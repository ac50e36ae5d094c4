pub mod dataset;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use dynamics::state::SimConfig;
pub use error::{Result, SimError};
pub use sim::{simulate, simulate_with, FlightSummary, IdealTrajectory, TrajectoryResult};
pub use vehicle::{preset, presets, ManualInput, Mode, SimulationParameters, StagedParameters};
