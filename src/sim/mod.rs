pub mod event;
pub mod integrator;
pub mod runner;
pub mod summary;

pub use event::{EventDetector, EventKind, FlightEvent};
pub use integrator::rk4_step;
pub use runner::{simulate, simulate_with};
pub use summary::{
    FlightSummary, IdealTrajectory, Phase, Termination, TrajectoryResult, TrajectorySample,
};
