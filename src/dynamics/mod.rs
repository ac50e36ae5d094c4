pub mod state;
pub mod model;
pub mod forces;

pub use state::{Deriv, SimConfig, State};
pub use model::{FlightModel, Frame, Propulsion};
pub use forces::derivatives;
