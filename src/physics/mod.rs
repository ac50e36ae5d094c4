pub mod atmosphere;
pub mod aerodynamics;
pub mod gravity;

pub use atmosphere::{isa, Atmo};
pub use aerodynamics::{drag_accel, effective_cd};
pub use gravity::local_gravity;
