pub mod manual;
pub mod params;
pub mod presets;
pub mod stage;

pub use manual::ManualInput;
pub use params::{Mode, SimulationParameters};
pub use presets::{preset, presets, MissilePreset};
pub use stage::{StagedBuilder, StagedParameters};
