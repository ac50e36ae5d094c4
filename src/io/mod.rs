pub mod json;
pub mod scenario;

pub use json::{write_json, PredictResponse};
pub use scenario::{load_scenario, parse_scenario, Scenario};
