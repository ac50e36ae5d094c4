use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::SimConfig;
use crate::error::{Result, SimError};
use crate::vehicle::{preset, ManualInput, SimulationParameters};

/// A run described in YAML: either a preset id or a manual configuration,
/// with an optional termination policy.
///
/// ```yaml
/// name: lob
/// manual:
///   mode: simple
///   v0: 300
///   angle: 45
///   drag: 0.01
/// config:
///   max_time: 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub manual: Option<ManualInput>,
    #[serde(default)]
    pub config: Option<SimConfig>,
}

impl Scenario {
    /// Resolve to parameters and termination policy.
    pub fn resolve(&self) -> Result<(SimulationParameters, SimConfig)> {
        let params = match (&self.preset, &self.manual) {
            (Some(id), None) => preset(id)?.params.clone(),
            (None, Some(manual)) => manual.clone().into_parameters()?,
            _ => return Err(SimError::AmbiguousScenario),
        };
        Ok((params, self.config.unwrap_or_default()))
    }
}

pub fn parse_scenario(text: &str) -> Result<Scenario> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let scenario = parse_scenario(&text)?;
    info!(
        "loaded scenario {} from {}",
        scenario.name.as_deref().unwrap_or("<unnamed>"),
        path.display()
    );
    Ok(scenario)
}
