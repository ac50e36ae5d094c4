use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::params::SimulationParameters;
use super::stage::StagedBuilder;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Preset table
// ---------------------------------------------------------------------------

/// A named, ready-to-run configuration with descriptive metadata.
/// The textual fields are display-only and never feed the integrator.
#[derive(Debug, Clone, Serialize)]
pub struct MissilePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub category: &'static str,
    pub range: &'static str,
    pub speed: &'static str,
    pub cep: &'static str,
    pub params: SimulationParameters,
}

static REGISTRY: OnceLock<BTreeMap<&'static str, MissilePreset>> = OnceLock::new();

fn registry() -> &'static BTreeMap<&'static str, MissilePreset> {
    REGISTRY.get_or_init(|| {
        build_presets()
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    })
}

/// Look up a preset by id.
pub fn preset(id: &str) -> Result<&'static MissilePreset> {
    registry()
        .get(id)
        .ok_or_else(|| SimError::UnknownPreset(id.to_string()))
}

/// All presets, ordered by id.
pub fn presets() -> impl Iterator<Item = &'static MissilePreset> {
    registry().values()
}

fn build_presets() -> Vec<MissilePreset> {
    vec![
        // --- Powered ---
        MissilePreset {
            id: "v2",
            name: "V-2 (A4)",
            country: "Germany",
            category: "SRBM",
            range: "320 km",
            speed: "Mach 4.8",
            cep: "17 km",
            params: SimulationParameters::staged(
                85.0,
                0.25,
                StagedBuilder::new()
                    .launch_mass(12_500.0)
                    .empty_mass(4_000.0)
                    .payload_mass(1_000.0)
                    .thrust_to_weight(2.2)
                    .specific_impulse(203.0)
                    .cross_section(2.14)
                    .payload_cross_section(0.8)
                    .build(),
            ),
        },
        MissilePreset {
            id: "scud-b",
            name: "R-17 Elbrus (Scud-B)",
            country: "USSR",
            category: "SRBM",
            range: "300 km",
            speed: "Mach 5",
            cep: "450 m",
            params: SimulationParameters::staged(
                80.0,
                0.25,
                StagedBuilder::new()
                    .launch_mass(5_900.0)
                    .empty_mass(2_000.0)
                    .payload_mass(985.0)
                    .thrust_to_weight(2.25)
                    .specific_impulse(226.0)
                    .cross_section(0.61)
                    .build(),
            ),
        },
        MissilePreset {
            id: "sounding-rocket",
            name: "Single-stage sounding rocket",
            country: "Canada",
            category: "Research",
            range: "n/a",
            speed: "Mach 6",
            cep: "n/a",
            params: SimulationParameters::staged(
                85.0,
                0.3,
                StagedBuilder::new()
                    .launch_mass(1_300.0)
                    .empty_mass(500.0)
                    .payload_mass(200.0)
                    .thrust_to_weight(5.0)
                    .specific_impulse(240.0)
                    .cross_section(0.17)
                    .build(),
            ),
        },
        // --- Unpowered ---
        // Simple-mode drag is the lumped rho0*Cd*A/(2m)
        MissilePreset {
            id: "artillery-155mm",
            name: "155 mm howitzer shell",
            country: "NATO",
            category: "Artillery",
            range: "24 km",
            speed: "827 m/s",
            cep: "150 m",
            params: SimulationParameters::simple(827.0, 45.0, 8.0e-5),
        },
        MissilePreset {
            id: "cannonball",
            name: "12-pounder round shot",
            country: "n/a",
            category: "Historical",
            range: "1.5 km",
            speed: "440 m/s",
            cep: "n/a",
            params: SimulationParameters::simple(440.0, 30.0, 5.7e-4),
        },
        MissilePreset {
            id: "baseball",
            name: "Baseball (outfield throw)",
            country: "n/a",
            category: "Sport",
            range: "100 m",
            speed: "40 m/s",
            cep: "n/a",
            params: SimulationParameters::simple(40.0, 35.0, 5.3e-3).with_release_height(2.0),
        },
    ]
}
