//! Configuration System
//!
//! Loads tuning parameters from `tuning.toml` so behavior constants can be
//! adjusted without recompiling. Every value has a default; behavior rules
//! receive their sub-struct at construction and never read global state.

use bevy_ecs::prelude::Resource;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::host::InteractionKind;

/// Default tuning file path.
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure. Lives in the world as a resource so
/// systems can read shared sections without threading it through.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub combat: CombatConfig,
    pub interaction: InteractionConfig,
    pub doors: DoorConfig,
    pub filth: FilthConfig,
    pub berserker: BerserkerConfig,
    pub boring: BoringConfig,
    pub teacher: TeacherConfig,
    pub caravaneer: CaravaneerConfig,
    pub drunken_master: DrunkenMasterConfig,
    pub extensions: ExtensionsConfig,
}

/// Simulation loop parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_ticks: u64,
    pub snapshot_interval: u64,
    /// Tick the hostile raid arrives on.
    pub raid_tick: u64,
}

/// Shared combat parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub base_melee_hit: f32,
    pub base_melee_dodge: f32,
    pub melee_damage_min: f32,
    pub melee_damage_max: f32,
    /// Ticks a pawn is staggered after a wounding hit.
    pub stagger_ticks: u32,
    /// Health fraction at or below which a pawn is downed.
    pub downed_fraction: f32,
    /// Standard combat AI target acquire distance.
    pub target_acquire_radius: f32,
}

/// Social interaction cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Per-pawn interval between chitchat opportunities.
    pub interval: u64,
    pub radius: f32,
    /// Chance a pawn takes a chitchat opportunity.
    pub chance: f32,
    /// Chance a chitchat turns into an insult instead.
    pub insult_chance: f32,
}

/// Door timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Ticks an opened door waits before closing.
    pub close_delay: u32,
}

/// Dirt tracking parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilthConfig {
    /// Dirt picked up per cell walked outdoors.
    pub dirt_per_outdoor_step: f32,
    /// Dirt deposited as filth per cell walked indoors.
    pub deposit_per_indoor_step: f32,
}

/// Berserker ire/rage tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BerserkerConfig {
    /// Severity drained from ire per decay interval.
    pub ire_trickle: f32,
    /// Rage chance per hit is this factor times current ire severity.
    pub rage_chance_factor: f32,
    /// Ire saturates after core-health times this factor in damage.
    pub damage_scale_factor: f32,
    /// Fraction of the ire trickle that rage feeds back per interval.
    pub rage_ire_trickle_factor: f32,
    /// Fixed decay cadence in ticks.
    pub decay_interval: u64,
    /// Taunt cadence in ticks while raging.
    pub taunt_interval: u64,
    /// Taunt target scan radius in cells.
    pub taunt_radius: f32,
    /// Target acquire distance for the berserk melee override.
    pub target_acquire_radius: f32,
    /// Bounds for the melee job's random expiry, in ticks.
    pub melee_expiry_min: u32,
    pub melee_expiry_max: u32,
}

/// Boring trait tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoringConfig {
    /// Bored severity inflicted per interaction before kind factors.
    pub severity: f32,
    pub build_rapport_factor: f32,
    pub animal_chat_factor: f32,
    pub insult_factor: f32,
    /// Chance per decay interval that a stupefied pawn dozes off.
    pub doze_chance: f32,
    /// Bounds for how long a doze lasts, in ticks.
    pub doze_min_ticks: u32,
    pub doze_max_ticks: u32,
}

impl BoringConfig {
    /// Severity multiplier for an interaction kind.
    pub fn factor(&self, kind: InteractionKind) -> f32 {
        match kind {
            InteractionKind::BuildRapport => self.build_rapport_factor,
            InteractionKind::AnimalChat => self.animal_chat_factor,
            InteractionKind::Insult => self.insult_factor,
            _ => 1.0,
        }
    }
}

/// Teacher trait tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeacherConfig {
    /// XP granted per level of difference between teacher and student.
    pub xp_per_level_difference: f32,
    pub build_rapport_factor: f32,
    pub insult_factor: f32,
}

impl TeacherConfig {
    /// XP multiplier for an interaction kind.
    pub fn factor(&self, kind: InteractionKind) -> f32 {
        match kind {
            InteractionKind::BuildRapport => self.build_rapport_factor,
            InteractionKind::Insult => self.insult_factor,
            _ => 1.0,
        }
    }
}

/// Caravaneer trait tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaravaneerConfig {
    /// Caravan speed bonus; applied at most once per caravan.
    pub speed_bonus: f32,
}

/// Drunken Master trait tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrunkenMasterConfig {
    /// Melee hit/dodge offset per alcohol stage, sober first.
    pub stage_offsets: Vec<f32>,
    /// Alcohol severity one drink adds.
    pub dose_severity: f32,
    /// Severity at which drink would incapacitate; such drinks are
    /// rejected as combat stimulants.
    pub blackout_severity: f32,
}

/// Toggles for optional content integrations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    /// Whether doormats exist on the map (the slob rule only matters with
    /// this enabled).
    pub doormats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            combat: CombatConfig::default(),
            interaction: InteractionConfig::default(),
            doors: DoorConfig::default(),
            filth: FilthConfig::default(),
            berserker: BerserkerConfig::default(),
            boring: BoringConfig::default(),
            teacher: TeacherConfig::default(),
            caravaneer: CaravaneerConfig::default(),
            drunken_master: DrunkenMasterConfig::default(),
            extensions: ExtensionsConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_ticks: 5_000,
            snapshot_interval: 500,
            raid_tick: 600,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_melee_hit: 0.75,
            base_melee_dodge: 0.08,
            melee_damage_min: 5.0,
            melee_damage_max: 12.0,
            stagger_ticks: 30,
            downed_fraction: 0.2,
            target_acquire_radius: 40.0,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interval: 120,
            radius: 8.0,
            chance: 0.25,
            insult_chance: 0.08,
        }
    }
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self { close_delay: 110 }
    }
}

impl Default for FilthConfig {
    fn default() -> Self {
        Self {
            dirt_per_outdoor_step: 0.05,
            deposit_per_indoor_step: 0.1,
        }
    }
}

impl Default for BerserkerConfig {
    fn default() -> Self {
        Self {
            ire_trickle: 0.06,
            rage_chance_factor: 0.20,
            damage_scale_factor: 0.50,
            rage_ire_trickle_factor: 0.4,
            decay_interval: 60,
            taunt_interval: 180,
            taunt_radius: 5.0,
            target_acquire_radius: 40.0,
            melee_expiry_min: 360,
            melee_expiry_max: 480,
        }
    }
}

impl Default for BoringConfig {
    fn default() -> Self {
        Self {
            severity: 0.15,
            build_rapport_factor: 0.15,
            animal_chat_factor: 0.05,
            insult_factor: 0.4,
            doze_chance: 0.05,
            doze_min_ticks: 300,
            doze_max_ticks: 600,
        }
    }
}

impl Default for TeacherConfig {
    fn default() -> Self {
        Self {
            xp_per_level_difference: 200.0,
            build_rapport_factor: 0.1,
            insult_factor: 0.4,
        }
    }
}

impl Default for CaravaneerConfig {
    fn default() -> Self {
        Self { speed_bonus: 0.15 }
    }
}

impl Default for DrunkenMasterConfig {
    fn default() -> Self {
        Self {
            stage_offsets: vec![0.0, 0.04, 0.08, 0.12, 0.0],
            dose_severity: 0.15,
            blackout_severity: 0.9,
        }
    }
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self { doormats: true }
    }
}

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load configuration from the default path, falling back to defaults
    /// when the file is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            eprintln!("Warning: {}. Using defaults.", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.berserker.decay_interval, 60);
        assert!((config.berserker.ire_trickle - 0.06).abs() < f32::EPSILON);
        assert!((config.boring.severity - 0.15).abs() < f32::EPSILON);
        assert!(config.extensions.doormats);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [berserker]
            ire_trickle = 0.1
            "#,
        )
        .unwrap();
        assert!((config.berserker.ire_trickle - 0.1).abs() < f32::EPSILON);
        // Untouched sections keep their defaults.
        assert_eq!(config.simulation.default_ticks, 5_000);
        assert_eq!(config.berserker.taunt_interval, 180);
    }

    #[test]
    fn test_interaction_factors() {
        let boring = BoringConfig::default();
        assert!((boring.factor(InteractionKind::Insult) - 0.4).abs() < f32::EPSILON);
        assert!((boring.factor(InteractionKind::Chitchat) - 1.0).abs() < f32::EPSILON);

        let teacher = TeacherConfig::default();
        assert!((teacher.factor(InteractionKind::BuildRapport) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("definitely_not_here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
