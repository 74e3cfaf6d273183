//! Tunable constants and the reference enemy table, loaded from YAML or JSON.
//!
//! Every field has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const CONFIG_ENV_VAR: &str = "ARMORY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format '{0}', expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    pub constants: CombatConstants,
    pub population: PopulationConfig,
    pub accuracy: AccuracyConfig,
}

/// Externally defined multipliers, damage-over-time figures and utility weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    /// Unmodified walking speed in m/s.
    pub walk_speed: f64,
    pub frozen_damage_multiplier: f64,
    /// Multiplier for targets inside a damage-amplifying field.
    pub amplified_damage_multiplier: f64,
    pub burn_dps: f64,
    pub burn_duration: f64,
    pub neuro_dps: f64,
    pub neuro_duration: f64,
    pub fear_duration: f64,
    pub utility: UtilityWeights,
}

impl Default for CombatConstants {
    fn default() -> Self {
        Self {
            walk_speed: 2.9,
            frozen_damage_multiplier: 3.0,
            amplified_damage_multiplier: 1.3,
            burn_dps: 11.0,
            burn_duration: 5.0,
            neuro_dps: 10.0,
            neuro_duration: 10.0,
            fear_duration: 2.5,
            utility: UtilityWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityWeights {
    pub movespeed: f64,
    pub damage_resist: f64,
    pub armor_break: f64,
    pub slow: f64,
    pub fear: f64,
    pub stun: f64,
    pub cold: f64,
    pub frozen: f64,
}

impl Default for UtilityWeights {
    fn default() -> Self {
        Self {
            movespeed: 1.0,
            damage_resist: 1.0,
            armor_break: 1.0,
            slow: 1.0,
            fear: 1.5,
            stun: 1.0,
            cold: 0.5,
            frozen: 2.0,
        }
    }
}

/// One creature archetype of the reference population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub name: String,
    /// Relative spawn weight; weights are normalized when averaging.
    pub weight: f64,
    pub health: f64,
    pub weakpoint_multiplier: f64,
    /// Damage a light armor plate absorbs before breaking; 0 for unarmored creatures.
    #[serde(default)]
    pub light_armor: f64,
    pub ignite_temperature: f64,
    /// Negative temperature at which the creature freezes.
    pub freeze_temperature: f64,
    /// Resistance to fear in [0, 1].
    #[serde(default)]
    pub courage: f64,
}

impl CreatureProfile {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        weight: f64,
        health: f64,
        weakpoint_multiplier: f64,
        light_armor: f64,
        ignite_temperature: f64,
        freeze_temperature: f64,
        courage: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            weight,
            health,
            weakpoint_multiplier,
            light_armor,
            ignite_temperature,
            freeze_temperature,
            courage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Scales every creature's health (difficulty and player count).
    pub health_scale: f64,
    /// Radius occupied by one creature when packing them into an area.
    pub body_radius: f64,
    pub creatures: Vec<CreatureProfile>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            health_scale: 1.0,
            body_radius: 0.75,
            creatures: vec![
                CreatureProfile::new("grunt", 0.45, 90.0, 2.0, 15.0, 30.0, -30.0, 0.5),
                CreatureProfile::new("guard", 0.08, 270.0, 2.0, 15.0, 30.0, -30.0, 0.5),
                CreatureProfile::new("slasher", 0.08, 148.0, 2.0, 15.0, 30.0, -30.0, 0.5),
                CreatureProfile::new("swarmer", 0.17, 12.0, 1.0, 0.0, 5.0, -20.0, 0.0),
                CreatureProfile::new("acid_spitter", 0.06, 120.0, 2.0, 0.0, 35.0, -50.0, 0.3),
                CreatureProfile::new("mactera", 0.1, 223.0, 3.0, 0.0, 100.0, -150.0, 0.5),
                CreatureProfile::new("praetorian", 0.06, 750.0, 1.0, 0.0, 100.0, -250.0, 0.5),
            ],
        }
    }
}

/// Geometry the default accuracy estimator works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyConfig {
    /// Distance to the target in meters.
    pub distance: f64,
    /// Horizontal field of view in degrees spread over `screen_width_px`.
    pub field_of_view: f64,
    pub screen_width_px: f64,
    /// Radius of the reference target body in meters.
    pub target_radius: f64,
    pub weakpoint_radius: f64,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self {
            distance: 10.0,
            field_of_view: 90.0,
            screen_width_px: 1920.0,
            target_radius: 0.4,
            weakpoint_radius: 0.2,
        }
    }
}

impl ArmoryConfig {
    /// Rejects values the population and accuracy formulas cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let population = &self.population;

        if !positive(population.health_scale) {
            errors.push(format!(
                "population.health_scale must be positive, found {}",
                population.health_scale
            ));
        }
        if !positive(population.body_radius) {
            errors.push(format!(
                "population.body_radius must be positive, found {}",
                population.body_radius
            ));
        }

        if population.creatures.is_empty() {
            errors.push("population.creatures must not be empty".to_string());
        } else {
            for creature in &population.creatures {
                if !creature.weight.is_finite() || creature.weight < 0.0 {
                    errors.push(format!(
                        "creature '{}' has negative weight {}",
                        creature.name, creature.weight
                    ));
                }
                if !positive(creature.health) {
                    errors.push(format!(
                        "creature '{}' must have positive health, found {}",
                        creature.name, creature.health
                    ));
                }
            }
            let total: f64 = population.creatures.iter().map(|creature| creature.weight).sum();
            if !positive(total) {
                errors.push("population.creatures weights must sum above zero".to_string());
            }
        }

        if !positive(self.accuracy.distance) {
            errors.push(format!(
                "accuracy.distance must be positive, found {}",
                self.accuracy.distance
            ));
        }

        if errors.is_empty() {
            return Ok(());
        }
        Err(ConfigError::Invalid(errors.join("; ")))
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Loads a config file. A missing file yields the defaults; a malformed or out-of-range one is
/// an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<ArmoryConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(ArmoryConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let config: ArmoryConfig = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&raw)?,
        "json" => serde_json::from_str(&raw)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    config.validate()?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Config from the path in `ARMORY_CONFIG`, or defaults when it is unset.
pub fn load_config_from_env() -> Result<ArmoryConfig, ConfigError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => load_config(path.trim()),
        _ => Ok(ArmoryConfig::default()),
    }
}
