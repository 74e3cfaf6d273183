//! Collaborators the metric formulas consume: enemy statistics, accuracy geometry and the
//! per-call status context.

pub mod accuracy;
pub mod population;
pub mod status;

use std::fmt;

use crate::config::{ArmoryConfig, CombatConstants};

pub use accuracy::{AccuracyEstimator, CircularSpread, ConeAccuracy};
pub use population::{BreakpointInput, EnemyPopulation, ReferencePopulation};
pub use status::StatusEffectContext;

/// Read-only inputs shared by every evaluation.
pub struct Environment {
    pub constants: CombatConstants,
    pub population: Box<dyn EnemyPopulation>,
    pub accuracy: Box<dyn AccuracyEstimator>,
}

impl Environment {
    pub fn from_config(config: &ArmoryConfig) -> Self {
        Self {
            constants: config.constants.clone(),
            population: Box::new(ReferencePopulation::new(&config.population, &config.constants)),
            accuracy: Box::new(ConeAccuracy::new(config.accuracy.clone())),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_config(&ArmoryConfig::default())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("constants", &self.constants)
            .finish_non_exhaustive()
    }
}
