//! Combat metric building blocks shared by every weapon model.

pub mod ammo;
pub mod area;
pub mod dot;
pub mod heat;
pub mod hits;
pub mod rampup;
pub mod utility;

use serde::Serialize;

use crate::model::EnemyPopulation;

pub use area::AoeEfficiency;
pub use heat::{FeedbackOutcome, KillHeatFeedback};
pub use hits::HitSplit;
pub use rampup::RampUp;
pub use utility::UtilityBreakdown;

/// Every metric computed for one build under one status context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub ideal_burst_dps: f64,
    pub ideal_sustained_dps: f64,
    pub sustained_weakpoint_dps: f64,
    pub sustained_weakpoint_accuracy_dps: f64,
    pub additional_target_dps: f64,
    pub max_multi_target_damage: f64,
    pub max_num_targets: u32,
    pub firing_duration: f64,
    pub average_time_to_kill: f64,
    pub average_damage_to_kill: f64,
    /// Body and weakpoint hits per creature archetype; empty when not applicable.
    pub breakpoints: Vec<u32>,
    pub breakpoint_sum: u32,
    pub utility: f64,
    pub utility_breakdown: UtilityBreakdown,
    pub damage_per_magazine: f64,
    pub time_to_fire_magazine: f64,
    /// Percentages; -1 when the weapon has no meaningful accuracy.
    pub general_accuracy: f64,
    pub weakpoint_accuracy: f64,
    /// Seconds until an average target ignites, for builds that apply heat.
    pub time_to_ignite: Option<f64>,
    pub damage_wasted_by_armor: f64,
}

/// Seconds to deplete the average health pool at `dps`.
pub fn time_to_kill(population: &dyn EnemyPopulation, dps: f64) -> f64 {
    if dps <= 0.0 {
        return f64::INFINITY;
    }
    population.average_health_pool() / dps
}

/// Damage actually spent killing an average enemy, including the overkill of the last hit.
pub fn damage_to_kill(population: &dyn EnemyPopulation, damage_per_hit: f64) -> f64 {
    if damage_per_hit <= 0.0 {
        return 0.0;
    }
    (population.average_health_pool() / damage_per_hit).ceil() * damage_per_hit
}

/// Direct damage of a weakpoint hit; `bonus` is the weapon's extra multiplier (0.3 for +30%).
pub fn weakpoint_damage(population: &dyn EnemyPopulation, direct: f64, bonus: f64) -> f64 {
    direct * population.weakpoint_multiplier() * (1.0 + bonus)
}

/// Rounds a displayed value to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CombatConstants, CreatureProfile, PopulationConfig};
    use crate::model::ReferencePopulation;

    fn population() -> ReferencePopulation {
        let config = PopulationConfig {
            creatures: vec![CreatureProfile {
                name: "grunt".to_string(),
                weight: 1.0,
                health: 100.0,
                weakpoint_multiplier: 2.0,
                light_armor: 0.0,
                ignite_temperature: 30.0,
                freeze_temperature: -30.0,
                courage: 0.5,
            }],
            ..PopulationConfig::default()
        };
        ReferencePopulation::new(&config, &CombatConstants::default())
    }

    #[test]
    fn kill_helpers_use_health_pool() {
        let population = population();
        assert_eq!(time_to_kill(&population, 50.0), 2.0);
        assert!(time_to_kill(&population, 0.0).is_infinite());
        assert_eq!(damage_to_kill(&population, 30.0), 120.0);
        assert_eq!(weakpoint_damage(&population, 10.0, 0.5), 30.0);
    }

    #[test]
    fn rounding_keeps_two_places() {
        assert_eq!(round_to(1.4499, 2), 1.45);
        assert_eq!(round_to(1.45, 0), 1.0);
    }
}
