//! Enemy population statistics consumed by the metric formulas.

use std::f64::consts::PI;

use crate::config::{CombatConstants, CreatureProfile, PopulationConfig};

use super::StatusEffectContext;

/// Per-hit damage figures used to compute shots-to-kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointInput {
    pub direct: f64,
    pub area: f64,
    /// Damage dealt once per enemy by damage-over-time effects.
    pub dot_damage: f64,
    /// Extra weakpoint multiplier on top of the creature's own, e.g. 0.3 for +30%.
    pub weakpoint_bonus: f64,
    /// Multiplier on direct damage against light armor plates.
    pub armor_breaking: f64,
    pub heat_per_shot: f64,
    pub shots_per_sec: f64,
    pub status: StatusEffectContext,
}

impl Default for BreakpointInput {
    fn default() -> Self {
        Self {
            direct: 0.0,
            area: 0.0,
            dot_damage: 0.0,
            weakpoint_bonus: 0.0,
            armor_breaking: 1.0,
            heat_per_shot: 0.0,
            shots_per_sec: 0.0,
            status: StatusEffectContext::default(),
        }
    }
}

pub trait EnemyPopulation {
    fn average_health_pool(&self) -> f64;

    /// Spawn-weighted weakpoint multiplier.
    fn weakpoint_multiplier(&self) -> f64;

    /// Seconds until an average enemy ignites. Infinite when no heat is applied.
    fn average_time_to_ignite(&self, heat_per_hit: f64, hits_per_sec: f64, heat_per_sec: f64)
        -> f64;

    /// Seconds until an average enemy freezes; `cold_per_hit` may be given as a negative temperature.
    fn average_time_to_freeze(&self, cold_per_hit: f64, hits_per_sec: f64) -> f64;

    /// Fraction of the population ignited by a single burst of `heat`.
    fn percentage_ignited_by_burst(&self, heat: f64) -> f64;

    /// Body and weakpoint hits to kill, two entries per creature archetype. Body hits on
    /// light armor lose their direct damage until the plate breaks; heat adds burn damage
    /// once the creature ignites.
    fn breakpoints(&self, input: &BreakpointInput) -> Vec<u32>;

    /// Percentage of damage absorbed by light armor plates before they break.
    fn percentage_damage_wasted_by_armor(
        &self,
        damage_per_hit: f64,
        armor_breaking: f64,
        general_accuracy: f64,
        weakpoint_accuracy: f64,
    ) -> f64;

    /// Average fear duration, extended when the fleeing enemy is also slowed.
    fn average_fear_duration(&self, slow: f64, slow_duration: f64) -> f64;

    fn fear_proc_probability(&self, fear_factor: f64) -> f64;

    fn light_armor_break_probability(&self, damage: f64, armor_breaking: f64) -> f64;

    /// Enemies packed inside a circle of `radius` meters; at least one.
    fn targets_in_radius(&self, radius: f64) -> u32;

    /// Enemies caught along a stream reaching `reach` meters; at least one.
    fn targets_in_stream(&self, reach: f64) -> u32;
}

/// Weighted table of creature archetypes.
#[derive(Debug, Clone)]
pub struct ReferencePopulation {
    creatures: Vec<CreatureProfile>,
    health_scale: f64,
    body_radius: f64,
    constants: CombatConstants,
}

impl ReferencePopulation {
    pub fn new(config: &PopulationConfig, constants: &CombatConstants) -> Self {
        Self {
            creatures: config.creatures.clone(),
            health_scale: config.health_scale,
            body_radius: config.body_radius,
            constants: constants.clone(),
        }
    }

    pub fn creatures(&self) -> &[CreatureProfile] {
        &self.creatures
    }

    fn total_weight(&self) -> f64 {
        self.creatures.iter().map(|creature| creature.weight).sum()
    }

    /// Spawn-weighted mean of `value` over every creature; 0 for an empty table.
    fn weighted<F>(&self, value: F) -> f64
    where
        F: Fn(&CreatureProfile) -> f64,
    {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        self.creatures
            .iter()
            .map(|creature| creature.weight * value(creature))
            .sum::<f64>()
            / total
    }

    fn health_of(&self, creature: &CreatureProfile) -> f64 {
        creature.health * self.health_scale
    }

    fn armored(&self) -> impl Iterator<Item = &CreatureProfile> {
        self.creatures
            .iter()
            .filter(|creature| creature.light_armor > 0.0)
    }

    /// Hit after which burn damage starts, paired with the burn damage each later hit adds.
    fn ignition_step(
        &self,
        creature: &CreatureProfile,
        input: &BreakpointInput,
    ) -> Option<(f64, f64)> {
        let burn_dps = self.constants.burn_dps;
        if input.status.frozen
            || input.heat_per_shot <= 0.0
            || input.shots_per_sec <= 0.0
            || burn_dps <= 0.0
        {
            return None;
        }
        let ignite_after = (creature.ignite_temperature / input.heat_per_shot).ceil().max(1.0);
        Some((ignite_after, burn_dps / input.shots_per_sec))
    }
}

/// Hits needed to deal `health` when each hit deals `base` plus every `extra` whose `after`
/// hit count has been reached. 0 when the damage never adds up.
fn hits_to_deal(health: f64, base: f64, mut steps: Vec<(f64, f64)>) -> u32 {
    if health <= 0.0 {
        return 1;
    }
    steps.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut remaining = health;
    let mut fired = 0.0;
    let mut rate = base.max(0.0);
    for (after, extra) in steps {
        let span = after - fired;
        if span > 0.0 {
            if rate > 0.0 && remaining <= span * rate {
                return (fired + (remaining / rate).ceil()) as u32;
            }
            remaining -= span * rate;
            fired = after;
        }
        rate += extra.max(0.0);
    }
    if rate <= 0.0 {
        0
    } else {
        (fired + (remaining / rate).ceil()) as u32
    }
}

impl EnemyPopulation for ReferencePopulation {
    fn average_health_pool(&self) -> f64 {
        self.weighted(|creature| self.health_of(creature))
    }

    fn weakpoint_multiplier(&self) -> f64 {
        self.weighted(|creature| creature.weakpoint_multiplier)
    }

    fn average_time_to_ignite(
        &self,
        heat_per_hit: f64,
        hits_per_sec: f64,
        heat_per_sec: f64,
    ) -> f64 {
        let rate = heat_per_hit * hits_per_sec + heat_per_sec;
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        self.weighted(|creature| creature.ignite_temperature / rate)
    }

    fn average_time_to_freeze(&self, cold_per_hit: f64, hits_per_sec: f64) -> f64 {
        let rate = cold_per_hit.abs() * hits_per_sec;
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        self.weighted(|creature| creature.freeze_temperature.abs() / rate)
    }

    fn percentage_ignited_by_burst(&self, heat: f64) -> f64 {
        self.weighted(|creature| {
            if creature.ignite_temperature <= heat {
                1.0
            } else {
                0.0
            }
        })
    }

    fn breakpoints(&self, input: &BreakpointInput) -> Vec<u32> {
        let status = input.status;
        let direct = input.direct * status.direct_multiplier(&self.constants);
        let area = input.area * status.area_multiplier(&self.constants);

        self.creatures
            .iter()
            .flat_map(|creature| {
                let health = self.health_of(creature) - input.dot_damage;
                let burn = self.ignition_step(creature, input);

                // frozen targets shatter plates and take no weakpoint bonus
                let weakpoint_direct = if status.frozen {
                    direct
                } else {
                    direct * creature.weakpoint_multiplier * (1.0 + input.weakpoint_bonus)
                };
                let weakpoint =
                    hits_to_deal(health, weakpoint_direct + area, burn.into_iter().collect());

                let mut steps: Vec<(f64, f64)> = burn.into_iter().collect();
                let mut body_base = area;
                if creature.light_armor > 0.0 && !status.frozen && direct > 0.0 {
                    let per_hit = direct * input.armor_breaking;
                    if per_hit > 0.0 {
                        steps.push(((creature.light_armor / per_hit).ceil(), direct));
                    }
                } else {
                    body_base += direct;
                }
                let body = hits_to_deal(health, body_base, steps);

                [body, weakpoint]
            })
            .collect()
    }

    fn percentage_damage_wasted_by_armor(
        &self,
        damage_per_hit: f64,
        armor_breaking: f64,
        general_accuracy: f64,
        weakpoint_accuracy: f64,
    ) -> f64 {
        if damage_per_hit <= 0.0 || armor_breaking <= 0.0 {
            return 0.0;
        }
        let body_share = if general_accuracy > 0.0 {
            ((general_accuracy - weakpoint_accuracy.max(0.0)) / general_accuracy).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let wasted = self.weighted(|creature| {
            if creature.light_armor <= 0.0 {
                return 0.0;
            }
            let hits_to_break = (creature.light_armor / (damage_per_hit * armor_breaking)).ceil();
            let absorbed = hits_to_break * damage_per_hit * body_share;
            (absorbed / self.health_of(creature)).min(1.0)
        });
        100.0 * wasted
    }

    fn average_fear_duration(&self, slow: f64, slow_duration: f64) -> f64 {
        let fear_duration = self.constants.fear_duration;
        let overlap = slow_duration.clamp(0.0, fear_duration);
        fear_duration + slow.clamp(0.0, 1.0) * overlap
    }

    fn fear_proc_probability(&self, fear_factor: f64) -> f64 {
        self.weighted(|creature| (fear_factor * (1.0 - creature.courage)).clamp(0.0, 1.0))
    }

    fn light_armor_break_probability(&self, damage: f64, armor_breaking: f64) -> f64 {
        let armored: Vec<&CreatureProfile> = self.armored().collect();
        let total: f64 = armored.iter().map(|creature| creature.weight).sum();
        if total <= 0.0 {
            return 1.0;
        }
        armored
            .iter()
            .map(|creature| {
                creature.weight * (damage * armor_breaking / creature.light_armor).min(1.0)
            })
            .sum::<f64>()
            / total
    }

    fn targets_in_radius(&self, radius: f64) -> u32 {
        // hexagonal packing of circles with radius rho
        let cell = 2.0 * 3f64.sqrt() * self.body_radius * self.body_radius;
        ((PI * radius * radius / cell).floor() as u32).max(1)
    }

    fn targets_in_stream(&self, reach: f64) -> u32 {
        let in_line = reach / (2.0 * self.body_radius);
        ((in_line * 0.5).floor() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population() -> ReferencePopulation {
        ReferencePopulation::new(&PopulationConfig::default(), &CombatConstants::default())
    }

    fn single(light_armor: f64) -> ReferencePopulation {
        let config = PopulationConfig {
            creatures: vec![CreatureProfile {
                name: "grunt".to_string(),
                weight: 1.0,
                health: 100.0,
                weakpoint_multiplier: 2.0,
                light_armor,
                ignite_temperature: 30.0,
                freeze_temperature: -30.0,
                courage: 0.5,
            }],
            ..PopulationConfig::default()
        };
        ReferencePopulation::new(&config, &CombatConstants::default())
    }

    #[test]
    fn health_pool_is_weighted() {
        let pool = population().average_health_pool();
        assert!(pool > 12.0 && pool < 750.0);
        assert_eq!(single(0.0).average_health_pool(), 100.0);
    }

    #[test]
    fn radius_packing_has_floor_of_one() {
        let population = population();
        assert_eq!(population.targets_in_radius(0.1), 1);
        assert_eq!(population.targets_in_radius(1.4), 3);
        assert!(population.targets_in_radius(3.0) > population.targets_in_radius(1.5));
        assert_eq!(population.targets_in_stream(0.5), 1);
    }

    #[test]
    fn breakpoints_count_body_and_weakpoint() {
        let input = BreakpointInput {
            direct: 20.0,
            area: 5.0,
            ..BreakpointInput::default()
        };
        assert_eq!(single(0.0).breakpoints(&input), vec![4, 3]);
    }

    #[test]
    fn armor_breaking_lowers_armored_body_breakpoints() {
        let input = BreakpointInput {
            direct: 5.0,
            ..BreakpointInput::default()
        };
        let stronger = BreakpointInput {
            armor_breaking: 3.0,
            ..input
        };
        // three hits break a 15 point plate, twenty more kill
        assert_eq!(single(15.0).breakpoints(&input), vec![23, 10]);
        assert_eq!(single(15.0).breakpoints(&stronger), vec![21, 10]);
        assert_eq!(single(0.0).breakpoints(&input), single(0.0).breakpoints(&stronger));

        let armored = population();
        let before: u32 = armored.breakpoints(&input).iter().sum();
        let after: u32 = armored.breakpoints(&stronger).iter().sum();
        assert!(after < before);
    }

    #[test]
    fn plate_only_absorbs_direct_damage() {
        let input = BreakpointInput {
            direct: 5.0,
            area: 5.0,
            armor_breaking: 0.0,
            ..BreakpointInput::default()
        };
        // an unbreakable plate leaves only the area damage on body hits
        assert_eq!(single(15.0).breakpoints(&input), vec![20, 7]);
    }

    #[test]
    fn ignition_adds_burn_damage_per_hit() {
        let input = BreakpointInput {
            direct: 10.0,
            heat_per_shot: 10.0,
            shots_per_sec: 2.0,
            ..BreakpointInput::default()
        };
        // ignites on the third hit, then 5.5 burn damage rides on every later hit
        assert_eq!(single(0.0).breakpoints(&input), vec![8, 5]);

        let frozen = BreakpointInput {
            status: StatusEffectContext {
                frozen: true,
                ..StatusEffectContext::default()
            },
            ..input
        };
        assert_eq!(single(15.0).breakpoints(&frozen), vec![4, 4]);
    }

    #[test]
    fn amplified_targets_take_more_damage() {
        let input = BreakpointInput {
            direct: 20.0,
            area: 5.0,
            status: StatusEffectContext {
                damage_amplified: true,
                ..StatusEffectContext::default()
            },
            ..BreakpointInput::default()
        };
        // 32.5 per body hit, 58.5 per weakpoint hit
        assert_eq!(single(0.0).breakpoints(&input), vec![4, 2]);
    }

    #[test]
    fn damage_that_never_lands_reports_zero_hits() {
        assert_eq!(hits_to_deal(100.0, 0.0, Vec::new()), 0);
        assert_eq!(hits_to_deal(0.0, 0.0, Vec::new()), 1);
        assert_eq!(hits_to_deal(100.0, 0.0, vec![(3.0, 50.0)]), 5);
    }

    #[test]
    fn ignite_and_freeze_scale_with_rate() {
        let population = single(0.0);
        assert_eq!(population.average_time_to_ignite(0.0, 0.0, 10.0), 3.0);
        assert_eq!(population.average_time_to_freeze(-10.0, 1.5), 2.0);
        assert!(population.average_time_to_ignite(0.0, 0.0, 0.0).is_infinite());
    }

    #[test]
    fn armor_break_probability_is_capped() {
        let population = single(15.0);
        assert_eq!(population.light_armor_break_probability(30.0, 1.0), 1.0);
        assert!((population.light_armor_break_probability(5.0, 1.0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(single(0.0).light_armor_break_probability(1.0, 1.0), 1.0);
    }

    #[test]
    fn unarmored_population_wastes_nothing() {
        assert_eq!(
            single(0.0).percentage_damage_wasted_by_armor(10.0, 1.0, 80.0, 20.0),
            0.0
        );
        assert!(single(15.0).percentage_damage_wasted_by_armor(10.0, 1.0, 80.0, 20.0) > 0.0);
    }
}
