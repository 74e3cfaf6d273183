//! CRSPR Flamethrower. The stream passes through every target in reach, ignores armor and never
//! lands weakpoint hits, so one DPS formula covers all single-target variants.

use serde::Serialize;

use crate::build::BuildSelection;
use crate::catalog::{Catalog, Classification, CostVector, ModifierOption, OverclockOption};
use crate::metrics::{
    ammo, damage_to_kill, dot, round_to, time_to_kill, AoeEfficiency, MetricsReport,
    UtilityBreakdown,
};
use crate::model::{Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::resolve::{Marker, Rule, Selector, StatTable};

use super::{DerivedStats, Weapon, WeaponKind};

pub static FLAMETHROWER: Flamethrower = Flamethrower;

const HIGH_CAPACITY_TANKS: Selector = Selector::tier(1, 0);
const HIGH_PRESSURE_EJECTOR: Selector = Selector::tier(1, 1);
const UNFILTERED_FUEL: Selector = Selector::tier(2, 0);
const TRIPLE_FILTERED_FUEL: Selector = Selector::tier(2, 1);
const STICKY_DURATION_T2: Selector = Selector::tier(2, 2);
const OVERSIZED_VALVES: Selector = Selector::tier(3, 0);
const STICKY_SLOWDOWN: Selector = Selector::tier(3, 1);
const MORE_FUEL_T3: Selector = Selector::tier(3, 2);
const IT_BURNS: Selector = Selector::tier(4, 0);
const STICKY_DURATION_T4: Selector = Selector::tier(4, 1);
const MORE_FUEL_T4: Selector = Selector::tier(4, 2);
const HEAT_RADIANCE: Selector = Selector::tier(5, 0);
const TARGETS_EXPLODE: Selector = Selector::tier(5, 1);

const LIGHTER_TANKS: Selector = Selector::overclock(0);
const STICKY_ADDITIVE: Selector = Selector::overclock(1);
const COMPACT_FEED_VALVES: Selector = Selector::overclock(2);
const FUEL_STREAM_DIFFUSER: Selector = Selector::overclock(3);
const FACE_MELTER: Selector = Selector::overclock(4);
const STICKY_FUEL: Selector = Selector::overclock(5);

const FEAR_FACTOR_PER_PARTICLE: f64 = 0.13;
const HEAT_RADIANCE_HEAT: f64 = 80.0;
const HEAT_RADIANCE_RADIUS: f64 = 3.0;
/// Kiting distance that keeps enemies out of melee range.
const KITING_RADIUS: f64 = 1.5;
const EXPLOSION_DAMAGE: f64 = 55.0;
const EXPLOSION_CHANCE: f64 = 0.5;
const TEMPERATURE_SHOCK_DAMAGE: f64 = 200.0;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    particle_damage: f64,
    particle_heat: f64,
    max_fuel: f64,
    fuel_tank_size: f64,
    flow_rate: f64,
    reload_time: f64,
    flame_reach: f64,
    sticky_flames_damage_per_tick: f64,
    sticky_flames_heat_per_tick: f64,
    sticky_flames_ticks_per_sec: f64,
    sticky_flames_duration: f64,
    sticky_flames_slow: f64,
    movespeed_while_firing: f64,
}

const BASELINE: Baseline = Baseline {
    particle_damage: 10.0,
    particle_heat: 10.0,
    max_fuel: 300.0,
    fuel_tank_size: 50.0,
    flow_rate: 6.0,
    reload_time: 3.0,
    flame_reach: 10.0,
    sticky_flames_damage_per_tick: 15.0,
    sticky_flames_heat_per_tick: 5.0,
    // one tick every 0.25 to 0.75 seconds
    sticky_flames_ticks_per_sec: 2.0,
    sticky_flames_duration: 2.0,
    sticky_flames_slow: 0.1,
    movespeed_while_firing: 1.0,
};

static TIER_1: [ModifierOption; 2] = [
    ModifierOption::new(1, 0, "High Capacity Tanks", "+25 Tank Size", "magazine_size", CostVector::new(1200, [0, 0, 0, 0, 25, 0])),
    ModifierOption::new(1, 1, "High Pressure Ejector", "+5m Flame Reach", "distance", CostVector::new(1200, [0, 25, 0, 0, 0, 0])),
];
static TIER_2: [ModifierOption; 3] = [
    ModifierOption::new(2, 0, "Unfiltered Fuel", "+5 Damage per Particle", "direct_damage", CostVector::new(2000, [0, 0, 0, 24, 15, 0])),
    ModifierOption::new(2, 1, "Triple Filtered Fuel", "+10 Heat per Particle", "heat_damage", CostVector::new(2000, [0, 0, 0, 0, 15, 24])),
    ModifierOption::new(2, 2, "Sticky Flame Duration", "+3 sec Sticky Flames duration", "hourglass", CostVector::new(2000, [24, 15, 0, 0, 0, 0])),
];
static TIER_3: [ModifierOption; 3] = [
    ModifierOption::new(3, 0, "Oversized Valves", "+1.8 Flow Rate", "rate_of_fire", CostVector::new(2800, [0, 35, 50, 0, 0, 0])),
    ModifierOption::new(3, 1, "Sticky Flame Slowdown", "Increases Sticky Flames' slow from 10% to 55%", "slowdown", CostVector::new(2800, [0, 0, 35, 0, 0, 50])),
    ModifierOption::new(3, 2, "More Fuel", "+75 Max Fuel", "carried_ammo", CostVector::new(2800, [0, 0, 50, 35, 0, 0])),
];
static TIER_4: [ModifierOption; 3] = [
    ModifierOption::new(4, 0, "It Burns!", "Every ammo consumed deals 0.13 Fear Factor to all enemies hit by that particle", "fear", CostVector::new(4800, [50, 48, 72, 0, 0, 0])),
    ModifierOption::new(4, 1, "Sticky Flame Duration", "+3 sec Sticky Flames duration", "hourglass", CostVector::new(4800, [50, 0, 48, 0, 72, 0])),
    ModifierOption::new(4, 2, "More Fuel", "+75 Max Fuel", "carried_ammo", CostVector::new(4800, [0, 72, 0, 48, 50, 0])),
];
static TIER_5: [ModifierOption; 2] = [
    ModifierOption::new(5, 0, "Heat Radiance", "After every full second of firing, deal 80 Fire Area Damage and 80 Heat in a 3m radius around you", "heat_damage", CostVector::new(5600, [64, 70, 0, 140, 0, 0])),
    ModifierOption::new(5, 1, "Targets Explode", "If the direct stream kills an enemy, there's a 50% chance that they will explode and deal 55 Fire Damage and 55 Heat to all enemies within a 3m radius", "added_explosion", CostVector::new(5600, [0, 0, 0, 64, 70, 140])),
];
static OVERCLOCKS: [OverclockOption; 6] = [
    OverclockOption::new(0, Classification::Clean, "Lighter Tanks", "+75 Max Fuel", "carried_ammo", CostVector::new(7500, [0, 125, 90, 75, 0, 0])),
    OverclockOption::new(1, Classification::Clean, "Sticky Additive", "+1 Damage per Particle, +1 sec Sticky Flame duration", "hourglass", CostVector::new(8250, [100, 80, 0, 0, 0, 130])),
    OverclockOption::new(2, Classification::Balanced, "Compact Feed Valves", "+25 Fuel Tank Size, -2m Flame Reach", "magazine_size", CostVector::new(7450, [0, 70, 130, 0, 0, 90])),
    OverclockOption::new(3, Classification::Balanced, "Fuel Stream Diffuser", "+5m Flame Reach, -1.2 Flow Rate", "distance", CostVector::new(7100, [0, 100, 0, 0, 80, 125])),
    OverclockOption::new(4, Classification::Unstable, "Face Melter", "+2 Damage per Particle, +1.8 Flow Rate, -75 Max Fuel, x0.5 Movement Speed while using", "direct_damage", CostVector::new(7000, [90, 0, 0, 130, 70, 0])),
    OverclockOption::new(5, Classification::Unstable, "Sticky Fuel", "+5 Sticky Flames damage, +6 sec Sticky Flames duration, -25 Tank Size, -75 Max Fuel", "hourglass", CostVector::new(8800, [75, 0, 0, 0, 110, 140])),
];

pub static CATALOG: Catalog = Catalog {
    tiers: [&TIER_1, &TIER_2, &TIER_3, &TIER_4, &TIER_5],
    overclocks: &OVERCLOCKS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    ParticleDamage,
    ParticleHeat,
    FlameReach,
    FuelTankSize,
    MaxFuel,
    FlowRate,
    MovespeedWhileFiring,
    StickyFlamesDamage,
    StickyFlamesDuration,
    StickyFlamesSlow,
    Fear,
    HeatRadiance,
    TargetsExplode,
}

static RULES: [Rule<Stat>; 25] = [
    Rule::add(Stat::ParticleDamage, UNFILTERED_FUEL, 5.0),
    Rule::add(Stat::ParticleDamage, STICKY_ADDITIVE, 1.0),
    Rule::add(Stat::ParticleDamage, FACE_MELTER, 2.0),
    Rule::add(Stat::ParticleHeat, TRIPLE_FILTERED_FUEL, 10.0),
    Rule::add(Stat::MaxFuel, MORE_FUEL_T3, 75.0),
    Rule::add(Stat::MaxFuel, MORE_FUEL_T4, 75.0),
    Rule::add(Stat::MaxFuel, LIGHTER_TANKS, 75.0),
    Rule::add(Stat::MaxFuel, FACE_MELTER, -75.0),
    Rule::add(Stat::MaxFuel, STICKY_FUEL, -75.0),
    Rule::add(Stat::FuelTankSize, HIGH_CAPACITY_TANKS, 25.0),
    Rule::add(Stat::FuelTankSize, COMPACT_FEED_VALVES, 25.0),
    Rule::add(Stat::FuelTankSize, STICKY_FUEL, -25.0),
    Rule::add(Stat::FlowRate, OVERSIZED_VALVES, 1.8),
    Rule::add(Stat::FlowRate, FUEL_STREAM_DIFFUSER, -1.2),
    Rule::add(Stat::FlowRate, FACE_MELTER, 1.8),
    Rule::add(Stat::FlameReach, HIGH_PRESSURE_EJECTOR, 5.0),
    Rule::add(Stat::FlameReach, COMPACT_FEED_VALVES, -2.0),
    Rule::add(Stat::FlameReach, FUEL_STREAM_DIFFUSER, 5.0),
    Rule::add(Stat::StickyFlamesDamage, STICKY_FUEL, 5.0),
    Rule::add(Stat::StickyFlamesDuration, STICKY_DURATION_T2, 3.0),
    Rule::add(Stat::StickyFlamesDuration, STICKY_DURATION_T4, 3.0),
    Rule::add(Stat::StickyFlamesDuration, STICKY_ADDITIVE, 1.0),
    Rule::add(Stat::StickyFlamesDuration, STICKY_FUEL, 6.0),
    // x0.5 on the x0.9 movement factor is a 55% slow
    Rule::add(Stat::StickyFlamesSlow, STICKY_SLOWDOWN, 0.45),
    Rule::scale(Stat::MovespeedWhileFiring, FACE_MELTER, 0.5),
];

static MARKERS: [Marker<Stat>; 3] = [
    Marker::new(Stat::Fear, IT_BURNS),
    Marker::new(Stat::HeatRadiance, HEAT_RADIANCE),
    Marker::new(Stat::TargetsExplode, TARGETS_EXPLODE),
];

static TABLE: StatTable<'static, Stat> = StatTable::new(&RULES, &[], &MARKERS);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Derived {
    pub particle_damage: f64,
    pub particle_heat: f64,
    pub flame_reach: f64,
    pub fuel_tank_size: f64,
    pub max_fuel: f64,
    pub flow_rate: f64,
    pub reload_time: f64,
    pub movespeed_while_firing: f64,
    pub sticky_flames_damage_per_tick: f64,
    pub sticky_flames_heat_per_tick: f64,
    pub sticky_flames_ticks_per_sec: f64,
    pub sticky_flames_duration: f64,
    pub sticky_flames_slow: f64,
    pub it_burns: bool,
    pub heat_radiance: bool,
    pub targets_explode: bool,
}

impl Derived {
    fn sticky_flames_dps(&self) -> f64 {
        self.sticky_flames_damage_per_tick * self.sticky_flames_ticks_per_sec / 2.0
    }

    fn sticky_flames_heat_per_sec(&self) -> f64 {
        self.sticky_flames_heat_per_tick * self.sticky_flames_ticks_per_sec / 2.0
    }

    fn time_to_empty_tank(&self) -> f64 {
        self.fuel_tank_size / self.flow_rate
    }

    /// Radiance damage and heat per tick, weaker the further the stream reaches past its 3m ring.
    fn heat_radiance_per_tick(&self) -> f64 {
        if self.heat_radiance {
            HEAT_RADIANCE_HEAT * HEAT_RADIANCE_RADIUS / self.flame_reach
        } else {
            0.0
        }
    }

    /// Radiance only procs after each full second of firing.
    fn heat_radiance_ticks_per_tank(&self) -> f64 {
        if self.heat_radiance {
            self.time_to_empty_tank().floor()
        } else {
            0.0
        }
    }
}

pub fn derive(selection: &BuildSelection) -> Derived {
    let resolve = |stat, base| TABLE.resolve(stat, base, selection);
    Derived {
        particle_damage: resolve(Stat::ParticleDamage, BASELINE.particle_damage),
        particle_heat: resolve(Stat::ParticleHeat, BASELINE.particle_heat),
        flame_reach: resolve(Stat::FlameReach, BASELINE.flame_reach),
        fuel_tank_size: resolve(Stat::FuelTankSize, BASELINE.fuel_tank_size),
        max_fuel: resolve(Stat::MaxFuel, BASELINE.max_fuel),
        flow_rate: resolve(Stat::FlowRate, BASELINE.flow_rate),
        reload_time: BASELINE.reload_time,
        movespeed_while_firing: resolve(
            Stat::MovespeedWhileFiring,
            BASELINE.movespeed_while_firing,
        ),
        sticky_flames_damage_per_tick: resolve(
            Stat::StickyFlamesDamage,
            BASELINE.sticky_flames_damage_per_tick,
        ),
        sticky_flames_heat_per_tick: BASELINE.sticky_flames_heat_per_tick,
        sticky_flames_ticks_per_sec: BASELINE.sticky_flames_ticks_per_sec,
        sticky_flames_duration: resolve(
            Stat::StickyFlamesDuration,
            BASELINE.sticky_flames_duration,
        ),
        sticky_flames_slow: resolve(Stat::StickyFlamesSlow, BASELINE.sticky_flames_slow),
        it_burns: IT_BURNS.is_selected(selection),
        heat_radiance: HEAT_RADIANCE.is_selected(selection),
        targets_explode: TARGETS_EXPLODE.is_selected(selection),
    }
}

struct Model<'a> {
    stats: Derived,
    context: StatusEffectContext,
    env: &'a Environment,
    explosion: Option<AoeEfficiency>,
}

impl<'a> Model<'a> {
    fn new(selection: &BuildSelection, context: &StatusEffectContext, env: &'a Environment) -> Self {
        let stats = derive(selection);
        // 3m radius, full damage within 0.5m, 25% at the edge
        let explosion = stats
            .targets_explode
            .then(|| AoeEfficiency::new(3.0, 0.5, 0.25, env.population.as_ref()));
        Self {
            stats,
            context: *context,
            env,
            explosion,
        }
    }

    fn ignition_time(&self) -> f64 {
        self.env.population.average_time_to_ignite(
            self.stats.particle_heat,
            self.stats.flow_rate,
            self.stats.sticky_flames_heat_per_sec() + self.stats.heat_radiance_per_tick(),
        )
    }

    fn dps(&self, burst: bool, primary_target: bool) -> f64 {
        let constants = &self.env.constants;
        let stats = &self.stats;
        let tank_time = stats.time_to_empty_tank();

        let (duration, mut burn_dps) = if burst {
            (
                tank_time,
                dot::uptime_dot_dps(self.ignition_time(), tank_time, constants.burn_dps),
            )
        } else {
            (tank_time + stats.reload_time, constants.burn_dps)
        };

        let mut direct = stats.particle_damage;
        let mut temperature_shock = 0.0;
        if primary_target {
            if self.context.frozen {
                burn_dps = 0.0;
                temperature_shock = TEMPERATURE_SHOCK_DAMAGE;
            }
            direct *= self.context.area_multiplier(constants);
        }

        let radiance_per_tank = stats.heat_radiance_per_tick() * stats.heat_radiance_ticks_per_tank();
        (direct * stats.fuel_tank_size + radiance_per_tank + temperature_shock) / duration
            + stats.sticky_flames_dps()
            + burn_dps
    }

    fn time_to_kill(&self) -> f64 {
        time_to_kill(self.env.population.as_ref(), self.dps(false, true))
    }

    fn additional_target_dps(&self) -> f64 {
        let explosion_dps = match &self.explosion {
            Some(explosion) => {
                EXPLOSION_CHANCE * EXPLOSION_DAMAGE * explosion.average_damage / self.time_to_kill()
            }
            None => 0.0,
        };
        self.dps(false, false) + explosion_dps
    }

    fn max_num_targets(&self) -> u32 {
        self.env.population.targets_in_stream(self.stats.flame_reach)
    }

    fn magazines(&self) -> f64 {
        ammo::num_magazines(self.stats.max_fuel, self.stats.fuel_tank_size)
    }

    fn firing_duration(&self) -> f64 {
        ammo::firing_duration(
            self.stats.max_fuel,
            self.stats.fuel_tank_size,
            self.stats.time_to_empty_tank(),
            self.stats.reload_time,
        )
    }

    fn max_multi_target_damage(&self) -> f64 {
        let constants = &self.env.constants;
        let population = self.env.population.as_ref();
        let stats = &self.stats;
        let targets = f64::from(self.max_num_targets());
        let ttk = self.time_to_kill();
        let killed = targets * (self.firing_duration() / ttk);

        let direct_total =
            targets * stats.particle_damage * (stats.fuel_tank_size + stats.max_fuel);

        let sticky_total = dot::average_dot_damage_per_enemy(
            0.0,
            stats.sticky_flames_duration,
            stats.sticky_flames_dps(),
            ttk,
        ) * killed;

        let radiance_total = if stats.heat_radiance {
            // enemies kited at 1.5m stay inside the 3m ring
            let ticks = self.magazines() * stats.heat_radiance_ticks_per_tank();
            let hit = population
                .targets_in_radius(HEAT_RADIANCE_RADIUS)
                .saturating_sub(population.targets_in_radius(KITING_RADIUS));
            HEAT_RADIANCE_HEAT * ticks * f64::from(hit)
        } else {
            0.0
        };

        let explosion_total = match &self.explosion {
            Some(explosion) => {
                let per_explosion = EXPLOSION_DAMAGE * explosion.weighted_targets();
                // burn and sticky flames take a share of the killing blows
                let explosions = EXPLOSION_CHANCE
                    * (0.5 * targets)
                    * (self.magazines() * stats.time_to_empty_tank() / ttk);
                per_explosion * explosions
            }
            None => 0.0,
        };

        let burn_total = dot::average_dot_damage_per_enemy(
            self.ignition_time(),
            constants.burn_duration,
            constants.burn_dps,
            ttk,
        ) * killed;

        direct_total + sticky_total + radiance_total + explosion_total + burn_total
    }

    fn utility(&self) -> UtilityBreakdown {
        let constants = &self.env.constants;
        let weights = &constants.utility;
        let population = self.env.population.as_ref();
        let stats = &self.stats;
        let targets = f64::from(self.max_num_targets());

        let mut breakdown = UtilityBreakdown {
            mobility: (round_to(stats.movespeed_while_firing * constants.walk_speed, 2)
                - constants.walk_speed)
                * weights.movespeed,
            // roughly half of the stream's targets also stand in sticky flames
            slow: (targets * 0.5).round()
                * stats.sticky_flames_duration
                * stats.sticky_flames_slow
                * weights.slow,
            ..UtilityBreakdown::default()
        };
        if stats.it_burns {
            breakdown.fear = population.fear_proc_probability(FEAR_FACTOR_PER_PARTICLE)
                * targets
                * population
                    .average_fear_duration(stats.sticky_flames_slow, stats.sticky_flames_duration)
                * weights.fear;
        }
        breakdown
    }

    fn damage_per_magazine(&self) -> f64 {
        let constants = &self.env.constants;
        let population = self.env.population.as_ref();
        let targets = f64::from(self.max_num_targets());
        let ignition = population.average_time_to_ignite(
            self.stats.particle_heat,
            self.stats.flow_rate,
            0.0,
        );
        let burn_per_enemy = dot::average_dot_damage_per_enemy(
            ignition,
            constants.burn_duration,
            constants.burn_dps,
            self.time_to_kill(),
        );
        targets * self.stats.particle_damage * self.stats.fuel_tank_size + burn_per_enemy * targets
    }

    fn report(&self) -> MetricsReport {
        let sustained = self.dps(false, true);
        let utility_breakdown = self.utility();
        MetricsReport {
            ideal_burst_dps: self.dps(true, true),
            ideal_sustained_dps: sustained,
            sustained_weakpoint_dps: sustained,
            sustained_weakpoint_accuracy_dps: sustained,
            additional_target_dps: self.additional_target_dps(),
            max_multi_target_damage: self.max_multi_target_damage(),
            max_num_targets: self.max_num_targets(),
            firing_duration: self.firing_duration(),
            average_time_to_kill: time_to_kill(self.env.population.as_ref(), sustained),
            average_damage_to_kill: damage_to_kill(
                self.env.population.as_ref(),
                self.stats.particle_damage,
            ),
            breakpoints: Vec::new(),
            breakpoint_sum: 0,
            utility: utility_breakdown.total(),
            utility_breakdown,
            damage_per_magazine: self.damage_per_magazine(),
            time_to_fire_magazine: self.stats.time_to_empty_tank(),
            general_accuracy: -1.0,
            weakpoint_accuracy: -1.0,
            time_to_ignite: Some(self.ignition_time()),
            damage_wasted_by_armor: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Flamethrower;

impl Weapon for Flamethrower {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Flamethrower
    }

    fn full_name(&self) -> &'static str {
        "CRSPR Flamethrower"
    }

    fn class_name(&self) -> &'static str {
        "Driller"
    }

    fn catalog(&self) -> &'static Catalog {
        &CATALOG
    }

    fn derived(&self, selection: &BuildSelection) -> DerivedStats {
        DerivedStats::Flamethrower(derive(selection))
    }

    fn stats(&self, selection: &BuildSelection, env: &Environment) -> Vec<StatsRow> {
        let stats = derive(selection);
        let modified = |stat| TABLE.is_modified(stat, selection);
        let it_burns = modified(Stat::Fear);
        let slowed = modified(Stat::MovespeedWhileFiring);

        vec![
            StatsRow::number("Damage per Particle:", stats.particle_damage, "direct_damage", modified(Stat::ParticleDamage)),
            StatsRow::number("Heat per Particle:", stats.particle_heat, "heat_damage", modified(Stat::ParticleHeat)),
            StatsRow::number("Flame Reach:", stats.flame_reach, "distance", modified(Stat::FlameReach)),
            StatsRow::number("Fuel Tank Size:", stats.fuel_tank_size, "magazine_size", modified(Stat::FuelTankSize)),
            StatsRow::number("Max Fuel:", stats.max_fuel, "carried_ammo", modified(Stat::MaxFuel)),
            StatsRow::number("Flow Rate:", stats.flow_rate, "rate_of_fire", modified(Stat::FlowRate)),
            StatsRow::number("Reload Time:", stats.reload_time, "reload_speed", false),
            StatsRow::number("Fear Factor per Particle:", FEAR_FACTOR_PER_PARTICLE, "fear", it_burns).optional(),
            StatsRow::number(
                "Movement Speed While Using: (m/sec)",
                round_to(stats.movespeed_while_firing * env.constants.walk_speed, 2),
                "movespeed",
                slowed,
            )
            .optional(),
            StatsRow::number("Burn DoT DPS:", env.constants.burn_dps, "heat_damage", false),
            StatsRow::number("Sticky Flames Dmg per Tick:", stats.sticky_flames_damage_per_tick, "direct_damage", modified(Stat::StickyFlamesDamage)),
            StatsRow::number("Sticky Flames Heat per Tick:", stats.sticky_flames_heat_per_tick, "heat_damage", false),
            StatsRow::number("Sticky Flames Avg Ticks/Sec:", stats.sticky_flames_ticks_per_sec, "blank", false),
            StatsRow::number("Sticky Flames Duration:", stats.sticky_flames_duration, "hourglass", modified(Stat::StickyFlamesDuration)),
            StatsRow::percent("Sticky Flames Slow:", stats.sticky_flames_slow, "slowdown", modified(Stat::StickyFlamesSlow)),
        ]
    }

    fn metrics(
        &self,
        selection: &BuildSelection,
        context: &StatusEffectContext,
        env: &Environment,
    ) -> MetricsReport {
        Model::new(selection, context, env).report()
    }

    fn deals_splash_damage(&self, selection: &BuildSelection) -> bool {
        TARGETS_EXPLODE.is_selected(selection)
    }

    fn effects_json(&self, selector: Selector) -> serde_json::Result<String> {
        serde_json::to_string(&TABLE.effects_of(selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::decode;

    fn selection(text: &str) -> BuildSelection {
        decode(&CATALOG, text).expect("valid flamethrower build")
    }

    #[test]
    fn sticky_fuel_trades_fuel_for_sticky_flames() {
        let stats = derive(&selection("-----6"));
        assert_eq!(stats.fuel_tank_size, 25.0);
        assert_eq!(stats.max_fuel, 225.0);
        assert_eq!(stats.sticky_flames_damage_per_tick, 20.0);
        assert_eq!(stats.sticky_flames_duration, 8.0);
    }

    #[test]
    fn sticky_flame_duration_stacks_across_tiers() {
        let stats = derive(&selection("-CBB-2"));
        assert_eq!(stats.sticky_flames_duration, 2.0 + 3.0 + 3.0 + 1.0);
        assert!((stats.sticky_flames_slow - 0.55).abs() < 1e-12);
    }

    #[test]
    fn sustained_dps_includes_reload_and_burn() {
        let env = Environment::default();
        let model = Model::new(&BuildSelection::baseline(), &StatusEffectContext::default(), &env);
        let duration = 50.0 / 6.0 + 3.0;
        let expected = 10.0 * 50.0 / duration + 15.0 + env.constants.burn_dps;
        assert!((model.dps(false, true) - expected).abs() < 1e-9);
    }

    #[test]
    fn frozen_targets_take_temperature_shock_instead_of_burn() {
        let env = Environment::default();
        let frozen = StatusEffectContext {
            frozen: true,
            ..StatusEffectContext::default()
        };
        let model = Model::new(&BuildSelection::baseline(), &frozen, &env);
        let duration = 50.0 / 6.0 + 3.0;
        let expected = (10.0 * 50.0 + 200.0) / duration + 15.0;
        assert!((model.dps(false, true) - expected).abs() < 1e-9);
        // other targets in the stream are unaffected
        assert!(model.dps(false, false) > 10.0 * 50.0 / duration + 15.0);
    }

    #[test]
    fn stream_has_no_accuracy_or_breakpoints() {
        let env = Environment::default();
        let report = FLAMETHROWER.metrics(
            &BuildSelection::baseline(),
            &StatusEffectContext::default(),
            &env,
        );
        assert_eq!(report.general_accuracy, -1.0);
        assert!(report.breakpoints.is_empty());
        assert_eq!(report.damage_wasted_by_armor, 0.0);
        assert!(report.max_num_targets >= 1);
        assert!(report.time_to_ignite.is_some());
    }

    #[test]
    fn only_targets_explode_deals_splash() {
        assert!(FLAMETHROWER.deals_splash_damage(&selection("----B-")));
        assert!(!FLAMETHROWER.deals_splash_damage(&selection("----A-")));
    }

    #[test]
    fn face_melter_slows_the_wielder() {
        let env = Environment::default();
        let report = FLAMETHROWER.metrics(&selection("-----5"), &StatusEffectContext::default(), &env);
        assert!(report.utility_breakdown.mobility < 0.0);
        let rows = FLAMETHROWER.stats(&selection("-----5"), &env);
        assert_eq!(rows.len(), 15);
        assert!(rows[8].is_visible());
    }
}
