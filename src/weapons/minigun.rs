//! "Lead Storm" Powered Minigun: fires in bursts limited by its heat meter instead of a magazine.

use serde::Serialize;

use crate::build::BuildSelection;
use crate::catalog::{Catalog, Classification, CostVector, ModifierOption, OverclockOption};
use crate::metrics::{
    damage_to_kill, dot, heat, rampup, round_to, time_to_kill, weakpoint_damage, AoeEfficiency,
    HitSplit, KillHeatFeedback, MetricsReport, UtilityBreakdown,
};
use crate::model::{BreakpointInput, CircularSpread, Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::resolve::{Marker, Rule, Selector, StatTable};

use super::{DerivedStats, Weapon, WeaponKind};

pub static MINIGUN: Minigun = Minigun;

const MAGNETIC_REFRIGERATION: Selector = Selector::tier(1, 0);
const IMPROVED_MOTOR: Selector = Selector::tier(1, 1);
const PLATFORM_STABILITY: Selector = Selector::tier(1, 2);
const OVERSIZED_DRUM: Selector = Selector::tier(2, 0);
const HIGH_VELOCITY_ROUNDS: Selector = Selector::tier(2, 1);
const HARDENED_ROUNDS: Selector = Selector::tier(3, 0);
const STUN_DURATION: Selector = Selector::tier(3, 1);
const BLOWTHROUGH_ROUNDS: Selector = Selector::tier(3, 2);
const VARIABLE_CHAMBER_PRESSURE: Selector = Selector::tier(4, 0);
const LIGHTER_BARREL: Selector = Selector::tier(4, 1);
const MAGNETIC_BEARINGS: Selector = Selector::tier(4, 2);
const AGGRESSIVE_VENTING: Selector = Selector::tier(5, 0);
const COLD_AS_THE_GRAVE: Selector = Selector::tier(5, 1);
const HOT_BULLETS: Selector = Selector::tier(5, 2);

const MORE_OOMPH: Selector = Selector::overclock(0);
const THINNED_DRUM_WALLS: Selector = Selector::overclock(1);
const BURNING_HELL: Selector = Selector::overclock(2);
const COMPACT_FEED: Selector = Selector::overclock(3);
const EXHAUST_VECTORING: Selector = Selector::overclock(4);
const BULLET_HELL: Selector = Selector::overclock(5);
const LEAD_STORM: Selector = Selector::overclock(6);

/// Each pellet consumes two rounds of ammo.
const AMMO_PER_PELLET: f64 = 2.0;
const HOT_BULLETS_HEAT_SHARE: f64 = 0.5;
const VARIABLE_CHAMBER_PRESSURE_BONUS: f64 = 1.15;
const HEAT_REMOVED_PER_KILL: f64 = 0.8;
const BURNING_HELL_HEAT_PER_SEC: f64 = 80.0;
const BURNING_HELL_AREA_DPS: f64 = 20.0;
const BURNING_HELL_TARGETS: f64 = 4.0;
const BULLET_HELL_RICOCHET_CHANCE: f64 = 0.5;
const AGGRESSIVE_VENTING_HEAT: f64 = 60.0;
const AGGRESSIVE_VENTING_FEAR: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    damage_per_pellet: f64,
    stun_chance: f64,
    stun_duration: f64,
    max_ammo: f64,
    max_heat: f64,
    heat_per_second: f64,
    cooling_rate: f64,
    rate_of_fire: f64,
    spinup_time: f64,
    spindown_time: f64,
    movespeed_while_firing: f64,
    /// Heat meter reading at which Hot Bullets activates, in seconds of fire at base heat gain.
    seconds_before_hot_bullets: f64,
    cooldown_after_overheat: f64,
    base_spread: f64,
    armor_breaking: f64,
}

const BASELINE: Baseline = Baseline {
    damage_per_pellet: 10.0,
    stun_chance: 0.3,
    stun_duration: 1.0,
    max_ammo: 2400.0,
    max_heat: 9.5,
    heat_per_second: 1.0,
    cooling_rate: 1.5,
    rate_of_fire: 30.0,
    spinup_time: 0.7,
    spindown_time: 3.0,
    movespeed_while_firing: 0.5,
    seconds_before_hot_bullets: 3.17805,
    cooldown_after_overheat: 10.0,
    base_spread: 1.0,
    armor_breaking: 1.0,
};

static TIER_1: [ModifierOption; 3] = [
    ModifierOption::new(1, 0, "Magnetic Refrigeration", "+1.5 Cooling Rate", "cooling_rate", CostVector::new(1200, [0, 0, 0, 25, 0, 0])),
    ModifierOption::new(1, 1, "Improved Motor", "+4 Rate of Fire", "rate_of_fire", CostVector::new(1200, [0, 0, 0, 0, 25, 0])),
    ModifierOption::new(1, 2, "Improved Platform Stability", "x0.2 Base Spread", "base_spread", CostVector::new(1200, [0, 25, 0, 0, 0, 0])),
];
static TIER_2: [ModifierOption; 2] = [
    ModifierOption::new(2, 0, "Oversized Drum", "+600 Max Ammo", "carried_ammo", CostVector::new(2000, [0, 15, 0, 0, 24, 0])),
    ModifierOption::new(2, 1, "High Velocity Rounds", "+2 Damage per Pellet", "direct_damage", CostVector::new(2000, [0, 0, 0, 24, 0, 15])),
];
static TIER_3: [ModifierOption; 3] = [
    ModifierOption::new(3, 0, "Hardened Rounds", "+200% Armor Breaking", "armor_breaking", CostVector::new(2800, [0, 0, 0, 35, 0, 50])),
    ModifierOption::new(3, 1, "Stun Duration", "+1 second Stun duration", "stun", CostVector::new(2800, [35, 0, 50, 0, 0, 0])),
    ModifierOption::new(3, 2, "Blowthrough Rounds", "+1 Penetration", "blowthrough", CostVector::new(2800, [50, 0, 0, 0, 35, 0])),
];
static TIER_4: [ModifierOption; 3] = [
    ModifierOption::new(4, 0, "Variable Chamber Pressure", "+15% Damage per Pellet after reaching Base Spread", "direct_damage", CostVector::new(4800, [0, 0, 0, 72, 50, 48])),
    ModifierOption::new(4, 1, "Lighter Barrel Assembly", "-0.4 seconds spinup time", "charge_speed", CostVector::new(4800, [72, 48, 50, 0, 0, 0])),
    ModifierOption::new(4, 2, "Magnetic Bearings", "+3 seconds spindown time", "special", CostVector::new(4800, [48, 50, 0, 72, 0, 0])),
];
static TIER_5: [ModifierOption; 3] = [
    ModifierOption::new(5, 0, "Aggressive Venting", "After overheating, deal 60 Heat Damage and 10 Fear to all enemies within a 10m radius", "added_explosion", CostVector::new(5600, [0, 140, 0, 64, 70, 0])),
    ModifierOption::new(5, 1, "Cold As The Grave", "Every kill subtracts 0.8 Heat from the Heat Meter, extending the firing period", "cooling_rate", CostVector::new(5600, [64, 0, 0, 0, 70, 140])),
    ModifierOption::new(5, 2, "Hot Bullets", "After the Heat Meter turns red, 50% of the Damage per Pellet is added as Heat which can ignite enemies", "heat_damage", CostVector::new(5600, [70, 0, 64, 0, 0, 140])),
];
static OVERCLOCKS: [OverclockOption; 7] = [
    OverclockOption::new(0, Classification::Clean, "A Little More Oomph!", "+1 Damage per Pellet, -0.2 spinup time", "direct_damage", CostVector::new(8700, [95, 120, 75, 0, 0, 0])),
    OverclockOption::new(1, Classification::Clean, "Thinned Drum Walls", "+300 Max Ammo, +0.5 Cooling Rate", "cooling_rate", CostVector::new(7650, [0, 0, 0, 75, 125, 95])),
    OverclockOption::new(2, Classification::Balanced, "Burning Hell", "Deals 20 Area Damage and 80 Heat per second in a cone in front of the muzzle. +50% heat accumulation", "heat_damage", CostVector::new(8700, [140, 0, 65, 110, 0, 0])),
    OverclockOption::new(3, Classification::Balanced, "Compact Feed Mechanism", "+800 Max Ammo, -4 Rate of Fire", "carried_ammo", CostVector::new(7450, [130, 70, 0, 95, 0, 0])),
    OverclockOption::new(4, Classification::Balanced, "Exhaust Vectoring", "+2 Damage per Pellet, x2.5 Base Spread", "direct_damage", CostVector::new(7400, [65, 140, 0, 95, 0, 0])),
    OverclockOption::new(5, Classification::Unstable, "Bullet Hell", "50% chance for bullets to ricochet into another enemy. -3 Damage per Pellet, x6 Base Spread", "ricochet", CostVector::new(7600, [140, 0, 75, 0, 105, 0])),
    OverclockOption::new(6, Classification::Unstable, "Lead Storm", "+4 Damage per Pellet, x0 Movespeed while using, cannot stun enemies", "direct_damage", CostVector::new(8800, [65, 0, 0, 0, 130, 100])),
];

pub static CATALOG: Catalog = Catalog {
    tiers: [&TIER_1, &TIER_2, &TIER_3, &TIER_4, &TIER_5],
    overclocks: &OVERCLOCKS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    DamagePerPellet,
    StunChance,
    StunDuration,
    MaxAmmo,
    HeatPerSecond,
    CoolingRate,
    RateOfFire,
    SpinupTime,
    SpindownTime,
    MovespeedWhileFiring,
    BaseSpread,
    ArmorBreaking,
    Penetrations,
    Ricochets,
    FiringPeriod,
    Ignition,
    Fear,
}

static RULES: [Rule<Stat>; 26] = [
    Rule::add(Stat::DamagePerPellet, HIGH_VELOCITY_ROUNDS, 2.0),
    Rule::add(Stat::DamagePerPellet, MORE_OOMPH, 1.0),
    Rule::add(Stat::DamagePerPellet, EXHAUST_VECTORING, 2.0),
    Rule::add(Stat::DamagePerPellet, BULLET_HELL, -3.0),
    Rule::add(Stat::DamagePerPellet, LEAD_STORM, 4.0),
    Rule::scale(Stat::StunChance, LEAD_STORM, 0.0),
    Rule::add(Stat::StunDuration, STUN_DURATION, 1.0),
    Rule::scale(Stat::StunDuration, LEAD_STORM, 0.0),
    Rule::add(Stat::MaxAmmo, OVERSIZED_DRUM, 600.0),
    Rule::add(Stat::MaxAmmo, THINNED_DRUM_WALLS, 300.0),
    Rule::add(Stat::MaxAmmo, COMPACT_FEED, 800.0),
    Rule::add(Stat::HeatPerSecond, BURNING_HELL, 0.5),
    Rule::add(Stat::CoolingRate, MAGNETIC_REFRIGERATION, 1.5),
    Rule::add(Stat::CoolingRate, THINNED_DRUM_WALLS, 0.5),
    Rule::add(Stat::RateOfFire, IMPROVED_MOTOR, 4.0),
    Rule::add(Stat::RateOfFire, COMPACT_FEED, -4.0),
    Rule::add(Stat::SpinupTime, LIGHTER_BARREL, -0.4),
    Rule::add(Stat::SpinupTime, MORE_OOMPH, -0.2),
    Rule::add(Stat::SpindownTime, MAGNETIC_BEARINGS, 3.0),
    Rule::scale(Stat::MovespeedWhileFiring, LEAD_STORM, 0.0),
    Rule::scale(Stat::BaseSpread, PLATFORM_STABILITY, 0.2),
    Rule::scale(Stat::BaseSpread, EXHAUST_VECTORING, 2.5),
    Rule::scale(Stat::BaseSpread, BULLET_HELL, 6.0),
    Rule::replace(Stat::ArmorBreaking, HARDENED_ROUNDS, 3.0),
    Rule::add(Stat::Penetrations, BLOWTHROUGH_ROUNDS, 1.0),
    Rule::add(Stat::Ricochets, BULLET_HELL, 1.0),
];

static MARKERS: [Marker<Stat>; 6] = [
    Marker::new(Stat::DamagePerPellet, VARIABLE_CHAMBER_PRESSURE),
    Marker::new(Stat::FiringPeriod, COLD_AS_THE_GRAVE),
    Marker::new(Stat::FiringPeriod, BURNING_HELL),
    Marker::new(Stat::Ignition, HOT_BULLETS),
    Marker::new(Stat::Ignition, BURNING_HELL),
    Marker::new(Stat::Fear, AGGRESSIVE_VENTING),
];

static TABLE: StatTable<'static, Stat> = StatTable::new(&RULES, &[], &MARKERS);

/// Physical stats before the heat model; damage excludes Variable Chamber Pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Derived {
    pub damage_per_pellet: f64,
    pub stun_chance: f64,
    pub stun_duration: f64,
    pub max_ammo: f64,
    pub heat_per_second: f64,
    pub cooling_rate: f64,
    /// Ammo per second; pellets per second is half of this.
    pub rate_of_fire: f64,
    pub spinup_time: f64,
    pub spindown_time: f64,
    pub movespeed_while_firing: f64,
    pub base_spread: f64,
    pub armor_breaking: f64,
    pub penetrations: u32,
    pub ricochets: u32,
    pub pellets_until_stable: f64,
    pub cooldown_period: f64,
    pub variable_chamber_pressure: bool,
    pub aggressive_venting: bool,
    pub cold_as_the_grave: bool,
    pub hot_bullets: bool,
    pub burning_hell: bool,
    pub bullet_hell: bool,
}

pub fn derive(selection: &BuildSelection) -> Derived {
    let resolve = |stat, base| TABLE.resolve(stat, base, selection);
    let rate_of_fire = resolve(Stat::RateOfFire, BASELINE.rate_of_fire);
    let cooling_rate = resolve(Stat::CoolingRate, BASELINE.cooling_rate);
    Derived {
        damage_per_pellet: resolve(Stat::DamagePerPellet, BASELINE.damage_per_pellet),
        stun_chance: resolve(Stat::StunChance, BASELINE.stun_chance),
        stun_duration: resolve(Stat::StunDuration, BASELINE.stun_duration),
        max_ammo: resolve(Stat::MaxAmmo, BASELINE.max_ammo),
        heat_per_second: resolve(Stat::HeatPerSecond, BASELINE.heat_per_second),
        cooling_rate,
        rate_of_fire,
        spinup_time: resolve(Stat::SpinupTime, BASELINE.spinup_time),
        spindown_time: resolve(Stat::SpindownTime, BASELINE.spindown_time),
        movespeed_while_firing: resolve(
            Stat::MovespeedWhileFiring,
            BASELINE.movespeed_while_firing,
        ),
        base_spread: resolve(Stat::BaseSpread, BASELINE.base_spread),
        armor_breaking: resolve(Stat::ArmorBreaking, BASELINE.armor_breaking),
        penetrations: resolve(Stat::Penetrations, 0.0) as u32,
        ricochets: resolve(Stat::Ricochets, 0.0) as u32,
        pellets_until_stable: pellets_until_stable(rate_of_fire),
        cooldown_period: heat::cooldown_period(BASELINE.max_heat, cooling_rate),
        variable_chamber_pressure: VARIABLE_CHAMBER_PRESSURE.is_selected(selection),
        aggressive_venting: AGGRESSIVE_VENTING.is_selected(selection),
        cold_as_the_grave: COLD_AS_THE_GRAVE.is_selected(selection),
        hot_bullets: HOT_BULLETS.is_selected(selection),
        burning_hell: BURNING_HELL.is_selected(selection),
        bullet_hell: BULLET_HELL.is_selected(selection),
    }
}

/// Pellets fired before bloom settles back to base spread.
fn pellets_until_stable(rate_of_fire: f64) -> f64 {
    let pellets_per_sec = rate_of_fire / AMMO_PER_PELLET;
    let denominator = 0.2 * pellets_per_sec - 1.0;
    if denominator <= 0.0 {
        return f64::INFINITY;
    }
    (pellets_per_sec * 3.0 / denominator).floor()
}

struct Model<'a> {
    stats: Derived,
    context: StatusEffectContext,
    env: &'a Environment,
    firing_period: f64,
    pellets_per_burst: f64,
    damage_per_pellet: f64,
}

impl<'a> Model<'a> {
    fn new(selection: &BuildSelection, context: &StatusEffectContext, env: &'a Environment) -> Self {
        let stats = derive(selection);
        let firing_period = firing_period(&stats, env);
        let pellets_per_burst = (firing_period * stats.rate_of_fire / AMMO_PER_PELLET).floor();
        let pressure = if stats.variable_chamber_pressure {
            rampup::delayed_bonus_multiplier(
                VARIABLE_CHAMBER_PRESSURE_BONUS,
                stats.pellets_until_stable,
                pellets_per_burst,
            )
        } else {
            1.0
        };
        Self {
            damage_per_pellet: stats.damage_per_pellet * pressure,
            stats,
            context: *context,
            env,
            firing_period,
            pellets_per_burst,
        }
    }

    fn pellets_per_sec(&self) -> f64 {
        self.stats.rate_of_fire / AMMO_PER_PELLET
    }

    fn accuracy(&self, weakpoint: bool) -> f64 {
        let spread = CircularSpread {
            base_spread: 5.0 * self.stats.base_spread,
            spread_per_shot: 0.2,
            recovery_speed: 1.0,
            max_bloom: 3.5,
            rate_of_fire: self.pellets_per_sec(),
            magazine_size: self.pellets_per_burst,
        };
        self.env.accuracy.circular_accuracy(weakpoint, &spread)
    }

    /// Ricochets let misses find a second target.
    fn effective_general_accuracy(&self, accuracy: bool) -> f64 {
        if !accuracy {
            return 1.0;
        }
        let general = self.accuracy(false) / 100.0;
        if self.stats.bullet_hell {
            (general + BULLET_HELL_RICOCHET_CHANCE).min(1.0)
        } else {
            general
        }
    }

    fn applies_heat(&self) -> bool {
        self.stats.hot_bullets || self.stats.burning_hell
    }

    /// Seconds until an average target ignites; `None` when nothing applies heat.
    fn ignition_time(&self, accuracy: bool) -> Option<f64> {
        let population = self.env.population.as_ref();
        let general = self.effective_general_accuracy(accuracy);
        let heat_per_pellet = self.stats.damage_per_pellet * general / 2.0;
        let pellets_per_sec = self.pellets_per_sec();

        match (self.stats.hot_bullets, self.stats.burning_hell) {
            (true, false) => Some(
                BASELINE.seconds_before_hot_bullets
                    + population.average_time_to_ignite(heat_per_pellet, pellets_per_sec, 0.0),
            ),
            (false, true) => Some(population.average_time_to_ignite(
                0.0,
                0.0,
                BURNING_HELL_HEAT_PER_SEC,
            )),
            (true, true) => {
                // Burning Hell fills the meter faster, so Hot Bullets activates sooner too.
                let heat_gain = self.stats.heat_per_second;
                let period = heat::firing_period(BASELINE.max_heat, heat_gain);
                let before = BASELINE.seconds_before_hot_bullets / heat_gain;
                let after = period - before;
                let average_heat = (before * BURNING_HELL_HEAT_PER_SEC
                    + after * (heat_per_pellet * pellets_per_sec + BURNING_HELL_HEAT_PER_SEC))
                    / period;
                Some(population.average_time_to_ignite(0.0, 0.0, average_heat))
            }
            (false, false) => None,
        }
    }

    fn single_target_dps(&self, burst: bool, weakpoint: bool, accuracy: bool, armor: bool) -> f64 {
        let constants = &self.env.constants;
        let general = self.effective_general_accuracy(accuracy);

        let (short_duration, long_duration) = if burst {
            let duration = AMMO_PER_PELLET * self.pellets_per_burst / self.stats.rate_of_fire;
            (duration, duration)
        } else {
            let cooldown = self.stats.cooldown_period;
            let spinup = if cooldown < self.stats.spindown_time {
                (1.0 - cooldown / self.stats.spindown_time) * self.stats.spinup_time
            } else {
                self.stats.spinup_time
            };
            let short = self.firing_period + cooldown;
            (short, short + spinup)
        };

        let mut direct = self.damage_per_pellet;
        if armor && !self.context.frozen {
            direct *= 1.0 - self.damage_wasted_by_armor() / 100.0;
        }
        direct *= self.context.direct_multiplier(constants);

        let (weakpoint_accuracy, weakpoint_direct) = if weakpoint && !self.context.frozen {
            (
                self.accuracy(true) / 100.0,
                weakpoint_damage(self.env.population.as_ref(), direct, 0.0),
            )
        } else {
            (0.0, direct)
        };

        let burn_dps = if self.applies_heat() && !self.context.frozen {
            if burst {
                let ignition = self.ignition_time(accuracy).unwrap_or(f64::INFINITY);
                dot::uptime_dot_dps(ignition, short_duration, constants.burn_dps)
            } else {
                constants.burn_dps
            }
        } else {
            0.0
        };
        let burning_hell_dps = if self.stats.burning_hell {
            BURNING_HELL_AREA_DPS
        } else {
            0.0
        };

        let hits = HitSplit::new(self.pellets_per_burst, general, weakpoint_accuracy);
        hits.damage(weakpoint_direct, direct) / long_duration + burning_hell_dps + burn_dps
    }

    fn ideal_sustained_dps(&self) -> f64 {
        self.single_target_dps(false, false, false, false)
    }

    fn time_to_kill(&self) -> f64 {
        time_to_kill(self.env.population.as_ref(), self.ideal_sustained_dps())
    }

    fn additional_target_dps(&self) -> f64 {
        if self.stats.penetrations > 0 {
            self.ideal_sustained_dps()
        } else if self.stats.burning_hell {
            BURNING_HELL_AREA_DPS + self.env.constants.burn_dps
        } else if self.stats.bullet_hell {
            BULLET_HELL_RICOCHET_CHANCE * self.ideal_sustained_dps()
        } else {
            0.0
        }
    }

    fn max_num_targets(&self) -> u32 {
        1 + self.stats.penetrations + self.stats.ricochets
    }

    fn number_of_bursts(&self) -> f64 {
        if self.pellets_per_burst <= 0.0 {
            return 0.0;
        }
        self.stats.max_ammo / (AMMO_PER_PELLET * self.pellets_per_burst)
    }

    fn aggressive_venting_area(&self) -> AoeEfficiency {
        AoeEfficiency::new(10.0, 6.0, 0.25, self.env.population.as_ref())
    }

    fn max_multi_target_damage(&self) -> f64 {
        let constants = &self.env.constants;
        let population = self.env.population.as_ref();
        let targets = f64::from(self.max_num_targets());
        let bursts = self.number_of_bursts();
        let direct_total = bursts * self.pellets_per_burst * self.damage_per_pellet * targets;

        let heat_gain = self.stats.heat_per_second;
        let default_period = heat::firing_period(BASELINE.max_heat, heat_gain);
        let before_hot_bullets = BASELINE.seconds_before_hot_bullets / heat_gain;
        let after_hot_bullets = default_period - before_hot_bullets;
        let ttk = self.time_to_kill();

        let mut fire_total = 0.0;
        let mut burning_hell_total = 0.0;
        if self.stats.hot_bullets && !self.stats.burning_hell {
            // ignition time includes the wait for the meter to turn red
            let onset = self.ignition_time(false).unwrap_or(f64::INFINITY) - before_hot_bullets;
            let per_enemy = dot::average_dot_damage_per_enemy(
                onset,
                constants.burn_duration,
                constants.burn_dps,
                ttk,
            ) * (after_hot_bullets / default_period);
            let killed = targets * (self.firing_duration() / ttk);
            fire_total += per_enemy * killed;
        } else if self.stats.burning_hell {
            let onset = self.ignition_time(false).unwrap_or(f64::INFINITY);
            let per_enemy = dot::average_dot_damage_per_enemy(
                onset,
                constants.burn_duration,
                constants.burn_dps,
                ttk,
            );
            fire_total += bursts * default_period * per_enemy * BURNING_HELL_TARGETS;
            burning_hell_total =
                bursts * default_period * BURNING_HELL_AREA_DPS * BURNING_HELL_TARGETS;
        }

        if self.stats.aggressive_venting {
            let area = self.aggressive_venting_area();
            let ignited =
                population.percentage_ignited_by_burst(AGGRESSIVE_VENTING_HEAT * area.average_damage);
            let per_enemy = dot::average_dot_damage_per_enemy(
                0.0,
                constants.burn_duration,
                constants.burn_dps,
                ttk,
            );
            fire_total += bursts.floor() * (ignited * f64::from(area.targets)) * per_enemy;
        }

        direct_total + fire_total + burning_hell_total
    }

    fn firing_duration(&self) -> f64 {
        let ammo_per_burst = (AMMO_PER_PELLET * self.pellets_per_burst) as i64;
        if ammo_per_burst <= 0 {
            return 0.0;
        }
        let max_ammo = self.stats.max_ammo as i64;
        let bursts = max_ammo as f64 / ammo_per_burst as f64;
        // no cooldown after the final burst when the ammo divides evenly
        let cooldowns = if max_ammo % ammo_per_burst == 0 {
            (bursts - 1.0).floor()
        } else {
            (max_ammo / ammo_per_burst) as f64
        };
        bursts * self.firing_period + cooldowns * self.stats.cooldown_period
    }

    fn average_damage_to_kill(&self) -> f64 {
        let population = self.env.population.as_ref();
        damage_to_kill(
            population,
            weakpoint_damage(population, self.damage_per_pellet, 0.0),
        )
    }

    fn breakpoints(&self) -> Vec<u32> {
        let pellets_per_sec = self.pellets_per_sec();
        let mut area = 0.0;
        // Hot Bullets counted as active from the first pellet
        let mut heat_per_shot = if self.stats.hot_bullets {
            HOT_BULLETS_HEAT_SHARE * self.damage_per_pellet
        } else {
            0.0
        };
        // Burning Hell's 5 fire damage and 20 heat at 4 ticks/sec, spread over the pellets
        if self.stats.burning_hell && pellets_per_sec > 0.0 {
            area = 5.0 * 4.0 / pellets_per_sec;
            heat_per_shot += 20.0 * 4.0 / pellets_per_sec;
        }
        self.env.population.breakpoints(&BreakpointInput {
            direct: self.damage_per_pellet,
            area,
            dot_damage: 0.0,
            weakpoint_bonus: 0.0,
            armor_breaking: self.stats.armor_breaking,
            heat_per_shot,
            shots_per_sec: pellets_per_sec,
            status: self.context,
        })
    }

    fn utility(&self) -> UtilityBreakdown {
        let constants = &self.env.constants;
        let weights = &constants.utility;
        let population = self.env.population.as_ref();
        let walk = constants.walk_speed;
        let mut breakdown = UtilityBreakdown {
            mobility: (round_to(self.stats.movespeed_while_firing * walk, 2)
                - round_to(BASELINE.movespeed_while_firing * walk, 2))
                * weights.movespeed,
            armor_break: population
                .light_armor_break_probability(self.damage_per_pellet, self.stats.armor_breaking)
                * weights.armor_break,
            ..UtilityBreakdown::default()
        };

        if self.stats.aggressive_venting {
            let area = self.aggressive_venting_area();
            let feared = area.weighted_targets().round();
            breakdown.fear = population.fear_proc_probability(AGGRESSIVE_VENTING_FEAR)
                * feared
                * population.average_fear_duration(0.0, 0.0)
                * weights.fear;
        }

        breakdown.stun = self.stats.stun_chance
            * f64::from(self.max_num_targets())
            * self.stats.stun_duration
            * weights.stun;
        breakdown
    }

    fn damage_wasted_by_armor(&self) -> f64 {
        self.env.population.percentage_damage_wasted_by_armor(
            self.damage_per_pellet,
            self.stats.armor_breaking,
            self.accuracy(false),
            self.accuracy(true),
        )
    }

    fn report(&self) -> MetricsReport {
        let ideal_sustained_dps = self.ideal_sustained_dps();
        let breakpoints = self.breakpoints();
        let utility_breakdown = self.utility();
        MetricsReport {
            ideal_burst_dps: self.single_target_dps(true, false, false, false),
            ideal_sustained_dps,
            sustained_weakpoint_dps: self.single_target_dps(false, true, false, false),
            sustained_weakpoint_accuracy_dps: self.single_target_dps(false, true, true, true),
            additional_target_dps: self.additional_target_dps(),
            max_multi_target_damage: self.max_multi_target_damage(),
            max_num_targets: self.max_num_targets(),
            firing_duration: self.firing_duration(),
            average_time_to_kill: time_to_kill(self.env.population.as_ref(), ideal_sustained_dps),
            average_damage_to_kill: self.average_damage_to_kill(),
            breakpoint_sum: breakpoints.iter().sum(),
            breakpoints,
            utility: utility_breakdown.total(),
            utility_breakdown,
            damage_per_magazine: self.pellets_per_burst * self.damage_per_pellet,
            time_to_fire_magazine: self.firing_period,
            general_accuracy: self.accuracy(false),
            weakpoint_accuracy: self.accuracy(true),
            time_to_ignite: self.ignition_time(false),
            damage_wasted_by_armor: self.damage_wasted_by_armor(),
        }
    }
}

/// Seconds of fire before overheating, extended by Cold As The Grave kills.
fn firing_period(stats: &Derived, env: &Environment) -> f64 {
    let base = heat::firing_period(BASELINE.max_heat, stats.heat_per_second);
    if !stats.cold_as_the_grave {
        return base;
    }

    // Rough burst DPS guess; the real one depends on the firing period being computed here.
    let mut estimated_burst_dps = stats.damage_per_pellet * stats.rate_of_fire / AMMO_PER_PELLET;
    if stats.variable_chamber_pressure {
        estimated_burst_dps *= 1.13;
    }
    let mut heat_removed_per_kill = HEAT_REMOVED_PER_KILL;
    if stats.burning_hell {
        estimated_burst_dps += 0.95 * env.constants.burn_dps;
        heat_removed_per_kill /= stats.heat_per_second;
    }

    KillHeatFeedback {
        heat_removed_per_kill,
        time_to_kill: time_to_kill(env.population.as_ref(), estimated_burst_dps),
        max_firing_period: stats.max_ammo / stats.rate_of_fire,
    }
    .extend(base)
    .firing_period
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Minigun;

impl Weapon for Minigun {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Minigun
    }

    fn full_name(&self) -> &'static str {
        "\"Lead Storm\" Powered Minigun"
    }

    fn class_name(&self) -> &'static str {
        "Gunner"
    }

    fn catalog(&self) -> &'static Catalog {
        &CATALOG
    }

    fn derived(&self, selection: &BuildSelection) -> DerivedStats {
        DerivedStats::Minigun(derive(selection))
    }

    fn stats(&self, selection: &BuildSelection, env: &Environment) -> Vec<StatsRow> {
        let model = Model::new(selection, &StatusEffectContext::default(), env);
        let stats = &model.stats;
        let modified = |stat| TABLE.is_modified(stat, selection);
        let burst_modified = modified(Stat::FiringPeriod) || modified(Stat::RateOfFire);

        vec![
            StatsRow::number("Direct Damage per Pellet:", model.damage_per_pellet, "direct_damage", modified(Stat::DamagePerPellet)),
            StatsRow::number("Ammo Consumed per Pellet:", AMMO_PER_PELLET, "blank", false),
            StatsRow::number("Ammo Spent Until Stabilized:", stats.pellets_until_stable * AMMO_PER_PELLET, "special", modified(Stat::RateOfFire)),
            StatsRow::number("Max Duration of Firing Without Overheating:", model.firing_period, "hourglass", modified(Stat::FiringPeriod)),
            StatsRow::number("Max Num Pellets Fired per Burst:", model.pellets_per_burst, "magazine_size", burst_modified),
            StatsRow::number("Max Ammo:", stats.max_ammo, "carried_ammo", modified(Stat::MaxAmmo)),
            StatsRow::number("Rate of Fire (Ammo/Sec):", stats.rate_of_fire, "rate_of_fire", modified(Stat::RateOfFire)),
            StatsRow::number("Cooling Rate:", stats.cooling_rate, "cooling_rate", modified(Stat::CoolingRate)),
            StatsRow::number("Max Cooldown Without Overheating:", stats.cooldown_period, "hourglass", modified(Stat::CoolingRate)),
            StatsRow::number("Cooldown After Overheat:", BASELINE.cooldown_after_overheat, "duration", false),
            StatsRow::number("Spinup Time:", stats.spinup_time, "charge_speed", modified(Stat::SpinupTime)),
            StatsRow::number("Spindown Time:", stats.spindown_time, "special", modified(Stat::SpindownTime)),
            StatsRow::percent("Armor Breaking:", stats.armor_breaking, "armor_breaking", modified(Stat::ArmorBreaking)).optional(),
            StatsRow::number("Max Penetrations:", f64::from(stats.penetrations), "blowthrough", modified(Stat::Penetrations)).optional(),
            StatsRow::number("Max Ricochets:", f64::from(stats.ricochets), "ricochet", modified(Stat::Ricochets)).optional(),
            StatsRow::percent("Stun Chance per Pellet:", stats.stun_chance, "homebrew_powder", modified(Stat::StunChance)),
            StatsRow::number("Stun Duration:", stats.stun_duration, "stun", modified(Stat::StunDuration)),
            StatsRow::percent("Base Spread:", stats.base_spread, "base_spread", modified(Stat::BaseSpread)).optional(),
            StatsRow::number(
                "Movement Speed While Using: (m/sec)",
                round_to(stats.movespeed_while_firing * env.constants.walk_speed, 2),
                "movespeed",
                modified(Stat::MovespeedWhileFiring),
            ),
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

    fn deals_splash_damage(&self, _selection: &BuildSelection) -> bool {
        false
    }

    fn effects_json(&self, selector: Selector) -> serde_json::Result<String> {
        serde_json::to_string(&TABLE.effects_of(selector))
    }
}
