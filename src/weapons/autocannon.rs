//! "Thunderhead" Heavy Autocannon: ramping rate of fire with splash damage on every round.

use serde::Serialize;

use crate::build::BuildSelection;
use crate::catalog::{Catalog, Classification, CostVector, ModifierOption, OverclockOption};
use crate::metrics::{
    ammo, damage_to_kill, dot, rampup, round_to, time_to_kill, utility, weakpoint_damage,
    AoeEfficiency, HitSplit, MetricsReport, RampUp, UtilityBreakdown,
};
use crate::model::{BreakpointInput, Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::resolve::{Branch, Marker, Rule, Selector, StatTable};

use super::{DerivedStats, Weapon, WeaponKind};

pub static AUTOCANNON: Autocannon = Autocannon;

const INCREASED_CALIBER: Selector = Selector::tier(1, 0);
const HIGH_CAPACITY_MAGAZINE: Selector = Selector::tier(1, 1);
const EXPANDED_AMMO_BAGS: Selector = Selector::tier(1, 2);
const TIGHTER_BARREL: Selector = Selector::tier(2, 0);
const IMPROVED_GAS_SYSTEM: Selector = Selector::tier(2, 1);
const LIGHTER_BARREL: Selector = Selector::tier(2, 2);
const SUPERCHARGED_FEED: Selector = Selector::tier(3, 0);
const LOADED_ROUNDS: Selector = Selector::tier(3, 1);
const HIGH_VELOCITY_ROUNDS: Selector = Selector::tier(3, 2);
const PENETRATING_ROUNDS: Selector = Selector::tier(4, 0);
const SHRAPNEL_ROUNDS: Selector = Selector::tier(4, 1);
const FEEDBACK_LOOP: Selector = Selector::tier(5, 0);
const SUPPRESSIVE_FIRE: Selector = Selector::tier(5, 1);
const DAMAGE_RESISTANCE: Selector = Selector::tier(5, 2);

const COMPOSITE_DRUMS: Selector = Selector::overclock(0);
const SPLINTERING_SHELLS: Selector = Selector::overclock(1);
const CARPET_BOMBER: Selector = Selector::overclock(2);
const COMBAT_MOBILITY: Selector = Selector::overclock(3);
const BIG_BERTHA: Selector = Selector::overclock(4);
const NEUROTOXIN_PAYLOAD: Selector = Selector::overclock(5);

const NEURO_PROC_CHANCE: f64 = 0.3;
const FEEDBACK_LOOP_BONUS: f64 = 1.2;
const DAMAGE_RESISTANCE_AT_MAX_RATE: f64 = 0.33;
const SUPPRESSIVE_FIRE_FEAR: f64 = 0.5;
const SUPPRESSIVE_FIRE_TARGETS: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    direct_damage: f64,
    area_damage: f64,
    aoe_radius: f64,
    magazine_size: f64,
    carried_ammo: f64,
    movespeed_while_firing: f64,
    ramp_growth: f64,
    min_rate_of_fire: f64,
    max_rate_of_fire: f64,
    reload_time: f64,
    base_spread: f64,
    armor_breaking: f64,
}

const BASELINE: Baseline = Baseline {
    direct_damage: 14.0,
    area_damage: 9.0,
    aoe_radius: 1.4,
    magazine_size: 110.0,
    carried_ammo: 440.0,
    movespeed_while_firing: 0.5,
    ramp_growth: 0.3,
    min_rate_of_fire: 3.0,
    max_rate_of_fire: 5.5,
    reload_time: 5.0,
    base_spread: 1.0,
    armor_breaking: 1.0,
};

static TIER_1: [ModifierOption; 3] = [
    ModifierOption::new(1, 0, "Increased Caliber Rounds", "+3 Direct Damage", "direct_damage", CostVector::new(1200, [0, 25, 0, 0, 0, 0])),
    ModifierOption::new(1, 1, "High Capacity Magazine", "x2 Magazine Size", "magazine_size", CostVector::new(1200, [0, 0, 0, 0, 25, 0])),
    ModifierOption::new(1, 2, "Expanded Ammo Bags", "+220 Max Ammo", "carried_ammo", CostVector::new(1200, [0, 0, 0, 25, 0, 0])),
];
static TIER_2: [ModifierOption; 3] = [
    ModifierOption::new(2, 0, "Tighter Barrel Alignment", "-30% Base Spread", "base_spread", CostVector::new(2000, [0, 0, 0, 24, 15, 0])),
    ModifierOption::new(2, 1, "Improved Gas System", "+0.2 Min Rate of Fire, +1.5 Max Rate of Fire", "rate_of_fire", CostVector::new(2000, [0, 0, 0, 0, 15, 24])),
    ModifierOption::new(2, 2, "Lighter Barrel Assembly", "+1 Min Rate of Fire, x2 Rate of Fire Growth", "rate_of_fire", CostVector::new(2000, [0, 15, 0, 0, 24, 0])),
];
static TIER_3: [ModifierOption; 3] = [
    ModifierOption::new(3, 0, "Supercharged Feed Mechanism", "+0.6 Min Rate of Fire, +2 Max Rate of Fire", "rate_of_fire", CostVector::new(2800, [0, 0, 0, 50, 0, 35])),
    ModifierOption::new(3, 1, "Loaded Rounds", "+2 Area Damage", "area_damage", CostVector::new(2800, [35, 0, 50, 0, 0, 0])),
    ModifierOption::new(3, 2, "High Velocity Rounds", "+4 Direct Damage", "direct_damage", CostVector::new(2800, [50, 0, 0, 0, 35, 0])),
];
static TIER_4: [ModifierOption; 2] = [
    ModifierOption::new(4, 0, "Penetrating Rounds", "+400% Armor Breaking", "armor_breaking", CostVector::new(4800, [48, 0, 0, 0, 50, 72])),
    ModifierOption::new(4, 1, "Shrapnel Rounds", "+0.6m AoE Radius", "aoe_radius", CostVector::new(4800, [50, 0, 48, 0, 0, 72])),
];
static TIER_5: [ModifierOption; 3] = [
    ModifierOption::new(5, 0, "Feedback Loop", "x1.2 Direct and Area Damage when at Max Rate of Fire", "direct_damage", CostVector::new(5600, [64, 70, 0, 140, 0, 0])),
    ModifierOption::new(5, 1, "Suppressive Fire", "50% chance to inflict Fear on enemies within 1m of impact", "fear", CostVector::new(5600, [64, 70, 140, 0, 0, 0])),
    ModifierOption::new(5, 2, "Damage Resistance At Full RoF", "33% Damage Resistance when at Max Rate of Fire", "damage_resistance", CostVector::new(5600, [0, 0, 0, 64, 70, 140])),
];
static OVERCLOCKS: [OverclockOption; 6] = [
    OverclockOption::new(0, Classification::Clean, "Composite Drums", "+110 Max Ammo, -0.5 Reload Time", "carried_ammo", CostVector::new(7850, [105, 0, 0, 135, 70, 0])),
    OverclockOption::new(1, Classification::Clean, "Splintering Shells", "+1 Area Damage, +0.3m AoE Radius", "aoe_radius", CostVector::new(7300, [65, 0, 0, 95, 0, 125])),
    OverclockOption::new(2, Classification::Balanced, "Carpet Bomber", "+3 Area Damage, +0.7m AoE Radius, -6 Direct Damage", "area_damage", CostVector::new(7350, [105, 0, 70, 120, 0, 0])),
    OverclockOption::new(3, Classification::Balanced, "Combat Mobility", "Movement speed while firing from 50% to 65% of walk speed, -2 Direct Damage", "movespeed", CostVector::new(7650, [95, 0, 0, 70, 0, 120])),
    OverclockOption::new(4, Classification::Unstable, "Big Bertha", "+12 Direct Damage, -30% Base Spread, x0.5 Magazine Size, -110 Max Ammo, -1.5 Max Rate of Fire", "direct_damage", CostVector::new(8400, [0, 125, 80, 105, 0, 0])),
    OverclockOption::new(5, Classification::Unstable, "Neurotoxin Payload", "30% chance to inflict a Neurotoxin DoT on every enemy in the AoE. +0.3m AoE Radius, -3 Direct Damage, -6 Area Damage", "neurotoxin", CostVector::new(8100, [135, 0, 0, 100, 0, 75])),
];

pub static CATALOG: Catalog = Catalog {
    tiers: [&TIER_1, &TIER_2, &TIER_3, &TIER_4, &TIER_5],
    overclocks: &OVERCLOCKS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    DirectDamage,
    AreaDamage,
    AoeRadius,
    MagazineSize,
    CarriedAmmo,
    MovespeedWhileFiring,
    RampGrowth,
    MinRateOfFire,
    MaxRateOfFire,
    ReloadTime,
    BaseSpread,
    ArmorBreaking,
    FeedbackLoop,
    Fear,
    DamageResistance,
    Neurotoxin,
}

static RULES: [Rule<Stat>; 31] = [
    Rule::add(Stat::DirectDamage, INCREASED_CALIBER, 3.0),
    Rule::add(Stat::DirectDamage, HIGH_VELOCITY_ROUNDS, 4.0),
    Rule::add(Stat::DirectDamage, CARPET_BOMBER, -6.0),
    Rule::add(Stat::DirectDamage, COMBAT_MOBILITY, -2.0),
    Rule::add(Stat::DirectDamage, BIG_BERTHA, 12.0),
    Rule::add(Stat::DirectDamage, NEUROTOXIN_PAYLOAD, -3.0),
    Rule::add(Stat::AreaDamage, LOADED_ROUNDS, 2.0),
    Rule::add(Stat::AreaDamage, SPLINTERING_SHELLS, 1.0),
    Rule::add(Stat::AreaDamage, CARPET_BOMBER, 3.0),
    Rule::add(Stat::AreaDamage, NEUROTOXIN_PAYLOAD, -6.0),
    Rule::add(Stat::AoeRadius, SHRAPNEL_ROUNDS, 0.6),
    Rule::add(Stat::AoeRadius, SPLINTERING_SHELLS, 0.3),
    Rule::add(Stat::AoeRadius, CARPET_BOMBER, 0.7),
    Rule::add(Stat::AoeRadius, NEUROTOXIN_PAYLOAD, 0.3),
    Rule::scale(Stat::MagazineSize, HIGH_CAPACITY_MAGAZINE, 2.0),
    Rule::scale(Stat::MagazineSize, BIG_BERTHA, 0.5),
    Rule::add(Stat::CarriedAmmo, EXPANDED_AMMO_BAGS, 220.0),
    Rule::add(Stat::CarriedAmmo, COMPOSITE_DRUMS, 110.0),
    Rule::add(Stat::CarriedAmmo, BIG_BERTHA, -110.0),
    Rule::add(Stat::MovespeedWhileFiring, COMBAT_MOBILITY, 0.15),
    Rule::add(Stat::RampGrowth, LIGHTER_BARREL, 0.3),
    Rule::add(Stat::MinRateOfFire, IMPROVED_GAS_SYSTEM, 0.2),
    Rule::add(Stat::MinRateOfFire, LIGHTER_BARREL, 1.0),
    Rule::add(Stat::MinRateOfFire, SUPERCHARGED_FEED, 0.6),
    Rule::add(Stat::MaxRateOfFire, IMPROVED_GAS_SYSTEM, 1.5),
    Rule::add(Stat::MaxRateOfFire, SUPERCHARGED_FEED, 2.0),
    Rule::add(Stat::MaxRateOfFire, BIG_BERTHA, -1.5),
    Rule::add(Stat::ReloadTime, COMPOSITE_DRUMS, -0.5),
    Rule::replace(Stat::ArmorBreaking, PENETRATING_ROUNDS, 5.0),
    Rule::add(Stat::BaseSpread, TIGHTER_BARREL, -0.3),
    Rule::add(Stat::BaseSpread, BIG_BERTHA, -0.3),
];

// Either spread option alone takes 30% off; both together take 50% off, not 60%.

static BRANCHES: [Branch<Stat>; 1] = [Branch {
    stat: Stat::BaseSpread,
    when: &[TIGHTER_BARREL, BIG_BERTHA],
    value: 0.5,
}];

static MARKERS: [Marker<Stat>; 4] = [
    Marker::new(Stat::FeedbackLoop, FEEDBACK_LOOP),
    Marker::new(Stat::Fear, SUPPRESSIVE_FIRE),
    Marker::new(Stat::DamageResistance, DAMAGE_RESISTANCE),
    Marker::new(Stat::Neurotoxin, NEUROTOXIN_PAYLOAD),
];

static TABLE: StatTable<'static, Stat> = StatTable::new(&RULES, &BRANCHES, &MARKERS);

fn resolve(stat: Stat, base: f64, selection: &BuildSelection) -> f64 {
    TABLE.resolve(stat, base, selection)
}

fn is_modified(stat: Stat, selection: &BuildSelection) -> bool {
    TABLE.is_modified(stat, selection)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Derived {
    pub direct_damage: f64,
    pub area_damage: f64,
    pub aoe_radius: f64,
    pub magazine_size: f64,
    pub carried_ammo: f64,
    /// Fraction of walk speed kept while firing.
    pub movespeed_while_firing: f64,
    pub ramp: RampUp,
    pub ramp_rounds: u32,
    pub average_rate_of_fire: f64,
    pub reload_time: f64,
    pub base_spread: f64,
    pub armor_breaking: f64,
    pub feedback_loop: bool,
    pub suppressive_fire: bool,
    pub damage_resistance: bool,
    pub neurotoxin: bool,
}

pub fn derive(selection: &BuildSelection) -> Derived {
    let magazine_size = resolve(Stat::MagazineSize, BASELINE.magazine_size, selection).floor();
    let ramp = RampUp::new(
        resolve(Stat::MinRateOfFire, BASELINE.min_rate_of_fire, selection),
        resolve(Stat::MaxRateOfFire, BASELINE.max_rate_of_fire, selection),
        resolve(Stat::RampGrowth, BASELINE.ramp_growth, selection),
    );
    // Lighter Barrel with Big Bertha collapses the ramp: the weapon fires at max rate throughout.
    let average_rate_of_fire =
        if LIGHTER_BARREL.is_selected(selection) && BIG_BERTHA.is_selected(selection) {
            ramp.max_rate
        } else {
            ramp.average_rate_over(magazine_size)
        };

    Derived {
        direct_damage: resolve(Stat::DirectDamage, BASELINE.direct_damage, selection),
        area_damage: resolve(Stat::AreaDamage, BASELINE.area_damage, selection),
        aoe_radius: resolve(Stat::AoeRadius, BASELINE.aoe_radius, selection),
        magazine_size,
        carried_ammo: resolve(Stat::CarriedAmmo, BASELINE.carried_ammo, selection),
        movespeed_while_firing: resolve(
            Stat::MovespeedWhileFiring,
            BASELINE.movespeed_while_firing,
            selection,
        ),
        ramp,
        ramp_rounds: ramp.rounds(),
        average_rate_of_fire,
        reload_time: resolve(Stat::ReloadTime, BASELINE.reload_time, selection),
        base_spread: resolve(Stat::BaseSpread, BASELINE.base_spread, selection),
        armor_breaking: resolve(Stat::ArmorBreaking, BASELINE.armor_breaking, selection),
        feedback_loop: FEEDBACK_LOOP.is_selected(selection),
        suppressive_fire: SUPPRESSIVE_FIRE.is_selected(selection),
        damage_resistance: DAMAGE_RESISTANCE.is_selected(selection),
        neurotoxin: NEUROTOXIN_PAYLOAD.is_selected(selection),
    }
}

struct Model<'a> {
    stats: Derived,
    selection: BuildSelection,
    context: StatusEffectContext,
    env: &'a Environment,
    aoe: AoeEfficiency,
}

impl<'a> Model<'a> {
    fn new(selection: &BuildSelection, context: &StatusEffectContext, env: &'a Environment) -> Self {
        let stats = derive(selection);
        let aoe = AoeEfficiency::new(stats.aoe_radius, 0.75, 0.5, env.population.as_ref());
        Self {
            stats,
            selection: *selection,
            context: *context,
            env,
            aoe,
        }
    }

    fn feedback_multiplier(&self) -> f64 {
        if self.stats.feedback_loop {
            rampup::delayed_bonus_multiplier(
                FEEDBACK_LOOP_BONUS,
                f64::from(self.stats.ramp_rounds),
                self.stats.magazine_size,
            )
        } else {
            1.0
        }
    }

    fn time_to_fire_magazine(&self) -> f64 {
        self.stats.magazine_size / self.stats.average_rate_of_fire
    }

    fn accuracy(&self, weakpoint: bool) -> f64 {
        let tighter = TIGHTER_BARREL.is_selected(&self.selection);
        let bertha = BIG_BERTHA.is_selected(&self.selection);
        let (width, height) = match (tighter, bertha) {
            (true, true) => (206.0, 96.0),
            (true, false) | (false, true) => (279.0, 125.0),
            (false, false) => (397.0, 162.0),
        };
        self.env.accuracy.rectangular_accuracy(weakpoint, width, height)
    }

    fn single_target_dps(&self, burst: bool, accuracy: bool, weakpoint: bool) -> f64 {
        let constants = &self.env.constants;
        let magazine = self.stats.magazine_size;
        let general = if accuracy {
            self.accuracy(false) / 100.0
        } else {
            1.0
        };
        let mut duration = self.time_to_fire_magazine();
        if !burst {
            duration += self.stats.reload_time;
        }

        let feedback = self.feedback_multiplier();
        let direct =
            self.stats.direct_damage * self.context.direct_multiplier(constants) * feedback;
        let area = self.stats.area_damage * self.context.area_multiplier(constants) * feedback;

        let (weakpoint_accuracy, weakpoint_direct) = if weakpoint && !self.context.frozen {
            (
                self.accuracy(true) / 100.0,
                weakpoint_damage(self.env.population.as_ref(), direct, 0.0),
            )
        } else {
            (0.0, direct)
        };
        let hits = HitSplit::new(magazine, general, weakpoint_accuracy);

        let neuro_dps = if self.stats.neurotoxin {
            if burst {
                dot::burst_dot_dps_per_magazine(NEURO_PROC_CHANCE, constants.neuro_dps, magazine)
            } else {
                constants.neuro_dps
            }
        } else {
            0.0
        };

        // splash from every round is counted on the primary target, hit or miss
        (hits.damage(weakpoint_direct, direct) + magazine * area) / duration + neuro_dps
    }

    fn ideal_sustained_dps(&self) -> f64 {
        self.single_target_dps(false, false, false)
    }

    fn time_to_kill(&self) -> f64 {
        time_to_kill(self.env.population.as_ref(), self.ideal_sustained_dps())
    }

    fn additional_target_dps(&self) -> f64 {
        let cycle = self.time_to_fire_magazine() + self.stats.reload_time;
        let area = self.stats.area_damage * self.feedback_multiplier();
        let mut dps = area * self.aoe.average_damage * self.stats.magazine_size / cycle;
        if self.stats.neurotoxin {
            dps += self.env.constants.neuro_dps;
        }
        dps
    }

    fn neuro_damage_per_enemy(&self) -> f64 {
        if !self.stats.neurotoxin {
            return 0.0;
        }
        let constants = &self.env.constants;
        let onset = dot::mean_rolls(NEURO_PROC_CHANCE) / self.stats.average_rate_of_fire;
        dot::average_dot_damage_per_enemy(
            onset,
            constants.neuro_duration,
            constants.neuro_dps,
            self.time_to_kill(),
        )
    }

    fn max_multi_target_damage(&self) -> f64 {
        let targets = f64::from(self.aoe.targets);
        let falloff = if self.aoe.targets > 1 {
            self.aoe.average_damage
        } else {
            1.0
        };
        let per_round = self.stats.direct_damage + targets * self.stats.area_damage * falloff;
        let per_magazine = per_round * self.stats.magazine_size * self.feedback_multiplier();
        let magazines = ammo::num_magazines(self.stats.carried_ammo, self.stats.magazine_size);

        let neuro_total = if self.stats.neurotoxin {
            let killed = targets * (self.firing_duration() / self.time_to_kill());
            self.neuro_damage_per_enemy() * killed
        } else {
            0.0
        };
        per_magazine * magazines + neuro_total
    }

    fn firing_duration(&self) -> f64 {
        ammo::firing_duration(
            self.stats.carried_ammo,
            self.stats.magazine_size,
            self.time_to_fire_magazine(),
            self.stats.reload_time,
        )
    }

    fn average_damage_to_kill(&self) -> f64 {
        let population = self.env.population.as_ref();
        let per_shot =
            weakpoint_damage(population, self.stats.direct_damage, 0.0) + self.stats.area_damage;
        damage_to_kill(population, per_shot)
    }

    fn breakpoints(&self) -> Vec<u32> {
        let feedback = self.feedback_multiplier();
        self.env.population.breakpoints(&BreakpointInput {
            direct: self.stats.direct_damage * feedback,
            area: self.stats.area_damage * feedback,
            dot_damage: self.neuro_damage_per_enemy(),
            weakpoint_bonus: 0.0,
            armor_breaking: self.stats.armor_breaking,
            heat_per_shot: 0.0,
            shots_per_sec: self.stats.average_rate_of_fire,
            status: self.context,
        })
    }

    fn full_rate_uptime(&self) -> f64 {
        let ramp = self.stats.ramp;
        if ramp.is_flat() {
            return 1.0;
        }
        let ramp_rounds = f64::from(self.stats.ramp_rounds);
        // ramp-up time in the published utility tables: rounds over ln(max/min), over the growth rate
        let ramping = ramp_rounds / (ramp.max_rate / ramp.min_rate).ln() / ramp.growth;
        let at_max = (self.stats.magazine_size - ramp_rounds).max(0.0) / ramp.max_rate;
        at_max / (ramping + at_max)
    }

    fn utility(&self) -> UtilityBreakdown {
        let constants = &self.env.constants;
        let weights = &constants.utility;
        let population = self.env.population.as_ref();
        let mut breakdown = UtilityBreakdown::default();

        let walk = constants.walk_speed;
        breakdown.mobility = (round_to(self.stats.movespeed_while_firing * walk, 2)
            - round_to(BASELINE.movespeed_while_firing * walk, 2))
            * weights.movespeed;

        if self.stats.damage_resistance {
            breakdown.damage_resistance = self.full_rate_uptime()
                * utility::effective_health_multiplier(DAMAGE_RESISTANCE_AT_MAX_RATE)
                * weights.damage_resist;
        }

        let targets = f64::from(self.aoe.targets);
        let direct_break = population.light_armor_break_probability(
            self.stats.direct_damage + self.stats.area_damage,
            self.stats.armor_breaking,
        );
        let area_break = population.light_armor_break_probability(
            self.aoe.average_damage * self.stats.area_damage,
            self.stats.armor_breaking,
        );
        breakdown.armor_break =
            (direct_break + (targets - 1.0) * area_break) * weights.armor_break / targets;

        if self.stats.neurotoxin {
            breakdown.slow = NEURO_PROC_CHANCE * targets * constants.neuro_duration * weights.slow;
        }

        if self.stats.suppressive_fire {
            breakdown.fear = SUPPRESSIVE_FIRE_FEAR
                * SUPPRESSIVE_FIRE_TARGETS
                * population.average_fear_duration(0.0, 0.0)
                * weights.fear;
        }

        breakdown
    }

    fn damage_per_magazine(&self) -> f64 {
        let per_round =
            self.stats.direct_damage + self.stats.area_damage * self.aoe.weighted_targets();
        per_round * self.stats.magazine_size * self.feedback_multiplier()
    }

    fn report(&self) -> MetricsReport {
        let ideal_sustained_dps = self.ideal_sustained_dps();
        let breakpoints = self.breakpoints();
        let utility_breakdown = self.utility();
        let general_accuracy = self.accuracy(false);
        let weakpoint_accuracy = self.accuracy(true);
        MetricsReport {
            ideal_burst_dps: self.single_target_dps(true, false, false),
            ideal_sustained_dps,
            sustained_weakpoint_dps: self.single_target_dps(false, false, true),
            sustained_weakpoint_accuracy_dps: self.single_target_dps(false, true, true),
            additional_target_dps: self.additional_target_dps(),
            max_multi_target_damage: self.max_multi_target_damage(),
            max_num_targets: self.aoe.targets.max(1),
            firing_duration: self.firing_duration(),
            average_time_to_kill: time_to_kill(self.env.population.as_ref(), ideal_sustained_dps),
            average_damage_to_kill: self.average_damage_to_kill(),
            breakpoint_sum: breakpoints.iter().sum(),
            breakpoints,
            utility: utility_breakdown.total(),
            utility_breakdown,
            damage_per_magazine: self.damage_per_magazine(),
            time_to_fire_magazine: self.time_to_fire_magazine(),
            general_accuracy,
            weakpoint_accuracy,
            time_to_ignite: None,
            damage_wasted_by_armor: self.env.population.percentage_damage_wasted_by_armor(
                self.stats.direct_damage,
                self.stats.armor_breaking,
                general_accuracy,
                weakpoint_accuracy,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Autocannon;

impl Weapon for Autocannon {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Autocannon
    }

    fn full_name(&self) -> &'static str {
        "\"Thunderhead\" Heavy Autocannon"
    }

    fn class_name(&self) -> &'static str {
        "Gunner"
    }

    fn catalog(&self) -> &'static Catalog {
        &CATALOG
    }

    fn derived(&self, selection: &BuildSelection) -> DerivedStats {
        DerivedStats::Autocannon(derive(selection))
    }

    fn stats(&self, selection: &BuildSelection, env: &Environment) -> Vec<StatsRow> {
        let stats = derive(selection);
        let modified = |stat| is_modified(stat, selection);
        let rate_modified = modified(Stat::MinRateOfFire) || modified(Stat::MaxRateOfFire);
        let aoe = AoeEfficiency::new(stats.aoe_radius, 0.75, 0.5, env.population.as_ref());

        vec![
            StatsRow::number("Direct Damage:", stats.direct_damage, "direct_damage", modified(Stat::DirectDamage)),
            StatsRow::number("Area Damage:", stats.area_damage, "area_damage", modified(Stat::AreaDamage)),
            StatsRow::number("AoE Radius:", aoe.radius, "aoe_radius", modified(Stat::AoeRadius)),
            StatsRow::number("Magazine Size:", stats.magazine_size, "magazine_size", modified(Stat::MagazineSize)),
            StatsRow::number("Max Ammo:", stats.carried_ammo, "carried_ammo", modified(Stat::CarriedAmmo)),
            StatsRow::number("Starting Rate of Fire:", stats.ramp.min_rate, "rate_of_fire", modified(Stat::MinRateOfFire)),
            StatsRow::number("Max Rate of Fire:", stats.ramp.max_rate, "rate_of_fire", modified(Stat::MaxRateOfFire)),
            StatsRow::number("Number of Bullets Fired Before Max RoF:", f64::from(stats.ramp_rounds), "blank", false),
            StatsRow::number("Average Rate of Fire:", stats.average_rate_of_fire, "rate_of_fire", rate_modified),
            StatsRow::number("Reload Time:", stats.reload_time, "reload_speed", modified(Stat::ReloadTime)),
            StatsRow::percent("Armor Breaking:", stats.armor_breaking, "armor_breaking", modified(Stat::ArmorBreaking)).optional(),
            StatsRow::text("Fear Chance:", "50%", "fear", modified(Stat::Fear)).optional(),
            StatsRow::percent("Base Spread:", stats.base_spread, "base_spread", modified(Stat::BaseSpread)).optional(),
            StatsRow::number(
                "Movement Speed While Using: (m/sec)",
                round_to(stats.movespeed_while_firing * env.constants.walk_speed, 2),
                "movespeed",
                modified(Stat::MovespeedWhileFiring),
            ),
            StatsRow::text("Damage Resistance at Full RoF:", "33%", "damage_resistance", modified(Stat::DamageResistance)).optional(),
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
        true
    }

    fn effects_json(&self, selector: Selector) -> serde_json::Result<String> {
        serde_json::to_string(&TABLE.effects_of(selector))
    }
}
