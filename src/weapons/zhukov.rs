//! Zhukov NUK17 dual machine pistols. Both guns share one ammo pool, so every per-gun figure
//! (magazine, rate of fire, carried ammo) is halved before it feeds the formulas.

use serde::Serialize;

use crate::build::BuildSelection;
use crate::catalog::{Catalog, Classification, CostVector, ModifierOption, OverclockOption};
use crate::metrics::{
    ammo, damage_to_kill, round_to, time_to_kill, weakpoint_damage, HitSplit, MetricsReport,
    UtilityBreakdown,
};
use crate::model::{BreakpointInput, Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::resolve::{Marker, Rule, Selector, StatTable};

use super::{DerivedStats, Weapon, WeaponKind};

pub static ZHUKOV: Zhukov = Zhukov;

const EXPANDED_AMMO_BAGS: Selector = Selector::tier(1, 0);
const HIGH_VELOCITY_ROUNDS: Selector = Selector::tier(1, 1);
const HIGH_CAPACITY_MAGAZINE: Selector = Selector::tier(2, 0);
const SUPERCHARGED_FEED: Selector = Selector::tier(2, 1);
const QUICKFIRE_EJECTOR: Selector = Selector::tier(2, 2);
const INCREASED_CALIBER: Selector = Selector::tier(3, 0);
const WEIGHT_BALANCE: Selector = Selector::tier(3, 1);
const BLOWTHROUGH_ROUNDS: Selector = Selector::tier(4, 0);
const HOLLOW_POINT_BULLETS: Selector = Selector::tier(4, 1);
const LARGER_AMMO_BAGS: Selector = Selector::tier(4, 2);
const CONDUCTIVE_BULLETS: Selector = Selector::tier(5, 0);
const GET_IN_GET_OUT: Selector = Selector::tier(5, 1);

const MINIMAL_MAGAZINES: Selector = Selector::overclock(0);
const CUSTOM_CASINGS: Selector = Selector::overclock(1);
const CRYO_MINELETS: Selector = Selector::overclock(2);
const EMBEDDED_DETONATORS: Selector = Selector::overclock(3);
const GAS_RECYCLING: Selector = Selector::overclock(4);

const CONDUCTIVE_BULLETS_MULTIPLIER: f64 = 1.3;
const MINELET_COLD_DAMAGE: f64 = -10.0;
const MINELET_ARMING_TIME: f64 = 1.0;
/// Rough guess at how many enemies wander over a minelet field.
const MINELET_TARGETS: f64 = 3.0;
const GET_IN_GET_OUT_DURATION: f64 = 2.0;
const GET_IN_GET_OUT_BONUS: f64 = 1.0;
const CROSSHAIR_FIXED_WIDTH: f64 = 14.0;
const CROSSHAIR_SPREAD_WIDTH: f64 = 384.0;
const CROSSHAIR_HEIGHT: f64 = 98.0;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    direct_damage: f64,
    carried_ammo: f64,
    /// Both guns together; each gun holds half.
    magazine_size: f64,
    rate_of_fire: f64,
    reload_time: f64,
    base_spread: f64,
    movespeed_while_firing: f64,
}

const BASELINE: Baseline = Baseline {
    direct_damage: 11.0,
    carried_ammo: 600.0,
    magazine_size: 50.0,
    rate_of_fire: 30.0,
    reload_time: 1.8,
    base_spread: 1.0,
    movespeed_while_firing: 1.0,
};

static TIER_1: [ModifierOption; 2] = [
    ModifierOption::new(1, 0, "Expanded Ammo Bags", "+75 Max Ammo", "carried_ammo", CostVector::new(1000, [0, 20, 0, 0, 0, 0])),
    ModifierOption::new(1, 1, "High Velocity Rounds", "+1 Direct Damage", "direct_damage", CostVector::new(1000, [0, 0, 0, 0, 20, 0])),
];
static TIER_2: [ModifierOption; 3] = [
    ModifierOption::new(2, 0, "High Capacity Magazine", "+10 Magazine Size", "magazine_size", CostVector::new(1800, [18, 0, 0, 0, 12, 0])),
    ModifierOption::new(2, 1, "Supercharged Feed Mechanism", "+8 Rate of Fire", "rate_of_fire", CostVector::new(1800, [0, 0, 0, 12, 0, 18])),
    ModifierOption::new(2, 2, "Quickfire Ejector", "-0.6 Reload Time", "reload_speed", CostVector::new(1800, [0, 18, 0, 0, 12, 0])),
];
static TIER_3: [ModifierOption; 2] = [
    ModifierOption::new(3, 0, "Increased Caliber Rounds", "+2 Direct Damage", "direct_damage", CostVector::new(2200, [0, 0, 0, 20, 0, 30])),
    ModifierOption::new(3, 1, "Better Weight Balance", "x0.5 Base Spread", "base_spread", CostVector::new(2200, [0, 0, 0, 30, 0, 20])),
];
static TIER_4: [ModifierOption; 3] = [
    ModifierOption::new(4, 0, "Blowthrough Rounds", "+1 Penetration", "blowthrough", CostVector::new(3800, [0, 25, 0, 0, 15, 0])),
    ModifierOption::new(4, 1, "Hollow-Point Bullets", "+30% Weakpoint Bonus", "weakpoint_bonus", CostVector::new(3800, [0, 0, 36, 25, 15, 0])),
    ModifierOption::new(4, 2, "Expanded Ammo Bags", "+150 Max Ammo", "carried_ammo", CostVector::new(3800, [25, 36, 0, 0, 0, 15])),
];
static TIER_5: [ModifierOption; 2] = [
    ModifierOption::new(5, 0, "Conductive Bullets", "+30% Direct Damage dealt to enemies either being Electrocuted or inside a damage-amplifying field", "electricity", CostVector::new(4400, [0, 0, 60, 40, 0, 110])),
    ModifierOption::new(5, 1, "Get In, Get Out", "+100% Movement Speed for 2 seconds after reloading an empty magazine", "movespeed", CostVector::new(4400, [40, 60, 0, 0, 110, 0])),
];
static OVERCLOCKS: [OverclockOption; 5] = [
    OverclockOption::new(0, Classification::Clean, "Minimal Magazines", "+2 Rate of Fire, -0.4 Reload Time", "reload_speed", CostVector::new(8450, [0, 130, 0, 100, 0, 70])),
    OverclockOption::new(1, Classification::Balanced, "Custom Casings", "+30 Mag Size, -1 Direct Damage", "magazine_size", CostVector::new(7700, [0, 95, 0, 75, 140, 0])),
    OverclockOption::new(2, Classification::Unstable, "Cryo Minelets", "Bullets that impact terrain become Cryo Minelets that arm after 1 second and deal 10 Cold Damage to nearby enemies. -1 Direct Damage, -10 Magazine Size", "cold_damage", CostVector::new(7300, [135, 0, 95, 65, 0, 0])),
    OverclockOption::new(3, Classification::Unstable, "Embedded Detonators", "Bullets that damage an enemy leave a detonator that deals 10 Area Damage on reload. -3 Direct Damage, -75 Max Ammo", "special_reload", CostVector::new(7550, [65, 0, 90, 0, 0, 135])),
    OverclockOption::new(4, Classification::Unstable, "Gas Recycling", "+5 Direct Damage, no Weakpoint bonus damage, x1.5 Base Spread, -50% Movement Speed while firing", "direct_damage", CostVector::new(7800, [125, 0, 0, 0, 70, 105])),
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
    CarriedAmmo,
    MagazineSize,
    RateOfFire,
    ReloadTime,
    BaseSpread,
    Penetrations,
    WeakpointBonus,
    MovespeedWhileFiring,
    ConductiveBullets,
    Mobility,
    Freeze,
}

static RULES: [Rule<Stat>; 23] = [
    Rule::add(Stat::DirectDamage, HIGH_VELOCITY_ROUNDS, 1.0),
    Rule::add(Stat::DirectDamage, INCREASED_CALIBER, 2.0),
    Rule::add(Stat::DirectDamage, CUSTOM_CASINGS, -1.0),
    Rule::add(Stat::DirectDamage, CRYO_MINELETS, -1.0),
    Rule::add(Stat::DirectDamage, EMBEDDED_DETONATORS, -3.0),
    Rule::add(Stat::DirectDamage, GAS_RECYCLING, 5.0),
    // detonators deal 5 per ammo, so 10 per bullet pair
    Rule::replace(Stat::AreaDamage, EMBEDDED_DETONATORS, 10.0),
    Rule::add(Stat::CarriedAmmo, EXPANDED_AMMO_BAGS, 75.0),
    Rule::add(Stat::CarriedAmmo, LARGER_AMMO_BAGS, 150.0),
    Rule::add(Stat::CarriedAmmo, EMBEDDED_DETONATORS, -75.0),
    Rule::add(Stat::MagazineSize, HIGH_CAPACITY_MAGAZINE, 10.0),
    Rule::add(Stat::MagazineSize, CUSTOM_CASINGS, 30.0),
    Rule::add(Stat::MagazineSize, CRYO_MINELETS, -10.0),
    Rule::add(Stat::RateOfFire, SUPERCHARGED_FEED, 8.0),
    Rule::add(Stat::RateOfFire, MINIMAL_MAGAZINES, 2.0),
    Rule::add(Stat::ReloadTime, QUICKFIRE_EJECTOR, -0.6),
    Rule::add(Stat::ReloadTime, MINIMAL_MAGAZINES, -0.4),
    Rule::scale(Stat::BaseSpread, WEIGHT_BALANCE, 0.5),
    Rule::scale(Stat::BaseSpread, GAS_RECYCLING, 1.5),
    Rule::add(Stat::Penetrations, BLOWTHROUGH_ROUNDS, 1.0),
    Rule::add(Stat::WeakpointBonus, HOLLOW_POINT_BULLETS, 0.3),
    // -100% marks the loss of weakpoint damage altogether
    Rule::replace(Stat::WeakpointBonus, GAS_RECYCLING, -1.0),
    Rule::scale(Stat::MovespeedWhileFiring, GAS_RECYCLING, 0.5),
];

static MARKERS: [Marker<Stat>; 3] = [
    Marker::new(Stat::ConductiveBullets, CONDUCTIVE_BULLETS),
    Marker::new(Stat::Mobility, GET_IN_GET_OUT),
    Marker::new(Stat::Freeze, CRYO_MINELETS),
];

static TABLE: StatTable<'static, Stat> = StatTable::new(&RULES, &[], &MARKERS);

/// Stats as shown for the pair of guns; the model halves magazine and rate itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Derived {
    pub direct_damage: f64,
    pub area_damage: f64,
    pub carried_ammo: f64,
    pub magazine_size: f64,
    pub rate_of_fire: f64,
    pub reload_time: f64,
    pub base_spread: f64,
    pub penetrations: u32,
    pub weakpoint_bonus: f64,
    pub movespeed_while_firing: f64,
    pub conductive_bullets: bool,
    pub get_in_get_out: bool,
    pub cryo_minelets: bool,
    pub gas_recycling: bool,
}

impl Derived {
    /// Bullets per magazine of one gun; an odd total leaves the spare round unfired.
    fn effective_magazine(&self) -> f64 {
        (self.magazine_size / 2.0).floor()
    }

    /// An odd carried total still fires its last round as a full shot.
    fn effective_carried_ammo(&self) -> f64 {
        (self.carried_ammo / 2.0).ceil()
    }

    fn effective_rate_of_fire(&self) -> f64 {
        self.rate_of_fire / 2.0
    }

    fn time_to_fire_magazine(&self) -> f64 {
        self.effective_magazine() / self.effective_rate_of_fire()
    }
}

pub fn derive(selection: &BuildSelection) -> Derived {
    let resolve = |stat, base| TABLE.resolve(stat, base, selection);
    Derived {
        direct_damage: resolve(Stat::DirectDamage, BASELINE.direct_damage),
        area_damage: resolve(Stat::AreaDamage, 0.0),
        carried_ammo: resolve(Stat::CarriedAmmo, BASELINE.carried_ammo),
        magazine_size: resolve(Stat::MagazineSize, BASELINE.magazine_size),
        rate_of_fire: resolve(Stat::RateOfFire, BASELINE.rate_of_fire),
        reload_time: resolve(Stat::ReloadTime, BASELINE.reload_time),
        base_spread: resolve(Stat::BaseSpread, BASELINE.base_spread),
        penetrations: resolve(Stat::Penetrations, 0.0) as u32,
        weakpoint_bonus: resolve(Stat::WeakpointBonus, 0.0),
        movespeed_while_firing: resolve(
            Stat::MovespeedWhileFiring,
            BASELINE.movespeed_while_firing,
        ),
        conductive_bullets: CONDUCTIVE_BULLETS.is_selected(selection),
        get_in_get_out: GET_IN_GET_OUT.is_selected(selection),
        cryo_minelets: CRYO_MINELETS.is_selected(selection),
        gas_recycling: GAS_RECYCLING.is_selected(selection),
    }
}

struct Model<'a> {
    stats: Derived,
    context: StatusEffectContext,
    env: &'a Environment,
}

impl<'a> Model<'a> {
    fn new(selection: &BuildSelection, context: &StatusEffectContext, env: &'a Environment) -> Self {
        Self {
            stats: derive(selection),
            context: *context,
            env,
        }
    }

    fn accuracy(&self, weakpoint: bool) -> f64 {
        let width = CROSSHAIR_FIXED_WIDTH + CROSSHAIR_SPREAD_WIDTH * self.stats.base_spread;
        self.env
            .accuracy
            .rectangular_accuracy(weakpoint, width, CROSSHAIR_HEIGHT)
    }

    /// Bullets that must miss on purpose so their minelets freeze the target.
    fn bullets_needed_to_freeze(&self) -> f64 {
        let rate = self.stats.effective_rate_of_fire();
        let time = self
            .env
            .population
            .average_time_to_freeze(MINELET_COLD_DAMAGE, rate);
        (time * rate).ceil()
    }

    fn single_target_dps(&self, burst: bool, accuracy: bool, weakpoint: bool) -> f64 {
        let constants = &self.env.constants;
        let stats = &self.stats;
        let general = if accuracy {
            self.accuracy(false) / 100.0
        } else {
            1.0
        };

        let magazine = stats.effective_magazine();
        let mut duration = stats.time_to_fire_magazine();
        if !burst {
            duration += stats.reload_time;
        }

        let mut direct = stats.direct_damage * self.context.direct_multiplier(constants);
        let area = stats.area_damage * self.context.area_multiplier(constants);
        if stats.conductive_bullets && (self.context.electrocuted || self.context.damage_amplified)
        {
            direct *= CONDUCTIVE_BULLETS_MULTIPLIER;
        }

        let damage_per_magazine = if stats.cryo_minelets {
            let hits = if self.context.frozen {
                (magazine * general).round()
            } else {
                // miss on purpose, wait for the minelets to arm, then empty the rest into the
                // frozen target; frozen damage gets no weakpoint bonus
                duration += MINELET_ARMING_TIME;
                direct *= constants.frozen_damage_multiplier;
                ((magazine - self.bullets_needed_to_freeze()).max(0.0) * general).round()
            };
            direct * hits
        } else if weakpoint && !stats.gas_recycling && !self.context.frozen {
            let hits = HitSplit::new(magazine, general, self.accuracy(true) / 100.0);
            let weakpoint_direct =
                weakpoint_damage(self.env.population.as_ref(), direct, stats.weakpoint_bonus);
            hits.damage(weakpoint_direct, direct) + hits.total() as f64 * area
        } else {
            (direct + area) * (magazine * general).round()
        };

        damage_per_magazine / duration
    }

    fn ideal_sustained_dps(&self) -> f64 {
        self.single_target_dps(false, false, false)
    }

    fn max_num_targets(&self) -> u32 {
        1 + self.stats.penetrations
    }

    fn max_multi_target_damage(&self) -> f64 {
        let stats = &self.stats;
        let magazine = stats.magazine_size / 2.0;
        let carried = stats.effective_carried_ammo();
        let targets = f64::from(self.max_num_targets());
        if stats.cryo_minelets {
            let magazines = ammo::num_magazines(carried.trunc(), magazine.trunc());
            let wasted = (self.bullets_needed_to_freeze() * magazines).round();
            let frozen_damage = stats.direct_damage * self.env.constants.frozen_damage_multiplier;
            (magazine + carried - wasted) * frozen_damage * targets
        } else {
            (magazine + carried) * (stats.direct_damage + stats.area_damage) * targets
        }
    }

    fn firing_duration(&self) -> f64 {
        let stats = &self.stats;
        ammo::firing_duration(
            stats.effective_carried_ammo(),
            stats.effective_magazine(),
            stats.time_to_fire_magazine(),
            stats.reload_time,
        )
    }

    fn average_damage_to_kill(&self) -> f64 {
        let population = self.env.population.as_ref();
        let per_shot = if self.stats.gas_recycling {
            self.stats.direct_damage
        } else {
            weakpoint_damage(population, self.stats.direct_damage, self.stats.weakpoint_bonus)
        };
        damage_to_kill(population, per_shot)
    }

    fn breakpoints(&self) -> Vec<u32> {
        let stats = &self.stats;
        let breakpoints = self.env.population.breakpoints(&BreakpointInput {
            direct: stats.direct_damage,
            area: stats.area_damage,
            dot_damage: 0.0,
            weakpoint_bonus: stats.weakpoint_bonus.max(0.0),
            armor_breaking: 1.0,
            heat_per_shot: 0.0,
            shots_per_sec: stats.rate_of_fire,
            status: self.context,
        });
        if !stats.gas_recycling {
            return breakpoints;
        }
        // weakpoint hits land as body hits
        breakpoints
            .chunks(2)
            .flat_map(|pair| [pair[0], pair[0]])
            .collect()
    }

    fn utility(&self) -> UtilityBreakdown {
        let constants = &self.env.constants;
        let weights = &constants.utility;
        let stats = &self.stats;
        let walk = constants.walk_speed;

        let mut mobility =
            (round_to(stats.movespeed_while_firing * walk, 2) - round_to(walk, 2)) * weights.movespeed;
        if stats.get_in_get_out {
            let cycle = stats.time_to_fire_magazine() + stats.reload_time;
            let uptime = (GET_IN_GET_OUT_DURATION / cycle).min(1.0);
            mobility += uptime * GET_IN_GET_OUT_BONUS * walk * weights.movespeed;
        }

        let mut breakdown = UtilityBreakdown {
            mobility,
            armor_break: self
                .env
                .population
                .light_armor_break_probability(stats.direct_damage, 1.0)
                * weights.armor_break,
            ..UtilityBreakdown::default()
        };
        if stats.cryo_minelets {
            breakdown.slow = MINELET_TARGETS * weights.cold;
            breakdown.freeze = MINELET_TARGETS * weights.frozen;
        }
        breakdown
    }

    fn report(&self) -> MetricsReport {
        let stats = &self.stats;
        let population = self.env.population.as_ref();
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
            additional_target_dps: if stats.penetrations > 0 {
                ideal_sustained_dps
            } else {
                0.0
            },
            max_multi_target_damage: self.max_multi_target_damage(),
            max_num_targets: self.max_num_targets(),
            firing_duration: self.firing_duration(),
            average_time_to_kill: time_to_kill(population, ideal_sustained_dps),
            average_damage_to_kill: self.average_damage_to_kill(),
            breakpoint_sum: breakpoints.iter().sum(),
            breakpoints,
            utility: utility_breakdown.total(),
            utility_breakdown,
            damage_per_magazine: stats.magazine_size / 2.0
                * (stats.direct_damage + stats.area_damage)
                * f64::from(self.max_num_targets()),
            time_to_fire_magazine: stats.magazine_size / stats.rate_of_fire,
            general_accuracy,
            weakpoint_accuracy,
            time_to_ignite: None,
            damage_wasted_by_armor: population.percentage_damage_wasted_by_armor(
                stats.direct_damage,
                1.0,
                general_accuracy,
                weakpoint_accuracy,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Zhukov;

impl Weapon for Zhukov {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Zhukov
    }

    fn full_name(&self) -> &'static str {
        "Zhukov NUK17"
    }

    fn class_name(&self) -> &'static str {
        "Scout"
    }

    fn catalog(&self) -> &'static Catalog {
        &CATALOG
    }

    fn derived(&self, selection: &BuildSelection) -> DerivedStats {
        DerivedStats::Zhukov(derive(selection))
    }

    fn stats(&self, selection: &BuildSelection, env: &Environment) -> Vec<StatsRow> {
        let stats = derive(selection);
        let modified = |stat| TABLE.is_modified(stat, selection);
        let sign = if stats.gas_recycling { "" } else { "+" };
        let weakpoint_bonus = format!("{sign}{}%", round_to(stats.weakpoint_bonus * 100.0, 0));

        vec![
            StatsRow::number("Direct Damage:", stats.direct_damage, "direct_damage", modified(Stat::DirectDamage)),
            StatsRow::number("Area Damage:", stats.area_damage, "area_damage", modified(Stat::AreaDamage)).optional(),
            StatsRow::number("Magazine Size:", stats.magazine_size, "magazine_size", modified(Stat::MagazineSize)),
            StatsRow::number("Max Ammo:", stats.carried_ammo, "carried_ammo", modified(Stat::CarriedAmmo)),
            StatsRow::number("Rate of Fire:", stats.rate_of_fire, "rate_of_fire", modified(Stat::RateOfFire)),
            StatsRow::number("Reload Time:", stats.reload_time, "reload_speed", modified(Stat::ReloadTime)),
            StatsRow::text("Weakpoint Bonus:", &weakpoint_bonus, "weakpoint_bonus", modified(Stat::WeakpointBonus)).optional(),
            StatsRow::number("Max Penetrations:", f64::from(stats.penetrations), "blowthrough", modified(Stat::Penetrations)).optional(),
            StatsRow::percent("Base Spread:", stats.base_spread, "base_spread", modified(Stat::BaseSpread)).optional(),
            StatsRow::number(
                "Movespeed While Firing: (m/sec)",
                round_to(stats.movespeed_while_firing * env.constants.walk_speed, 2),
                "movespeed",
                modified(Stat::MovespeedWhileFiring),
            )
            .optional(),
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
