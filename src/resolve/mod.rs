//! Table-driven stat resolution.
//!
//! A weapon declares, per stat, which selections adjust it and how. Resolution starts from
//! the baseline value, sums every additive adjustment, then applies replacement (explicit
//! branches first, then replace rules), then scales:
//!
//! `resolved = scale_product * replaced_or(base + sum(add))`

use serde::Serialize;

use crate::build::BuildSelection;

/// A single selectable option: tier letter or overclock slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// 1-based tier and 0-based option index.
    Tier { tier: u8, index: u8 },
    Overclock(u8),
}

impl Selector {
    pub const fn tier(tier: u8, index: u8) -> Self {
        Self::Tier { tier, index }
    }

    pub const fn overclock(index: u8) -> Self {
        Self::Overclock(index)
    }

    pub fn is_selected(&self, selection: &BuildSelection) -> bool {
        match *self {
            Self::Tier { tier, index } => selection.tier(usize::from(tier)) == Some(index),
            Self::Overclock(index) => selection.overclock() == Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Adjustment {
    Add(f64),
    Replace(f64),
    Scale(f64),
}

/// `stat` is adjusted by `adjustment` while `when` is selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule<S> {
    pub stat: S,
    pub when: Selector,
    pub adjustment: Adjustment,
}

impl<S> Rule<S> {
    pub const fn add(stat: S, when: Selector, value: f64) -> Self {
        Self {
            stat,
            when,
            adjustment: Adjustment::Add(value),
        }
    }

    pub const fn replace(stat: S, when: Selector, value: f64) -> Self {
        Self {
            stat,
            when,
            adjustment: Adjustment::Replace(value),
        }
    }

    pub const fn scale(stat: S, when: Selector, value: f64) -> Self {
        Self {
            stat,
            when,
            adjustment: Adjustment::Scale(value),
        }
    }
}

/// Combined special case: when every selector in `when` is active, `stat` takes `value`
/// instead of whatever the additive stage produced. The first matching branch wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch<S: 'static> {
    pub stat: S,
    pub when: &'static [Selector],
    pub value: f64,
}

impl<S> Branch<S> {
    pub fn matches(&self, selection: &BuildSelection) -> bool {
        self.when.iter().all(|selector| selector.is_selected(selection))
    }
}

/// Marks `stat` as altered by `when` without a numeric rule (the effect is computed by a
/// metric formula, e.g. a conditional damage multiplier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<S> {
    pub stat: S,
    pub when: Selector,
}

impl<S> Marker<S> {
    pub const fn new(stat: S, when: Selector) -> Self {
        Self { stat, when }
    }
}

/// Accumulated adjustments for one stat under one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentTotals {
    additions: Vec<f64>,
    pub replacement: Option<f64>,
    pub scale: f64,
}

impl Default for AdjustmentTotals {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjustmentTotals {
    pub fn new() -> Self {
        Self {
            additions: Vec::new(),
            replacement: None,
            scale: 1.0,
        }
    }

    pub fn apply(&mut self, adjustment: Adjustment) {
        match adjustment {
            Adjustment::Add(value) => self.additions.push(value),
            Adjustment::Replace(value) => self.replacement = Some(value),
            Adjustment::Scale(value) => self.scale *= value,
        }
    }

    /// Sum of additive adjustments, taken in value order so the result does not depend on
    /// the order rules were declared or matched in.
    pub fn additive(&self) -> f64 {
        let mut sorted = self.additions.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.into_iter().sum()
    }

    pub fn compose(&self, base: f64) -> f64 {
        let added = base + self.additive();
        self.replacement.unwrap_or(added) * self.scale
    }
}

/// Per-weapon adjustment table over a stat key type `S`.
#[derive(Debug, Clone, Copy)]
pub struct StatTable<'a, S: 'static> {
    pub rules: &'a [Rule<S>],
    pub branches: &'a [Branch<S>],
    pub markers: &'a [Marker<S>],
}

impl<'a, S: Copy + PartialEq> StatTable<'a, S> {
    pub const fn new(
        rules: &'a [Rule<S>],
        branches: &'a [Branch<S>],
        markers: &'a [Marker<S>],
    ) -> Self {
        Self {
            rules,
            branches,
            markers,
        }
    }

    pub fn totals_for(&self, stat: S, selection: &BuildSelection) -> AdjustmentTotals {
        let mut totals = AdjustmentTotals::new();
        for rule in self.active_rules(stat, selection) {
            totals.apply(rule.adjustment);
        }
        if let Some(branch) = self
            .branches
            .iter()
            .find(|branch| branch.stat == stat && branch.matches(selection))
        {
            totals.replacement = Some(branch.value);
        }
        totals
    }

    /// Resolves `stat` from its baseline value.
    pub fn resolve(&self, stat: S, base: f64, selection: &BuildSelection) -> f64 {
        self.totals_for(stat, selection).compose(base)
    }

    /// Only the additive stage, for formulas that must avoid a later multiplier.
    pub fn resolve_additive(&self, stat: S, base: f64, selection: &BuildSelection) -> f64 {
        let mut totals = AdjustmentTotals::new();
        for rule in self.active_rules(stat, selection) {
            if let Adjustment::Add(value) = rule.adjustment {
                totals.apply(Adjustment::Add(value));
            }
        }
        base + totals.additive()
    }

    /// Whether any declared influence on `stat` is currently selected.
    pub fn is_modified(&self, stat: S, selection: &BuildSelection) -> bool {
        self.influences(stat)
            .any(|selector| selector.is_selected(selection))
            || self
                .branches
                .iter()
                .any(|branch| branch.stat == stat && branch.matches(selection))
    }

    /// Every selector that can alter `stat`.
    pub fn influences(&self, stat: S) -> impl Iterator<Item = Selector> + '_ {
        self.rules
            .iter()
            .filter(move |rule| rule.stat == stat)
            .map(|rule| rule.when)
            .chain(
                self.markers
                    .iter()
                    .filter(move |marker| marker.stat == stat)
                    .map(|marker| marker.when),
            )
    }

    /// Rules and markers contributed by one option, for describing its effect.
    pub fn effects_of(&self, selector: Selector) -> Vec<Effect<S>> {
        self.rules
            .iter()
            .filter(|rule| rule.when == selector)
            .map(|rule| Effect {
                stat: rule.stat,
                adjustment: Some(rule.adjustment),
            })
            .chain(
                self.markers
                    .iter()
                    .filter(|marker| marker.when == selector)
                    .map(|marker| Effect {
                        stat: marker.stat,
                        adjustment: None,
                    }),
            )
            .collect()
    }

    fn active_rules<'s>(
        &'s self,
        stat: S,
        selection: &'s BuildSelection,
    ) -> impl Iterator<Item = &'s Rule<S>> + 's {
        self.rules
            .iter()
            .filter(move |rule| rule.stat == stat && rule.when.is_selected(selection))
    }
}

/// Serializable description of what one option does to one stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Effect<S> {
    pub stat: S,
    /// `None` for behavior computed by a metric formula rather than a table rule.
    #[serde(flatten)]
    pub adjustment: Option<Adjustment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    enum Stat {
        Damage,
        Spread,
    }

    const T1A: Selector = Selector::tier(1, 0);
    const T2A: Selector = Selector::tier(2, 0);
    const OC1: Selector = Selector::overclock(1);
    const OC2: Selector = Selector::overclock(2);

    static RULES: [Rule<Stat>; 6] = [
        Rule::add(Stat::Damage, T1A, 3.0),
        Rule::add(Stat::Damage, OC2, -6.0),
        Rule::scale(Stat::Damage, OC1, 0.5),
        Rule::replace(Stat::Damage, OC1, 40.0),
        Rule::add(Stat::Spread, T2A, -0.3),
        Rule::add(Stat::Spread, OC2, -0.3),
    ];
    static BRANCHES: [Branch<Stat>; 1] = [Branch {
        stat: Stat::Spread,
        when: &[T2A, OC2],
        value: 0.5,
    }];
    static MARKERS: [Marker<Stat>; 0] = [];

    fn table() -> StatTable<'static, Stat> {
        StatTable::new(&RULES, &BRANCHES, &MARKERS)
    }

    fn selection(t1: Option<u8>, t2: Option<u8>, oc: Option<u8>) -> BuildSelection {
        BuildSelection::new([t1, t2, None, None, None], oc)
    }

    #[test]
    fn tier_and_overclock_additions_both_apply() {
        let resolved = table().resolve(Stat::Damage, 14.0, &selection(Some(0), None, Some(2)));
        assert_eq!(resolved, 11.0);
    }

    #[test]
    fn replace_happens_before_scale() {
        let resolved = table().resolve(Stat::Damage, 14.0, &selection(Some(0), None, Some(1)));
        assert_eq!(resolved, 20.0);
    }

    #[test]
    fn combined_branch_overrides_stacked_additions() {
        let both = table().resolve(Stat::Spread, 1.0, &selection(None, Some(0), Some(2)));
        let tier_only = table().resolve(Stat::Spread, 1.0, &selection(None, Some(0), None));
        assert_eq!(both, 0.5);
        assert!((tier_only - 0.7).abs() < 1e-12);
    }

    #[test]
    fn unselected_build_is_baseline() {
        let baseline = BuildSelection::baseline();
        assert_eq!(table().resolve(Stat::Damage, 14.0, &baseline), 14.0);
        assert!(!table().is_modified(Stat::Damage, &baseline));
    }

    #[test]
    fn additive_stage_ignores_replace_and_scale() {
        let value = table().resolve_additive(Stat::Damage, 14.0, &selection(Some(0), None, Some(1)));
        assert_eq!(value, 17.0);
    }

    #[test]
    fn effects_describe_one_option() {
        let effects = table().effects_of(OC2);
        assert_eq!(effects.len(), 2);
        let json = serde_json::to_string(&effects).expect("serializable");
        assert_eq!(
            json,
            r#"[{"stat":"Damage","op":"add","value":-6.0},{"stat":"Spread","op":"add","value":-0.3}]"#
        );
    }
}
