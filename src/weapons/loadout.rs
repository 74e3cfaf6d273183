//! A weapon paired with its current build. The only stateful piece of the crate: every
//! mutation is atomic and announces itself to subscribers exactly once.

use tracing::{debug, warn};

use crate::build::{
    BuildChanged, BuildResult, BuildSelection, ObserverId, Observers, ValidationReport,
};
use crate::catalog::TIER_COUNT;
use crate::metrics::MetricsReport;
use crate::model::{Environment, StatusEffectContext};
use crate::presentation::StatsRow;

use super::{DerivedStats, Weapon, WeaponKind};

#[derive(Debug)]
pub struct Loadout {
    weapon: &'static dyn Weapon,
    selection: BuildSelection,
    observers: Observers,
}

impl Loadout {
    /// Starts from the unmodified weapon.
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            weapon: kind.weapon(),
            selection: BuildSelection::baseline(),
            observers: Observers::default(),
        }
    }

    pub fn weapon(&self) -> &'static dyn Weapon {
        self.weapon
    }

    pub fn selection(&self) -> BuildSelection {
        self.selection
    }

    /// Current build as its six-character string.
    pub fn combination(&self) -> String {
        self.weapon.encode(&self.selection)
    }

    /// Replaces the build with explicit option indices. Out-of-range indices leave the
    /// current build untouched.
    pub fn apply_selection(
        &mut self,
        tiers: [Option<u8>; TIER_COUNT],
        overclock: Option<u8>,
    ) -> BuildResult<()> {
        let selection = BuildSelection::validated(self.weapon.catalog(), tiers, overclock)
            .map_err(|err| {
                warn!(weapon = %self.weapon.kind(), error = %err, "rejected build selection");
                err
            })?;
        self.commit(selection);
        Ok(())
    }

    /// Replaces the build with a decoded combination string. Any invalid symbol rejects the
    /// whole string and leaves the current build untouched.
    pub fn apply_combination(&mut self, text: &str) -> BuildResult<()> {
        let selection = self.weapon.decode(text).map_err(|err| {
            warn!(weapon = %self.weapon.kind(), combination = text, error = %err, "rejected build combination");
            err
        })?;
        self.commit(selection);
        Ok(())
    }

    pub fn is_combination_valid(&self, text: &str) -> bool {
        !self.validate(text).has_errors()
    }

    pub fn validate(&self, text: &str) -> ValidationReport {
        self.weapon.validate(text)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&BuildChanged) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn derived(&self) -> DerivedStats {
        self.weapon.derived(&self.selection)
    }

    pub fn stats(&self, env: &Environment) -> Vec<StatsRow> {
        self.weapon.stats(&self.selection, env)
    }

    pub fn metrics(&self, context: &StatusEffectContext, env: &Environment) -> MetricsReport {
        self.weapon.metrics(&self.selection, context, env)
    }

    fn commit(&mut self, selection: BuildSelection) {
        let event = BuildChanged {
            previous: self.selection,
            current: selection,
        };
        self.selection = selection;
        debug!(
            weapon = %self.weapon.kind(),
            combination = %self.combination(),
            observers = self.observers.len(),
            "build applied"
        );
        self.observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::build::BuildError;

    fn recording(loadout: &mut Loadout) -> Rc<RefCell<Vec<BuildChanged>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        loadout.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn combination_round_trips_through_loadout() {
        let mut loadout = Loadout::new(WeaponKind::Autocannon);
        assert_eq!(loadout.combination(), "------");
        loadout.apply_combination("A-B-A3").expect("valid build");
        assert_eq!(loadout.combination(), "A-B-A3");
        assert_eq!(loadout.selection().tier(3), Some(1));
    }

    #[test]
    fn successful_apply_notifies_once() {
        let mut loadout = Loadout::new(WeaponKind::Minigun);
        let events = recording(&mut loadout);

        loadout
            .apply_selection([Some(0), None, None, None, Some(2)], Some(6))
            .expect("indices in range");

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].previous.is_baseline());
        assert_eq!(events[0].current, loadout.selection());
    }

    #[test]
    fn rejected_apply_changes_nothing() {
        let mut loadout = Loadout::new(WeaponKind::Zhukov);
        loadout.apply_combination("AB---1").expect("valid build");
        let events = recording(&mut loadout);

        let err = loadout
            .apply_selection([Some(2), None, None, None, None], None)
            .expect_err("zhukov tier 1 has two options");
        assert_eq!(
            err,
            BuildError::TierIndexOutOfRange {
                tier: 1,
                index: 2,
                arity: 2
            }
        );
        assert!(loadout.apply_combination("C-----").is_err());

        assert_eq!(loadout.combination(), "AB---1");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let mut loadout = Loadout::new(WeaponKind::Flamethrower);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = loadout.subscribe(move |_| *sink.borrow_mut() += 1);

        loadout.apply_combination("A-----").expect("valid build");
        assert!(loadout.unsubscribe(id));
        loadout.apply_combination("B-----").expect("valid build");

        assert_eq!(*count.borrow(), 1);
        assert!(!loadout.unsubscribe(id));
    }

    #[test]
    fn validity_check_does_not_mutate() {
        let loadout = Loadout::new(WeaponKind::Flamethrower);
        assert!(loadout.is_combination_valid("BCA-B6"));
        assert!(!loadout.is_combination_valid("C-----"));
        assert!(loadout.selection().is_baseline());
    }
}
