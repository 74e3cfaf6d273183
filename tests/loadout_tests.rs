use std::cell::RefCell;
use std::rc::Rc;

use armory::build::BuildChanged;
use armory::model::{Environment, StatusEffectContext};
use armory::weapons::{Loadout, Weapon, WeaponKind};

#[test]
fn observers_see_each_committed_change() {
    let mut loadout = Loadout::new(WeaponKind::Autocannon);
    let seen = Rc::new(RefCell::new(Vec::<BuildChanged>::new()));
    let sink = Rc::clone(&seen);
    loadout.subscribe(move |event| sink.borrow_mut().push(*event));

    loadout.apply_combination("A-----").expect("valid build");
    loadout.apply_combination("nonsense").expect_err("rejected");
    loadout.apply_combination("A-B-A3").expect("valid build");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].previous, seen[0].current);
    assert_eq!(loadout.combination(), "A-B-A3");
}

#[test]
fn loadout_metrics_match_direct_evaluation() {
    let env = Environment::default();
    let context = StatusEffectContext::default();
    let mut loadout = Loadout::new(WeaponKind::Minigun);
    loadout.apply_combination("B-A-C2").expect("valid build");

    let selection = loadout.selection();
    let weapon = WeaponKind::Minigun.weapon();
    assert_eq!(loadout.metrics(&context, &env), weapon.metrics(&selection, &context, &env));
    assert_eq!(loadout.stats(&env), weapon.stats(&selection, &env));
    assert_eq!(loadout.derived(), weapon.derived(&selection));
}

#[test]
fn reapplying_the_same_build_still_notifies() {
    let mut loadout = Loadout::new(WeaponKind::Zhukov);
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    loadout.subscribe(move |_| *sink.borrow_mut() += 1);

    loadout.apply_combination("------").expect("baseline");
    loadout.apply_combination("------").expect("baseline");
    assert_eq!(*count.borrow(), 2);
}
