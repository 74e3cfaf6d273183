use armory::build::BuildSelection;
use armory::catalog::TIER_COUNT;
use armory::resolve::AdjustmentTotals;
use armory::weapons::{Weapon, WeaponKind};
use proptest::prelude::*;

/// Folds raw bytes into a selection that is in range for `kind`.
fn in_range_selection(kind: WeaponKind, raw_tiers: [u8; TIER_COUNT], raw_overclock: u8) -> BuildSelection {
    let catalog = kind.weapon().catalog();
    let pick = |raw: u8, count: usize| {
        let choice = usize::from(raw) % (count + 1);
        (choice < count).then_some(choice as u8)
    };
    let mut tiers = [None; TIER_COUNT];
    for (slot, raw) in raw_tiers.into_iter().enumerate() {
        tiers[slot] = pick(raw, catalog.tier_arity(slot + 1));
    }
    BuildSelection::new(tiers, pick(raw_overclock, catalog.overclock_count()))
}

proptest! {
    #[test]
    fn encoded_builds_decode_to_themselves(
        weapon in 0usize..4,
        raw_tiers in prop::array::uniform5(any::<u8>()),
        raw_overclock in any::<u8>(),
    ) {
        let kind = WeaponKind::ALL[weapon];
        let weapon = kind.weapon();
        let selection = in_range_selection(kind, raw_tiers, raw_overclock);

        let text = weapon.encode(&selection);
        prop_assert_eq!(text.chars().count(), 6);
        prop_assert!(!weapon.validate(&text).has_errors());
        let decoded = weapon.decode(&text).expect("encoded build is valid");
        prop_assert_eq!(decoded, selection);
        prop_assert_eq!(weapon.encode(&decoded), text);
    }

    #[test]
    fn additive_adjustments_commute(
        values in prop::collection::vec(-50.0f64..50.0, 0..8),
        base in -100.0f64..100.0,
    ) {
        let mut forward = AdjustmentTotals::new();
        for value in &values {
            forward.apply(armory::resolve::Adjustment::Add(*value));
        }
        let mut backward = AdjustmentTotals::new();
        for value in values.iter().rev() {
            backward.apply(armory::resolve::Adjustment::Add(*value));
        }
        prop_assert_eq!(forward.compose(base), backward.compose(base));
    }

    #[test]
    fn replacement_ignores_additions(
        values in prop::collection::vec(-50.0f64..50.0, 0..8),
        replacement in -10.0f64..10.0,
        scale in 0.1f64..4.0,
    ) {
        let mut totals = AdjustmentTotals::new();
        for value in &values {
            totals.apply(armory::resolve::Adjustment::Add(*value));
        }
        totals.apply(armory::resolve::Adjustment::Replace(replacement));
        totals.apply(armory::resolve::Adjustment::Scale(scale));
        prop_assert_eq!(totals.compose(123.0), replacement * scale);
    }
}
