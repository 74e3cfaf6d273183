use armory::build::{BuildError, BuildSelection};
use armory::weapons::{Weapon, WeaponKind};

#[test]
fn combination_decodes_to_tier_indices() {
    let weapon = WeaponKind::Autocannon.weapon();
    let selection = weapon.decode("A-B-A3").expect("valid autocannon build");

    assert_eq!(selection.tier(1), Some(0));
    assert_eq!(selection.tier(2), None);
    assert_eq!(selection.tier(3), Some(1));
    assert_eq!(selection.tier(4), None);
    assert_eq!(selection.tier(5), Some(0));
    assert_eq!(selection.overclock(), Some(2));
    assert_eq!(weapon.encode(&selection), "A-B-A3");
}

#[test]
fn baseline_is_all_dashes() {
    for kind in WeaponKind::ALL {
        let weapon = kind.weapon();
        assert_eq!(weapon.encode(&BuildSelection::baseline()), "------");
        assert!(weapon.decode("------").expect("baseline decodes").is_baseline());
    }
}

#[test]
fn every_bad_position_is_reported() {
    let report = WeaponKind::Zhukov.weapon().validate("CZ---9");
    assert!(report.has_errors());
    assert!(report.length.is_none());
    assert_eq!(report.positions(), vec![0, 1, 5]);
    assert_eq!(report.diagnostics[0].found, Some('C'));
}

#[test]
fn wrong_length_is_reported_alongside_symbols() {
    let report = WeaponKind::Minigun.weapon().validate("AB");
    let length = report.length.expect("too short");
    assert_eq!(length.expected, 6);
    assert_eq!(length.found, 2);
    // the four missing positions are listed as well
    assert_eq!(report.positions(), vec![2, 3, 4, 5]);
    assert!(report.diagnostics.iter().all(|diag| diag.found.is_none()));
}

#[test]
fn decode_rejects_whole_string() {
    let err = WeaponKind::Flamethrower
        .weapon()
        .decode("A----8")
        .expect_err("flamethrower has six overclocks");
    match err {
        BuildError::InvalidCombination { combination, report } => {
            assert_eq!(combination, "A----8");
            assert_eq!(report.positions(), vec![5]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_weapon_name_is_an_error() {
    let err = "railgun".parse::<WeaponKind>().expect_err("not in the roster");
    assert_eq!(err, BuildError::UnknownWeapon("railgun".to_string()));
    assert_eq!(" Zhukov ".parse::<WeaponKind>(), Ok(WeaponKind::Zhukov));
}
