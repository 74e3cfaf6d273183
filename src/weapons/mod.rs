//! The closed set of weapon variants and their shared capability interface.

pub mod autocannon;
pub mod flamethrower;
pub mod loadout;
pub mod minigun;
pub mod zhukov;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::build::{
    decode, encode, validate_combination, BuildError, BuildResult, BuildSelection,
    ValidationReport,
};
use crate::catalog::Catalog;
use crate::metrics::MetricsReport;
use crate::model::{Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::resolve::Selector;

pub use loadout::Loadout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Autocannon,
    Minigun,
    Flamethrower,
    Zhukov,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Autocannon,
        WeaponKind::Minigun,
        WeaponKind::Flamethrower,
        WeaponKind::Zhukov,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Autocannon => "autocannon",
            Self::Minigun => "minigun",
            Self::Flamethrower => "flamethrower",
            Self::Zhukov => "zhukov",
        }
    }

    pub fn weapon(self) -> &'static dyn Weapon {
        match self {
            Self::Autocannon => &autocannon::AUTOCANNON,
            Self::Minigun => &minigun::MINIGUN,
            Self::Flamethrower => &flamethrower::FLAMETHROWER,
            Self::Zhukov => &zhukov::ZHUKOV,
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeaponKind {
    type Err = BuildError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| BuildError::UnknownWeapon(value.to_string()))
    }
}

/// Resolved physical stats of one build, per weapon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "weapon", rename_all = "snake_case")]
pub enum DerivedStats {
    Autocannon(autocannon::Derived),
    Minigun(minigun::Derived),
    Flamethrower(flamethrower::Derived),
    Zhukov(zhukov::Derived),
}

/// Capabilities every weapon variant provides. All methods are pure functions of the
/// selection, the status context and the environment.
pub trait Weapon: Sync {
    fn kind(&self) -> WeaponKind;

    fn full_name(&self) -> &'static str;

    /// Owning character class.
    fn class_name(&self) -> &'static str;

    fn catalog(&self) -> &'static Catalog;

    fn derived(&self, selection: &BuildSelection) -> DerivedStats;

    fn stats(&self, selection: &BuildSelection, env: &Environment) -> Vec<StatsRow>;

    fn metrics(
        &self,
        selection: &BuildSelection,
        context: &StatusEffectContext,
        env: &Environment,
    ) -> MetricsReport;

    fn deals_splash_damage(&self, selection: &BuildSelection) -> bool;

    /// JSON description of the adjustments one option contributes.
    fn effects_json(&self, selector: Selector) -> serde_json::Result<String>;

    fn encode(&self, selection: &BuildSelection) -> String {
        encode(selection)
    }

    fn decode(&self, text: &str) -> BuildResult<BuildSelection> {
        decode(self.catalog(), text)
    }

    fn validate(&self, text: &str) -> ValidationReport {
        validate_combination(self.catalog(), text)
    }
}

impl fmt::Debug for dyn Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weapon")
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Minigun".parse::<WeaponKind>(), Ok(WeaponKind::Minigun));
        assert_eq!(" zhukov ".parse::<WeaponKind>(), Ok(WeaponKind::Zhukov));
        assert_eq!(
            "shotgun".parse::<WeaponKind>(),
            Err(BuildError::UnknownWeapon("shotgun".to_string()))
        );
    }

    #[test]
    fn every_kind_resolves_to_its_weapon() {
        for kind in WeaponKind::ALL {
            assert_eq!(kind.weapon().kind(), kind);
        }
    }

    #[test]
    fn catalogs_have_expected_shapes() {
        let shape = |kind: WeaponKind| {
            let catalog = kind.weapon().catalog();
            let arities: Vec<usize> = (1..=5).map(|tier| catalog.tier_arity(tier)).collect();
            (arities, catalog.overclock_count())
        };
        assert_eq!(shape(WeaponKind::Autocannon), (vec![3, 3, 3, 2, 3], 6));
        assert_eq!(shape(WeaponKind::Minigun), (vec![3, 2, 3, 3, 3], 7));
        assert_eq!(shape(WeaponKind::Flamethrower), (vec![2, 3, 3, 3, 2], 6));
        assert_eq!(shape(WeaponKind::Zhukov), (vec![2, 3, 2, 3, 2], 5));
    }
}
