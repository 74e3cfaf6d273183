//! Static upgrade catalogs: the selectable modifier options per tier and the overclock slot.
//!
//! Catalogs are built once as `static` tables inside each weapon module and never mutated.

use std::fmt;

use serde::Serialize;

/// Number of modifier tiers every weapon carries.
pub const TIER_COUNT: usize = 5;

/// Resource-cost classification of an overclock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Clean,
    Balanced,
    Unstable,
}

impl Classification {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Balanced => "Balanced",
            Self::Unstable => "Unstable",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unlock cost: credits followed by the six crafting minerals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostVector {
    pub credits: u32,
    pub magnite: u32,
    pub bismor: u32,
    pub umanite: u32,
    pub croppa: u32,
    pub enor_pearl: u32,
    pub jadiz: u32,
}

impl CostVector {
    /// Minerals in column order: magnite, bismor, umanite, croppa, enor pearl, jadiz.
    pub const fn new(credits: u32, minerals: [u32; 6]) -> Self {
        Self {
            credits,
            magnite: minerals[0],
            bismor: minerals[1],
            umanite: minerals[2],
            croppa: minerals[3],
            enor_pearl: minerals[4],
            jadiz: minerals[5],
        }
    }
}

/// One choice within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModifierOption {
    /// 1-based tier number.
    pub tier: u8,
    /// 0-based position inside the tier.
    pub index: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub cost: CostVector,
}

impl ModifierOption {
    pub const fn new(
        tier: u8,
        index: u8,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        cost: CostVector,
    ) -> Self {
        Self {
            tier,
            index,
            name,
            description,
            icon,
            cost,
        }
    }

    /// Symbol used in the build encoding ('A', 'B', 'C').
    pub fn letter(&self) -> char {
        tier_letter(self.index)
    }
}

/// One choice in the overclock slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverclockOption {
    pub index: u8,
    pub classification: Classification,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub cost: CostVector,
}

impl OverclockOption {
    pub const fn new(
        index: u8,
        classification: Classification,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        cost: CostVector,
    ) -> Self {
        Self {
            index,
            classification,
            name,
            description,
            icon,
            cost,
        }
    }

    /// Symbol used in the build encoding ('1'..'N').
    pub fn shortcut(&self) -> char {
        overclock_digit(self.index)
    }
}

pub fn tier_letter(index: u8) -> char {
    char::from(b'A' + index)
}

pub fn overclock_digit(index: u8) -> char {
    char::from(b'1' + index)
}

/// Full upgrade catalog of one weapon.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub tiers: [&'static [ModifierOption]; TIER_COUNT],
    pub overclocks: &'static [OverclockOption],
}

impl Catalog {
    /// Number of options in a 1-based tier; 0 for tiers that do not exist.
    pub fn tier_arity(&self, tier: usize) -> usize {
        tier.checked_sub(1)
            .and_then(|slot| self.tiers.get(slot))
            .map_or(0, |options| options.len())
    }

    pub fn overclock_count(&self) -> usize {
        self.overclocks.len()
    }

    pub fn modifier(&self, tier: usize, index: u8) -> Option<&'static ModifierOption> {
        let options = self.tiers.get(tier.checked_sub(1)?)?;
        options.get(usize::from(index))
    }

    pub fn overclock(&self, index: u8) -> Option<&'static OverclockOption> {
        self.overclocks.get(usize::from(index))
    }

    /// Valid tier symbols for a 1-based tier, including '-'.
    pub fn tier_alphabet(&self, tier: usize) -> String {
        let arity = self.tier_arity(tier);
        (0..arity as u8)
            .map(tier_letter)
            .chain(std::iter::once('-'))
            .collect()
    }

    /// Valid overclock symbols, including '-'.
    pub fn overclock_alphabet(&self) -> String {
        (0..self.overclock_count() as u8)
            .map(overclock_digit)
            .chain(std::iter::once('-'))
            .collect()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &'static ModifierOption> + '_ {
        self.tiers.iter().flat_map(|options| options.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_COST: CostVector = CostVector::new(0, [0; 6]);

    static TIER_A: [ModifierOption; 2] = [
        ModifierOption::new(1, 0, "First", "", "", NO_COST),
        ModifierOption::new(1, 1, "Second", "", "", NO_COST),
    ];
    static TIER_B: [ModifierOption; 3] = [
        ModifierOption::new(2, 0, "First", "", "", NO_COST),
        ModifierOption::new(2, 1, "Second", "", "", NO_COST),
        ModifierOption::new(2, 2, "Third", "", "", NO_COST),
    ];
    static OCS: [OverclockOption; 2] = [
        OverclockOption::new(0, Classification::Clean, "One", "", "", NO_COST),
        OverclockOption::new(1, Classification::Unstable, "Two", "", "", NO_COST),
    ];

    fn catalog() -> Catalog {
        Catalog {
            tiers: [&TIER_A, &TIER_B, &TIER_A, &TIER_B, &TIER_A],
            overclocks: &OCS,
        }
    }

    #[test]
    fn alphabets_follow_arity() {
        let catalog = catalog();
        assert_eq!(catalog.tier_alphabet(1), "AB-");
        assert_eq!(catalog.tier_alphabet(2), "ABC-");
        assert_eq!(catalog.overclock_alphabet(), "12-");
    }

    #[test]
    fn lookups_reject_out_of_range() {
        let catalog = catalog();
        assert_eq!(catalog.tier_arity(0), 0);
        assert_eq!(catalog.tier_arity(6), 0);
        assert!(catalog.modifier(1, 2).is_none());
        assert_eq!(catalog.modifier(2, 2).map(|m| m.letter()), Some('C'));
        assert_eq!(catalog.overclock(1).map(|o| o.shortcut()), Some('2'));
        assert!(catalog.overclock(2).is_none());
    }
}
