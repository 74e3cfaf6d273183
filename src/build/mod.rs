//! Build configuration: the five tier choices plus the overclock choice, their textual
//! encoding, and change notification.

pub mod diagnostics;
pub mod encoding;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, TIER_COUNT};

pub use diagnostics::{BuildDiagnostic, LengthMismatch, ValidationReport};
pub use encoding::{decode, encode, validate_combination, COMBINATION_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid build combination '{combination}': {report}")]
    InvalidCombination {
        combination: String,
        report: ValidationReport,
    },
    #[error("tier {tier} has {arity} options, index {index} is out of range")]
    TierIndexOutOfRange { tier: usize, index: u8, arity: usize },
    #[error("overclock index {index} is out of range, weapon has {count} overclocks")]
    OverclockIndexOutOfRange { index: u8, count: usize },
    #[error("unknown weapon '{0}'")]
    UnknownWeapon(String),
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Selected option index per tier and for the overclock slot; `None` means unselected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildSelection {
    tiers: [Option<u8>; TIER_COUNT],
    overclock: Option<u8>,
}

impl BuildSelection {
    /// Everything unselected.
    pub const fn baseline() -> Self {
        Self {
            tiers: [None; TIER_COUNT],
            overclock: None,
        }
    }

    /// Unchecked constructor; see [BuildSelection::validated] for the catalog check.
    pub const fn new(tiers: [Option<u8>; TIER_COUNT], overclock: Option<u8>) -> Self {
        Self { tiers, overclock }
    }

    /// Builds a selection and rejects indices outside the catalog's ranges.
    pub fn validated(
        catalog: &Catalog,
        tiers: [Option<u8>; TIER_COUNT],
        overclock: Option<u8>,
    ) -> BuildResult<Self> {
        let selection = Self::new(tiers, overclock);
        selection.check(catalog)?;
        Ok(selection)
    }

    pub fn check(&self, catalog: &Catalog) -> BuildResult<()> {
        for (slot, choice) in self.tiers.iter().enumerate() {
            let tier = slot + 1;
            let arity = catalog.tier_arity(tier);
            if let Some(index) = *choice {
                if usize::from(index) >= arity {
                    return Err(BuildError::TierIndexOutOfRange { tier, index, arity });
                }
            }
        }
        if let Some(index) = self.overclock {
            let count = catalog.overclock_count();
            if usize::from(index) >= count {
                return Err(BuildError::OverclockIndexOutOfRange { index, count });
            }
        }
        Ok(())
    }

    pub const fn tiers(&self) -> [Option<u8>; TIER_COUNT] {
        self.tiers
    }

    /// Choice in a 1-based tier.
    pub fn tier(&self, tier: usize) -> Option<u8> {
        tier.checked_sub(1)
            .and_then(|slot| self.tiers.get(slot))
            .copied()
            .flatten()
    }

    pub const fn overclock(&self) -> Option<u8> {
        self.overclock
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::baseline()
    }
}

/// Payload delivered to observers after a successful build change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildChanged {
    pub previous: BuildSelection,
    pub current: BuildSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

type Callback = Box<dyn FnMut(&BuildChanged)>;

/// Registered change callbacks, invoked in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: usize,
    callbacks: Vec<(ObserverId, Callback)>,
}

impl Observers {
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&BuildChanged) + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn notify(&mut self, event: &BuildChanged) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

/// Every valid selection for a catalog, including partially and fully unselected builds.
pub fn all_selections(catalog: &Catalog) -> Vec<BuildSelection> {
    let choices = |count: usize| -> Vec<Option<u8>> {
        std::iter::once(None)
            .chain((0..count as u8).map(Some))
            .collect()
    };

    let mut selections = vec![BuildSelection::baseline()];
    for slot in 0..TIER_COUNT {
        let options = choices(catalog.tier_arity(slot + 1));
        selections = selections
            .iter()
            .flat_map(|partial| {
                options.iter().map(move |choice| {
                    let mut next = *partial;
                    next.tiers[slot] = *choice;
                    next
                })
            })
            .collect();
    }
    let overclocks = choices(catalog.overclock_count());
    selections
        .iter()
        .flat_map(|partial| {
            overclocks.iter().map(move |choice| {
                let mut next = *partial;
                next.overclock = *choice;
                next
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::weapons::zhukov::CATALOG;

    #[test]
    fn tier_lookup_is_one_based() {
        let selection = BuildSelection::new([Some(1), None, None, None, Some(0)], None);
        assert_eq!(selection.tier(1), Some(1));
        assert_eq!(selection.tier(5), Some(0));
        assert_eq!(selection.tier(0), None);
        assert_eq!(selection.tier(6), None);
    }

    #[test]
    fn validated_rejects_third_option_in_two_option_tier() {
        let err = BuildSelection::validated(&CATALOG, [Some(2), None, None, None, None], None)
            .expect_err("zhukov tier 1 has two options");
        assert_eq!(
            err,
            BuildError::TierIndexOutOfRange {
                tier: 1,
                index: 2,
                arity: 2
            }
        );
    }

    #[test]
    fn validated_rejects_overclock_past_catalog() {
        let err = BuildSelection::validated(&CATALOG, [None; TIER_COUNT], Some(5))
            .expect_err("zhukov has five overclocks");
        assert_eq!(err, BuildError::OverclockIndexOutOfRange { index: 5, count: 5 });
    }

    #[test]
    fn all_selections_counts_every_combination() {
        // (2+1)(3+1)(2+1)(3+1)(2+1) tiers times (5+1) overclocks
        assert_eq!(all_selections(&CATALOG).len(), 3 * 4 * 3 * 4 * 3 * 6);
        assert!(all_selections(&CATALOG)
            .iter()
            .all(|selection| selection.check(&CATALOG).is_ok()));
    }

    #[test]
    fn observers_can_unsubscribe() {
        let hits = Rc::new(Cell::new(0));
        let mut observers = Observers::default();
        let counter = Rc::clone(&hits);
        let id = observers.subscribe(move |_| counter.set(counter.get() + 1));
        let event = BuildChanged {
            previous: BuildSelection::baseline(),
            current: BuildSelection::baseline(),
        };

        observers.notify(&event);
        assert!(observers.unsubscribe(id));
        observers.notify(&event);

        assert_eq!(hits.get(), 1);
        assert!(observers.is_empty());
    }
}
