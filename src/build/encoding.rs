//! Fixed-length textual build encoding: one letter per tier ('A'.., '-' for none) followed by
//! one overclock digit ('1'.., '-' for none). `"A-B-A3"` is tiers {A,-,B,-,A} with overclock 3.

use crate::catalog::{overclock_digit, tier_letter, Catalog, TIER_COUNT};

use super::diagnostics::{LengthMismatch, ValidationReport};
use super::{BuildError, BuildResult, BuildSelection};

pub const UNSELECTED_SYMBOL: char = '-';

/// Length of every valid combination string.
pub const COMBINATION_LENGTH: usize = TIER_COUNT + 1;

pub fn encode(selection: &BuildSelection) -> String {
    let mut text = String::with_capacity(COMBINATION_LENGTH);
    for choice in selection.tiers() {
        text.push(choice.map_or(UNSELECTED_SYMBOL, tier_letter));
    }
    text.push(selection.overclock().map_or(UNSELECTED_SYMBOL, overclock_digit));
    text
}

/// Checks every position of `text` against the catalog and reports all problems at once.
pub fn validate_combination(catalog: &Catalog, text: &str) -> ValidationReport {
    let symbols: Vec<char> = text.chars().collect();
    let mut report = ValidationReport::default();

    if symbols.len() != COMBINATION_LENGTH {
        report.length = Some(LengthMismatch {
            expected: COMBINATION_LENGTH,
            found: symbols.len(),
        });
    }

    for position in 0..symbols.len().max(COMBINATION_LENGTH) {
        let found = symbols.get(position).copied();
        if position >= COMBINATION_LENGTH {
            report.push(position, found, "");
            continue;
        }
        let alphabet = alphabet_at(catalog, position);
        match found {
            Some(symbol) if alphabet.contains(symbol) => {}
            _ => report.push(position, found, alphabet),
        }
    }

    report
}

/// Decodes `text` into a selection without touching any existing state.
pub fn decode(catalog: &Catalog, text: &str) -> BuildResult<BuildSelection> {
    let report = validate_combination(catalog, text);
    if report.has_errors() {
        return Err(BuildError::InvalidCombination {
            combination: text.to_string(),
            report,
        });
    }

    let mut tiers = [None; TIER_COUNT];
    let mut overclock = None;
    for (position, symbol) in text.chars().enumerate() {
        if symbol == UNSELECTED_SYMBOL {
            continue;
        }
        if position < TIER_COUNT {
            tiers[position] = Some(symbol as u8 - b'A');
        } else {
            overclock = Some(symbol as u8 - b'1');
        }
    }
    Ok(BuildSelection::new(tiers, overclock))
}

fn alphabet_at(catalog: &Catalog, position: usize) -> String {
    if position < TIER_COUNT {
        catalog.tier_alphabet(position + 1)
    } else {
        catalog.overclock_alphabet()
    }
}
