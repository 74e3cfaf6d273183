//! Flattens every weapon's catalog into CSV rows for external tooling: one row per tier
//! modifier and per overclock, with costs and a JSON summary of the option's effects.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::resolve::Selector;
use crate::weapons::Weapon;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to describe effects: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Modifier,
    Overclock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub weapon: &'static str,
    pub kind: RecordKind,
    /// Tier number for modifiers, classification for overclocks.
    pub slot: String,
    /// Letter for modifiers, digit for overclocks.
    pub symbol: char,
    pub name: &'static str,
    pub description: &'static str,
    pub credits: u32,
    pub magnite: u32,
    pub bismor: u32,
    pub umanite: u32,
    pub croppa: u32,
    pub enor_pearl: u32,
    pub jadiz: u32,
    pub effect: String,
    pub icon: &'static str,
}

/// Modifier rows in tier order followed by overclock rows.
pub fn records_for(weapon: &dyn Weapon) -> Result<Vec<ExportRecord>, ExportError> {
    let catalog = weapon.catalog();
    let name = weapon.kind().as_str();
    let mut records = Vec::new();

    for option in catalog.modifiers() {
        let cost = option.cost;
        records.push(ExportRecord {
            weapon: name,
            kind: RecordKind::Modifier,
            slot: option.tier.to_string(),
            symbol: option.letter(),
            name: option.name,
            description: option.description,
            credits: cost.credits,
            magnite: cost.magnite,
            bismor: cost.bismor,
            umanite: cost.umanite,
            croppa: cost.croppa,
            enor_pearl: cost.enor_pearl,
            jadiz: cost.jadiz,
            effect: weapon.effects_json(Selector::tier(option.tier, option.index))?,
            icon: option.icon,
        });
    }

    for option in catalog.overclocks {
        let cost = option.cost;
        records.push(ExportRecord {
            weapon: name,
            kind: RecordKind::Overclock,
            slot: option.classification.as_str().to_string(),
            symbol: option.shortcut(),
            name: option.name,
            description: option.description,
            credits: cost.credits,
            magnite: cost.magnite,
            bismor: cost.bismor,
            umanite: cost.umanite,
            croppa: cost.croppa,
            enor_pearl: cost.enor_pearl,
            jadiz: cost.jadiz,
            effect: weapon.effects_json(Selector::overclock(option.index))?,
            icon: option.icon,
        });
    }

    Ok(records)
}

/// Writes a header row then one row per record.
pub fn write_csv<W: Write>(records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(weapon: &dyn Weapon, path: &Path) -> Result<usize, ExportError> {
    let records = records_for(weapon)?;
    write_csv(&records, File::create(path)?)?;
    info!(
        weapon = %weapon.kind(),
        rows = records.len(),
        path = %path.display(),
        "exported catalog"
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::WeaponKind;

    #[test]
    fn one_record_per_option() {
        let records = records_for(WeaponKind::Minigun.weapon()).expect("exportable");
        // 14 modifiers and 7 overclocks
        assert_eq!(records.len(), 21);
        assert_eq!(records[0].slot, "1");
        assert_eq!(records[0].symbol, 'A');
        assert_eq!(records[20].kind, RecordKind::Overclock);
        assert_eq!(records[20].symbol, '7');
        assert_eq!(records[20].slot, "Unstable");
    }

    #[test]
    fn effect_column_describes_adjustments() {
        let records = records_for(WeaponKind::Zhukov.weapon()).expect("exportable");
        let high_velocity = records
            .iter()
            .find(|record| record.name == "High Velocity Rounds")
            .expect("tier 1 option");
        let effects: serde_json::Value =
            serde_json::from_str(&high_velocity.effect).expect("effect is json");
        assert_eq!(effects[0]["stat"], "direct_damage");
        assert_eq!(effects[0]["value"], 1.0);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let records = records_for(WeaponKind::Flamethrower.weapon()).expect("exportable");
        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer).expect("csv written");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("weapon,kind,slot,symbol,name,description,credits,magnite,bismor,umanite,croppa,enor_pearl,jadiz,effect,icon")
        );
        assert_eq!(text.lines().count(), records.len() + 1);
    }
}
