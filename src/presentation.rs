//! Display-ready stat rows with an "altered by the current build" flag.

use std::fmt;

use serde::Serialize;

use crate::metrics::round_to;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StatValue {
    Number(f64),
    /// Fraction shown as a percentage (0.7 is "70%").
    Percent(f64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", round_to(*value, 2)),
            Self::Percent(value) => write!(f, "{}%", round_to(value * 100.0, 0)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    pub label: &'static str,
    pub value: StatValue,
    /// Opaque icon key.
    pub icon: &'static str,
    pub modified: bool,
    /// Rows for optional mechanics are hidden until a selection enables them.
    pub shown_only_when_modified: bool,
}

impl StatsRow {
    pub fn number(label: &'static str, value: f64, icon: &'static str, modified: bool) -> Self {
        Self {
            label,
            value: StatValue::Number(value),
            icon,
            modified,
            shown_only_when_modified: false,
        }
    }

    pub fn percent(label: &'static str, value: f64, icon: &'static str, modified: bool) -> Self {
        Self {
            label,
            value: StatValue::Percent(value),
            icon,
            modified,
            shown_only_when_modified: false,
        }
    }

    pub fn text(label: &'static str, value: &str, icon: &'static str, modified: bool) -> Self {
        Self {
            label,
            value: StatValue::Text(value.to_string()),
            icon,
            modified,
            shown_only_when_modified: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.shown_only_when_modified = true;
        self
    }

    pub fn is_visible(&self) -> bool {
        !self.shown_only_when_modified || self.modified
    }
}

/// Plain-text table of the visible rows, modified rows marked with `*`.
pub fn render_table(rows: &[StatsRow]) -> String {
    let width = rows
        .iter()
        .filter(|row| row.is_visible())
        .map(|row| row.label.len())
        .max()
        .unwrap_or(0);
    rows.iter()
        .filter(|row| row.is_visible())
        .map(|row| {
            let marker = if row.modified { "*" } else { " " };
            format!("{marker} {:<width$}  {}\n", row.label, row.value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_format_for_display() {
        assert_eq!(StatValue::Number(4.6666).to_string(), "4.67");
        assert_eq!(StatValue::Percent(0.7).to_string(), "70%");
        assert_eq!(StatValue::Text("33%".to_string()).to_string(), "33%");
    }

    #[test]
    fn optional_rows_hide_until_modified() {
        let rows = vec![
            StatsRow::number("Damage:", 14.0, "direct_damage", false),
            StatsRow::percent("Armor Breaking:", 1.0, "armor_breaking", false).optional(),
            StatsRow::text("Fear Chance:", "50%", "fear", true).optional(),
        ];
        let table = render_table(&rows);
        assert!(table.contains("Damage:"));
        assert!(!table.contains("Armor Breaking:"));
        assert!(table.contains("* Fear Chance:"));
    }

    #[test]
    fn rows_serialize_with_tagged_value() {
        let row = StatsRow::percent("Base Spread:", 0.5, "base_spread", true);
        let json = serde_json::to_value(&row).expect("serializable");
        assert_eq!(json["value"]["kind"], "percent");
        assert_eq!(json["value"]["value"], 0.5);
    }
}
