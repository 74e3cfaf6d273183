use serde::{Deserialize, Serialize};

use crate::config::CombatConstants;

/// Environmental conditions applied to a single DPS evaluation. Owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusEffectContext {
    pub frozen: bool,
    pub electrocuted: bool,
    pub slow_field: bool,
    pub damage_amplified: bool,
}

impl StatusEffectContext {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Multiplier on direct damage from the frozen and amplified flags.
    pub fn direct_multiplier(&self, constants: &CombatConstants) -> f64 {
        let mut multiplier = 1.0;
        if self.frozen {
            multiplier *= constants.frozen_damage_multiplier;
        }
        if self.damage_amplified {
            multiplier *= constants.amplified_damage_multiplier;
        }
        multiplier
    }

    /// Frozen targets take no extra area damage.
    pub fn area_multiplier(&self, constants: &CombatConstants) -> f64 {
        if self.damage_amplified {
            constants.amplified_damage_multiplier
        } else {
            1.0
        }
    }

    pub fn active_flags(&self) -> Vec<&'static str> {
        [
            (self.frozen, "frozen"),
            (self.electrocuted, "electrocuted"),
            (self.slow_field, "slow_field"),
            (self.damage_amplified, "damage_amplified"),
        ]
        .into_iter()
        .filter_map(|(active, name)| active.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_compose() {
        let constants = CombatConstants::default();
        let context = StatusEffectContext {
            frozen: true,
            damage_amplified: true,
            ..StatusEffectContext::default()
        };
        assert!((context.direct_multiplier(&constants) - 3.9).abs() < 1e-12);
        assert!((context.area_multiplier(&constants) - 1.3).abs() < 1e-12);
        assert_eq!(context.active_flags(), vec!["frozen", "damage_amplified"]);
    }

    #[test]
    fn missing_fields_deserialize_as_inactive() {
        let context: StatusEffectContext =
            serde_json::from_str(r#"{"electrocuted":true}"#).expect("valid json");
        assert!(context.electrocuted);
        assert!(!context.frozen);
    }
}
