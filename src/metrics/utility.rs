use serde::Serialize;

/// Weighted utility contributions; each is zero unless a build enables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UtilityBreakdown {
    pub mobility: f64,
    pub damage_resistance: f64,
    pub armor_break: f64,
    pub slow: f64,
    pub fear: f64,
    pub stun: f64,
    pub freeze: f64,
}

impl UtilityBreakdown {
    pub fn total(&self) -> f64 {
        self.mobility
            + self.damage_resistance
            + self.armor_break
            + self.slow
            + self.fear
            + self.stun
            + self.freeze
    }
}

/// Effective-health multiplier for a damage resistance fraction.
pub fn effective_health_multiplier(resistance: f64) -> f64 {
    1.0 / (1.0 - resistance)
}
