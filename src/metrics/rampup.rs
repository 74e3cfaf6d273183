//! Exponential rate-of-fire ramp-up: `rate(t) = min * e^(growth * t)` until it reaches `max`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RampUp {
    pub min_rate: f64,
    pub max_rate: f64,
    pub growth: f64,
}

impl RampUp {
    pub fn new(min_rate: f64, max_rate: f64, growth: f64) -> Self {
        Self {
            min_rate,
            max_rate,
            growth,
        }
    }

    /// No ramp when the range collapses to a constant.
    pub fn is_flat(&self) -> bool {
        self.max_rate <= self.min_rate || self.min_rate <= 0.0 || self.growth <= 0.0
    }

    pub fn time_to_max(&self) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (self.max_rate / self.min_rate).ln() / self.growth
    }

    /// Integral of the rate over `[0, time_to_max]`.
    pub fn exact_rounds(&self) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (self.min_rate / self.growth) * ((self.growth * self.time_to_max()).exp() - 1.0)
    }

    pub fn rounds(&self) -> u32 {
        self.exact_rounds().round() as u32
    }

    pub fn average_rate_during_ramp(&self) -> f64 {
        if self.is_flat() {
            return self.max_rate;
        }
        self.exact_rounds() / self.time_to_max()
    }

    /// Round-weighted blend of the ramp segment and the steady segment over one magazine.
    pub fn average_rate_over(&self, magazine: f64) -> f64 {
        if magazine <= 0.0 {
            return self.max_rate;
        }
        let ramp_rounds = f64::from(self.rounds()).min(magazine);
        (self.average_rate_during_ramp() * ramp_rounds + self.max_rate * (magazine - ramp_rounds))
            / magazine
    }
}

/// Average multiplier over a magazine for a bonus that only applies after `rounds_before` rounds.
pub fn delayed_bonus_multiplier(bonus: f64, rounds_before: f64, magazine: f64) -> f64 {
    if magazine <= 0.0 {
        return 1.0;
    }
    let before = rounds_before.clamp(0.0, magazine);
    (before + bonus * (magazine - before)) / magazine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_autocannon_ramp() {
        let ramp = RampUp::new(3.0, 5.5, 0.3);
        assert!((ramp.time_to_max() - (5.5f64 / 3.0).ln() / 0.3).abs() < 1e-12);
        // e^(g t) = max / min, so the integral is (max - min) / g
        assert!((ramp.exact_rounds() - 2.5 / 0.3).abs() < 1e-9);
        assert_eq!(ramp.rounds(), 8);
        let average = ramp.average_rate_over(110.0);
        assert!(average > 3.0 && average < 5.5);
    }

    #[test]
    fn collapsed_range_has_no_ramp() {
        let ramp = RampUp::new(4.0, 4.0, 0.6);
        assert_eq!(ramp.rounds(), 0);
        assert_eq!(ramp.time_to_max(), 0.0);
        assert_eq!(ramp.average_rate_over(55.0), 4.0);
        assert!(!ramp.average_rate_during_ramp().is_nan());
    }

    #[test]
    fn delayed_bonus_blends_by_round_count() {
        assert!((delayed_bonus_multiplier(1.2, 10.0, 110.0) - (10.0 + 1.2 * 100.0) / 110.0).abs() < 1e-12);
        assert_eq!(delayed_bonus_multiplier(1.2, 200.0, 110.0), 1.0);
        assert_eq!(delayed_bonus_multiplier(1.2, 0.0, 0.0), 1.0);
    }
}
