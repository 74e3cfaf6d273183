//! Accuracy estimation from crosshair geometry.
//!
//! Both estimators return a percentage in `[0, 100]`: the chance a round lands on the reference
//! target body, or on its weakpoint when `weakpoint` is set.

use std::f64::consts::PI;

use crate::config::AccuracyConfig;

/// Bloom model of a circular crosshair, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularSpread {
    pub base_spread: f64,
    pub spread_per_shot: f64,
    /// Degrees of bloom recovered per second.
    pub recovery_speed: f64,
    pub max_bloom: f64,
    pub rate_of_fire: f64,
    pub magazine_size: f64,
}

pub trait AccuracyEstimator {
    fn rectangular_accuracy(&self, weakpoint: bool, width_px: f64, height_px: f64) -> f64;

    fn circular_accuracy(&self, weakpoint: bool, spread: &CircularSpread) -> f64;
}

/// Uniform impacts inside the crosshair, projected at a fixed distance.
#[derive(Debug, Clone)]
pub struct ConeAccuracy {
    config: AccuracyConfig,
}

impl ConeAccuracy {
    pub fn new(config: AccuracyConfig) -> Self {
        Self { config }
    }

    fn target_radius(&self, weakpoint: bool) -> f64 {
        if weakpoint {
            self.config.weakpoint_radius
        } else {
            self.config.target_radius
        }
    }

    fn meters_per_pixel(&self) -> f64 {
        let half_fov = (self.config.field_of_view / 2.0).to_radians();
        2.0 * self.config.distance * half_fov.tan() / self.config.screen_width_px
    }

    /// Mean bloom over one magazine: bloom builds per shot, recovers over time and caps.
    fn average_bloom(spread: &CircularSpread) -> f64 {
        if spread.rate_of_fire <= 0.0 || spread.magazine_size <= 0.0 {
            return 0.0;
        }
        let per_shot =
            (spread.spread_per_shot - spread.recovery_speed / spread.rate_of_fire).max(0.0);
        if per_shot <= 0.0 {
            return 0.0;
        }
        let shots_to_cap = spread.max_bloom / per_shot;
        let n = spread.magazine_size;
        if n <= shots_to_cap {
            per_shot * n / 2.0
        } else {
            let ramp = shots_to_cap * spread.max_bloom / 2.0;
            (ramp + (n - shots_to_cap) * spread.max_bloom) / n
        }
    }
}

impl AccuracyEstimator for ConeAccuracy {
    fn rectangular_accuracy(&self, weakpoint: bool, width_px: f64, height_px: f64) -> f64 {
        let scale = self.meters_per_pixel();
        let half_width = width_px * scale / 2.0;
        let half_height = height_px * scale / 2.0;
        if half_width <= 0.0 || half_height <= 0.0 {
            return 100.0;
        }
        let radius = self.target_radius(weakpoint);
        let covered = (PI * radius * radius)
            .min(4.0 * radius.min(half_width) * radius.min(half_height));
        100.0 * (covered / (4.0 * half_width * half_height)).min(1.0)
    }

    fn circular_accuracy(&self, weakpoint: bool, spread: &CircularSpread) -> f64 {
        let half_angle = (spread.base_spread + Self::average_bloom(spread)) / 2.0;
        let cone_radius = self.config.distance * half_angle.to_radians().tan();
        if cone_radius <= 0.0 {
            return 100.0;
        }
        let ratio = self.target_radius(weakpoint) / cone_radius;
        100.0 * (ratio * ratio).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> ConeAccuracy {
        ConeAccuracy::new(AccuracyConfig::default())
    }

    #[test]
    fn tighter_crosshair_is_more_accurate() {
        let estimator = estimator();
        let wide = estimator.rectangular_accuracy(false, 397.0, 162.0);
        let tight = estimator.rectangular_accuracy(false, 206.0, 96.0);
        assert!(tight > wide);
        assert!(tight <= 100.0);
    }

    #[test]
    fn weakpoint_accuracy_is_lower() {
        let estimator = estimator();
        let general = estimator.rectangular_accuracy(false, 279.0, 125.0);
        let weakpoint = estimator.rectangular_accuracy(true, 279.0, 125.0);
        assert!(weakpoint < general);
    }

    #[test]
    fn bloom_reduces_circular_accuracy() {
        let estimator = estimator();
        let steady = CircularSpread {
            base_spread: 5.0,
            spread_per_shot: 0.0,
            recovery_speed: 1.0,
            max_bloom: 3.5,
            rate_of_fire: 15.0,
            magazine_size: 100.0,
        };
        let blooming = CircularSpread {
            spread_per_shot: 0.2,
            ..steady
        };
        assert!(
            estimator.circular_accuracy(false, &blooming)
                < estimator.circular_accuracy(false, &steady)
        );
    }

    #[test]
    fn zero_spread_always_hits() {
        let spread = CircularSpread {
            base_spread: 0.0,
            spread_per_shot: 0.0,
            recovery_speed: 0.0,
            max_bloom: 0.0,
            rate_of_fire: 10.0,
            magazine_size: 10.0,
        };
        assert_eq!(estimator().circular_accuracy(true, &spread), 100.0);
    }
}
