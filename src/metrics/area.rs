use serde::Serialize;

use crate::model::EnemyPopulation;

/// Area-of-effect efficiency: radius, average damage factor over the disk, targets inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AoeEfficiency {
    pub radius: f64,
    pub average_damage: f64,
    pub targets: u32,
}

impl AoeEfficiency {
    /// Full damage inside `full_damage_radius`, falling linearly to `falloff` at `radius`.
    pub fn new(
        radius: f64,
        full_damage_radius: f64,
        falloff: f64,
        population: &dyn EnemyPopulation,
    ) -> Self {
        Self {
            radius,
            average_damage: average_falloff_factor(radius, full_damage_radius, falloff),
            targets: population.targets_in_radius(radius),
        }
    }

    /// Average damage factor times targets hit.
    pub fn weighted_targets(&self) -> f64 {
        self.average_damage * f64::from(self.targets)
    }
}

/// Area-weighted mean of the falloff curve over a disk of `radius`.
pub fn average_falloff_factor(radius: f64, full_damage_radius: f64, falloff: f64) -> f64 {
    if radius <= full_damage_radius || radius <= 0.0 {
        return 1.0;
    }
    let (r, r1) = (radius, full_damage_radius);
    let slope = (1.0 - falloff) / (r - r1);
    1.0 - slope * (2.0 * (r.powi(3) - r1.powi(3)) / 3.0 - r1 * (r * r - r1 * r1)) / (r * r)
}
