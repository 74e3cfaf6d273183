use serde::Serialize;

/// Expected rounds hitting the weakpoint and the rest of the body.
///
/// Both counts are rounded before subtracting, so `weakpoint + body` can differ from
/// `round(rounds * general_accuracy)` by one at low round counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitSplit {
    pub weakpoint: i64,
    pub body: i64,
}

impl HitSplit {
    /// Accuracies are fractions in `[0, 1]`.
    pub fn new(rounds: f64, general_accuracy: f64, weakpoint_accuracy: f64) -> Self {
        let weakpoint = (rounds * weakpoint_accuracy).round() as i64;
        let body = (rounds * general_accuracy).round() as i64 - weakpoint;
        Self { weakpoint, body }
    }

    pub fn damage(&self, weakpoint_damage: f64, body_damage: f64) -> f64 {
        self.weakpoint as f64 * weakpoint_damage + self.body as f64 * body_damage
    }

    pub fn total(&self) -> i64 {
        self.weakpoint + self.body
    }
}
