//! Heat meter timing for weapons that overheat instead of reloading.

use serde::Serialize;
use tracing::debug;

/// Seconds of continuous fire before the meter fills.
pub fn firing_period(max_heat: f64, heat_per_sec: f64) -> f64 {
    if heat_per_sec <= 0.0 {
        return f64::INFINITY;
    }
    max_heat / heat_per_sec
}

/// Empirical fit for the time a full meter needs to drain at `cooling_rate`.
pub fn cooldown_period(max_heat: f64, cooling_rate: f64) -> f64 {
    if cooling_rate <= 0.0 {
        return f64::INFINITY;
    }
    max_heat / cooling_rate + cooling_rate / 9.0
}

/// Heat removed from the meter for every kill, which lengthens the firing period and in turn
/// allows more kills before overheating.
///
/// Approximated by iterating the added time until it drops below the heat removed per kill.
/// The total is clamped to `max_firing_period` (time to empty all ammo), which is what
/// terminates the loop when kills outpace heat gain. The clamp is empirical: it biases long
/// feedback chains towards the full-ammo duration rather than modelling them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillHeatFeedback {
    pub heat_removed_per_kill: f64,
    pub time_to_kill: f64,
    pub max_firing_period: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedbackOutcome {
    pub firing_period: f64,
    pub iterations: u32,
    pub clamped: bool,
}

impl KillHeatFeedback {
    pub const MAX_ITERATIONS: u32 = 10_000;

    pub fn extend(&self, base_period: f64) -> FeedbackOutcome {
        let mut outcome = FeedbackOutcome {
            firing_period: base_period,
            iterations: 0,
            clamped: false,
        };
        if self.time_to_kill <= 0.0 || !self.time_to_kill.is_finite() {
            return outcome;
        }

        let removed = self.heat_removed_per_kill;
        let mut added = (base_period / self.time_to_kill) * removed;
        outcome.firing_period += added;

        while added > removed {
            if outcome.iterations >= Self::MAX_ITERATIONS {
                break;
            }
            outcome.iterations += 1;
            added = (added / self.time_to_kill) * removed;
            outcome.firing_period += added;
            if outcome.firing_period > self.max_firing_period {
                outcome.firing_period = self.max_firing_period;
                outcome.clamped = true;
                break;
            }
        }

        debug!(
            iterations = outcome.iterations,
            clamped = outcome.clamped,
            firing_period = outcome.firing_period,
            "kill heat feedback settled"
        );
        outcome
    }
}
