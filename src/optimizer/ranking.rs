use serde::Serialize;

use crate::metrics::MetricsReport;

#[derive(Debug, Clone, Serialize)]
pub struct RankedBuild {
    pub combination: String,
    pub score: f64,
    pub report: MetricsReport,
}

/// Best score first; equal scores fall back to the combination string so output is stable.
pub fn rank_results(mut ranked: Vec<RankedBuild>) -> Vec<RankedBuild> {
    ranked.sort_by(|left, right| {
        right
            .score
            .total_cmp(&left.score)
            .then_with(|| left.combination.cmp(&right.combination))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::UtilityBreakdown;

    fn build(combination: &str, score: f64) -> RankedBuild {
        RankedBuild {
            combination: combination.to_string(),
            score,
            report: MetricsReport {
                ideal_burst_dps: score,
                ideal_sustained_dps: score,
                sustained_weakpoint_dps: score,
                sustained_weakpoint_accuracy_dps: score,
                additional_target_dps: 0.0,
                max_multi_target_damage: 0.0,
                max_num_targets: 1,
                firing_duration: 0.0,
                average_time_to_kill: 0.0,
                average_damage_to_kill: 0.0,
                breakpoints: Vec::new(),
                breakpoint_sum: 0,
                utility: 0.0,
                utility_breakdown: UtilityBreakdown::default(),
                damage_per_magazine: 0.0,
                time_to_fire_magazine: 0.0,
                general_accuracy: -1.0,
                weakpoint_accuracy: -1.0,
                time_to_ignite: None,
                damage_wasted_by_armor: 0.0,
            },
        }
    }

    #[test]
    fn ties_break_on_combination() {
        let ranked = rank_results(vec![
            build("B-----", 10.0),
            build("A-----", 10.0),
            build("------", 12.0),
        ]);
        let order: Vec<&str> = ranked.iter().map(|r| r.combination.as_str()).collect();
        assert_eq!(order, vec!["------", "A-----", "B-----"]);
    }
}
