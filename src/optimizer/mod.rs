//! Exhaustive build ranking: every valid selection of one weapon is evaluated and scored by a
//! single metric.

pub mod ranking;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::build::all_selections;
use crate::metrics::MetricsReport;
use crate::model::{Environment, StatusEffectContext};
use crate::weapons::Weapon;

pub use ranking::{rank_results, RankedBuild};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("unknown ranking metric '{0}', expected one of: {names}", names = RankingMetric::names())]
    UnknownMetric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMetric {
    Burst,
    Sustained,
    Weakpoint,
    WeakpointAccuracy,
    AdditionalTarget,
    MultiTarget,
    FiringDuration,
    TimeToKill,
    Utility,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 9] = [
        RankingMetric::Burst,
        RankingMetric::Sustained,
        RankingMetric::Weakpoint,
        RankingMetric::WeakpointAccuracy,
        RankingMetric::AdditionalTarget,
        RankingMetric::MultiTarget,
        RankingMetric::FiringDuration,
        RankingMetric::TimeToKill,
        RankingMetric::Utility,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Burst => "burst",
            Self::Sustained => "sustained",
            Self::Weakpoint => "weakpoint",
            Self::WeakpointAccuracy => "weakpoint-accuracy",
            Self::AdditionalTarget => "additional-target",
            Self::MultiTarget => "multi-target",
            Self::FiringDuration => "firing-duration",
            Self::TimeToKill => "time-to-kill",
            Self::Utility => "utility",
        }
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(RankingMetric::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Higher is better; time to kill is negated so faster kills rank first.
    pub fn score(&self, report: &MetricsReport) -> f64 {
        match self {
            Self::Burst => report.ideal_burst_dps,
            Self::Sustained => report.ideal_sustained_dps,
            Self::Weakpoint => report.sustained_weakpoint_dps,
            Self::WeakpointAccuracy => report.sustained_weakpoint_accuracy_dps,
            Self::AdditionalTarget => report.additional_target_dps,
            Self::MultiTarget => report.max_multi_target_damage,
            Self::FiringDuration => report.firing_duration,
            Self::TimeToKill => -report.average_time_to_kill,
            Self::Utility => report.utility,
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMetric {
    type Err = RankingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == normalized)
            .ok_or_else(|| RankingError::UnknownMetric(value.to_string()))
    }
}

/// Scores every valid build of `weapon` and returns the best `top_n`.
pub fn rank_builds(
    weapon: &dyn Weapon,
    metric: RankingMetric,
    context: &StatusEffectContext,
    env: &Environment,
    top_n: usize,
) -> Vec<RankedBuild> {
    let selections = all_selections(weapon.catalog());
    let evaluated = selections.len();
    let scored: Vec<RankedBuild> = selections
        .iter()
        .map(|selection| {
            let report = weapon.metrics(selection, context, env);
            RankedBuild {
                combination: weapon.encode(selection),
                score: metric.score(&report),
                report,
            }
        })
        .collect();

    let mut ranked = rank_results(scored);
    ranked.truncate(top_n);
    info!(
        weapon = %weapon.kind(),
        metric = %metric,
        evaluated,
        returned = ranked.len(),
        "ranked builds"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::WeaponKind;

    #[test]
    fn metric_names_parse() {
        assert_eq!("multi_target".parse::<RankingMetric>(), Ok(RankingMetric::MultiTarget));
        assert_eq!("Burst".parse::<RankingMetric>(), Ok(RankingMetric::Burst));
        assert!(matches!(
            "dps".parse::<RankingMetric>(),
            Err(RankingError::UnknownMetric(_))
        ));
    }

    #[test]
    fn ranking_is_sorted_and_truncated() {
        let env = Environment::default();
        let ranked = rank_builds(
            WeaponKind::Zhukov.weapon(),
            RankingMetric::Sustained,
            &StatusEffectContext::default(),
            &env,
            5,
        );
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(ranked[0].score, ranked[0].report.ideal_sustained_dps);
    }

    #[test]
    fn faster_kills_rank_first() {
        let env = Environment::default();
        let ranked = rank_builds(
            WeaponKind::Autocannon.weapon(),
            RankingMetric::TimeToKill,
            &StatusEffectContext::default(),
            &env,
            3,
        );
        assert!(ranked[0].report.average_time_to_kill <= ranked[2].report.average_time_to_kill);
    }
}
