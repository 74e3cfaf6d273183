use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::build::{BuildError, ValidationReport};
use crate::catalog::{CostVector, TIER_COUNT};
use crate::metrics::MetricsReport;
use crate::model::{Environment, StatusEffectContext};
use crate::presentation::StatsRow;
use crate::weapons::{DerivedStats, Weapon, WeaponKind};

const BASELINE_COMBINATION: &str = "------";

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "armory",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub struct WeaponListItem {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub class: &'static str,
    pub tier_arity: Vec<usize>,
    pub overclocks: usize,
}

pub fn weapons_payload() -> Result<String, serde_json::Error> {
    let weapons: Vec<WeaponListItem> = WeaponKind::ALL
        .into_iter()
        .map(|kind| {
            let weapon = kind.weapon();
            let catalog = weapon.catalog();
            WeaponListItem {
                kind,
                name: weapon.full_name(),
                class: weapon.class_name(),
                tier_arity: (1..=TIER_COUNT).map(|tier| catalog.tier_arity(tier)).collect(),
                overclocks: catalog.overclock_count(),
            }
        })
        .collect();
    serde_json::to_string_pretty(&weapons)
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub symbol: char,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub cost: CostVector,
    /// Present on overclocks only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct WeaponDetailResponse {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub class: &'static str,
    pub tiers: Vec<Vec<CatalogEntry>>,
    pub overclocks: Vec<CatalogEntry>,
    pub baseline: DerivedStats,
}

pub fn weapon_detail_payload(name: &str) -> Result<String, ApiError> {
    let weapon = lookup_weapon(name)?;
    let catalog = weapon.catalog();
    let tiers = catalog
        .tiers
        .iter()
        .map(|options| {
            options
                .iter()
                .map(|option| CatalogEntry {
                    symbol: option.letter(),
                    name: option.name,
                    description: option.description,
                    icon: option.icon,
                    cost: option.cost,
                    classification: None,
                })
                .collect()
        })
        .collect();
    let overclocks = catalog
        .overclocks
        .iter()
        .map(|option| CatalogEntry {
            symbol: option.shortcut(),
            name: option.name,
            description: option.description,
            icon: option.icon,
            cost: option.cost,
            classification: Some(option.classification.as_str()),
        })
        .collect();

    let response = WeaponDetailResponse {
        kind: weapon.kind(),
        name: weapon.full_name(),
        class: weapon.class_name(),
        tiers,
        overclocks,
        baseline: weapon.derived(&Default::default()),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub weapon: String,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub status: StatusEffectContext,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub status: &'static str,
    pub weapon: WeaponKind,
    pub combination: String,
    pub deals_splash_damage: bool,
    pub derived: DerivedStats,
    pub stats: Vec<StatsRow>,
    pub metrics: MetricsReport,
}

pub fn evaluate_payload(body: &str, env: &Environment) -> Result<String, ApiError> {
    let request: EvaluateRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let weapon = lookup_weapon(&request.weapon)?;
    let combination = request.build.as_deref().unwrap_or(BASELINE_COMBINATION);
    let report = weapon.validate(combination);
    if report.has_errors() {
        return Err(ApiError::InvalidBuild(report));
    }
    let selection = weapon.decode(combination).map_err(ApiError::Build)?;

    let response = EvaluateResponse {
        status: "ok",
        weapon: weapon.kind(),
        combination: weapon.encode(&selection),
        deals_splash_damage: weapon.deals_splash_damage(&selection),
        derived: weapon.derived(&selection),
        stats: weapon.stats(&selection, env),
        metrics: weapon.metrics(&selection, &request.status, env),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub weapon: String,
    pub build: String,
}

pub fn validate_payload(body: &str) -> Result<String, ApiError> {
    let request: ValidateRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let weapon = lookup_weapon(&request.weapon)?;
    let report = weapon.validate(&request.build);
    if report.has_errors() {
        return Err(ApiError::InvalidBuild(report));
    }
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "valid": true,
        "weapon": weapon.kind(),
        "combination": request.build,
    }))?)
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub report: ValidationReport,
}

impl ValidationErrorResponse {
    pub fn new(report: ValidationReport) -> Self {
        Self {
            status: "error",
            message: format!("invalid build: {report}"),
            report,
        }
    }
}

fn lookup_weapon(name: &str) -> Result<&'static dyn Weapon, ApiError> {
    WeaponKind::from_str(name)
        .map(WeaponKind::weapon)
        .map_err(ApiError::Build)
}

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Build(BuildError),
    InvalidBuild(ValidationReport),
    Serialize(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid request body: {err}"),
            Self::Build(err) => write!(f, "{err}"),
            Self::InvalidBuild(report) => write!(f, "invalid build: {report}"),
            Self::Serialize(err) => write!(f, "failed to encode response: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_list_has_every_kind() {
        let payload = weapons_payload().expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("json");
        let kinds: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .map(|item| item["kind"].as_str().expect("kind"))
            .collect();
        assert_eq!(kinds, vec!["autocannon", "minigun", "flamethrower", "zhukov"]);
        assert_eq!(value[3]["tier_arity"][0], 2);
    }

    #[test]
    fn evaluate_defaults_to_baseline() {
        let env = Environment::default();
        let payload = evaluate_payload(r#"{"weapon":"minigun"}"#, &env).expect("valid request");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(value["combination"], "------");
        assert_eq!(value["derived"]["weapon"], "minigun");
        assert!(value["metrics"]["ideal_burst_dps"].as_f64().expect("number") > 0.0);
    }

    #[test]
    fn invalid_build_reports_positions() {
        let err = validate_payload(r#"{"weapon":"zhukov","build":"C----9"}"#)
            .expect_err("zhukov has no C in tier 1");
        match err {
            ApiError::InvalidBuild(report) => assert_eq!(report.positions(), vec![0, 5]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_weapon_is_a_build_error() {
        let err = weapon_detail_payload("railgun").expect_err("not a weapon");
        assert!(matches!(err, ApiError::Build(BuildError::UnknownWeapon(_))));
    }
}
