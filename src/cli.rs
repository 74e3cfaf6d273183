use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::build::BuildSelection;
use crate::export::write_csv_file;
use crate::metrics::MetricsReport;
use crate::model::{Environment, StatusEffectContext};
use crate::optimizer::{rank_builds, RankingMetric};
use crate::presentation::render_table;
use crate::server::{self, BIND_ENV_VAR, DEFAULT_BIND};
use crate::weapons::{Weapon, WeaponKind};

const USAGE: &str = "usage: armory <weapons|stats|metrics|validate|export|rank|serve>";
const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Weapons,
    Stats,
    Metrics,
    Validate,
    Export,
    Rank,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("weapons") => Some(Command::Weapons),
        Some("stats") => Some(Command::Stats),
        Some("metrics") => Some(Command::Metrics),
        Some("validate") => Some(Command::Validate),
        Some("export") => Some(Command::Export),
        Some("rank") => Some(Command::Rank),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], env: &Environment) -> i32 {
    match parse_command(args) {
        Some(Command::Weapons) => handle_weapons(),
        Some(Command::Stats) => handle_stats(args, env),
        Some(Command::Metrics) => handle_metrics(args, env),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Export) => handle_export(args),
        Some(Command::Rank) => handle_rank(args, env),
        Some(Command::Serve) => handle_serve(env),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_weapons() -> i32 {
    for kind in WeaponKind::ALL {
        let weapon = kind.weapon();
        println!("{}\t{}\t{}", kind, weapon.full_name(), weapon.class_name());
    }
    0
}

fn handle_stats(args: &[String], env: &Environment) -> i32 {
    let (weapon, selection) = match weapon_and_build(args, "stats <weapon> [build]") {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };
    print!("{}", render_table(&weapon.stats(&selection, env)));
    0
}

fn handle_metrics(args: &[String], env: &Environment) -> i32 {
    let (weapon, selection) = match weapon_and_build(
        args,
        "metrics <weapon> [build] [--frozen|--electrocuted|--slow-field|--amplified] [--table]",
    ) {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };
    let context = status_flags(args);
    let report = weapon.metrics(&selection, &context, env);

    if args.iter().any(|arg| arg == "--table") {
        println!("metric\tvalue");
        for (name, value) in report_rows(&report) {
            println!("{name}\t{value:.6}");
        }
        0
    } else {
        print_json(&report)
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let (Some(name), Some(build)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: armory validate <weapon> <build>");
        return 2;
    };
    let Some(weapon) = parse_weapon(name) else {
        return 1;
    };

    let report = weapon.validate(build);
    if report.has_errors() {
        eprintln!("validation failed: {build}");
        if let Some(length) = report.length {
            eprintln!("- expected {} symbols, found {}", length.expected, length.found);
        }
        for diagnostic in &report.diagnostics {
            eprintln!("- {diagnostic}");
        }
        1
    } else {
        println!("validation passed: {build}");
        0
    }
}

fn handle_export(args: &[String]) -> i32 {
    let Some(name) = args.get(2) else {
        eprintln!("usage: armory export <weapon> [path]");
        return 2;
    };
    let Some(weapon) = parse_weapon(name) else {
        return 1;
    };
    let path = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", weapon.kind())));

    match write_csv_file(weapon, &path) {
        Ok(rows) => {
            println!("export complete: rows={rows}, path='{}'", path.display());
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_rank(args: &[String], env: &Environment) -> i32 {
    let (Some(name), Some(metric)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: armory rank <weapon> <metric> [top_n]");
        return 2;
    };
    let Some(weapon) = parse_weapon(name) else {
        return 1;
    };
    let metric = match RankingMetric::from_str(metric) {
        Ok(metric) => metric,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let top_n = parse_usize_arg(args.get(4), "top_n", DEFAULT_TOP_N);

    let ranked = rank_builds(weapon, metric, &status_flags(args), env, top_n);
    print_json(&ranked)
}

fn handle_serve(env: &Environment) -> i32 {
    let bind_addr = env::var(BIND_ENV_VAR).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    match server::run_server(&bind_addr, env) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Weapon and build from positions 2 and 3; the build defaults to the baseline. The error is
/// the exit code after the problem has been reported.
fn weapon_and_build(
    args: &[String],
    usage: &str,
) -> Result<(&'static dyn Weapon, BuildSelection), i32> {
    let Some(name) = args.get(2) else {
        eprintln!("usage: armory {usage}");
        return Err(2);
    };
    let weapon = parse_weapon(name).ok_or(1)?;
    let build = args
        .get(3)
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("------");
    match weapon.decode(build) {
        Ok(selection) => Ok((weapon, selection)),
        Err(err) => {
            eprintln!("{err}");
            Err(1)
        }
    }
}

fn parse_weapon(name: &str) -> Option<&'static dyn Weapon> {
    match WeaponKind::from_str(name) {
        Ok(kind) => Some(kind.weapon()),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn status_flags(args: &[String]) -> StatusEffectContext {
    let has = |flag: &str| args.iter().any(|arg| arg == flag);
    StatusEffectContext {
        frozen: has("--frozen"),
        electrocuted: has("--electrocuted"),
        slow_field: has("--slow-field"),
        damage_amplified: has("--amplified"),
    }
}

fn report_rows(report: &MetricsReport) -> Vec<(&'static str, f64)> {
    vec![
        ("ideal_burst_dps", report.ideal_burst_dps),
        ("ideal_sustained_dps", report.ideal_sustained_dps),
        ("sustained_weakpoint_dps", report.sustained_weakpoint_dps),
        (
            "sustained_weakpoint_accuracy_dps",
            report.sustained_weakpoint_accuracy_dps,
        ),
        ("additional_target_dps", report.additional_target_dps),
        ("max_multi_target_damage", report.max_multi_target_damage),
        ("max_num_targets", f64::from(report.max_num_targets)),
        ("firing_duration", report.firing_duration),
        ("average_time_to_kill", report.average_time_to_kill),
        ("average_damage_to_kill", report.average_damage_to_kill),
        ("breakpoint_sum", f64::from(report.breakpoint_sum)),
        ("utility", report.utility),
        ("damage_per_magazine", report.damage_per_magazine),
        ("time_to_fire_magazine", report.time_to_fire_magazine),
        ("general_accuracy", report.general_accuracy),
        ("weakpoint_accuracy", report.weakpoint_accuracy),
        ("damage_wasted_by_armor", report.damage_wasted_by_armor),
    ]
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
