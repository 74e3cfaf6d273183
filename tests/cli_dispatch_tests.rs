use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_armory")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("armory-{name}-{stamp}.csv"))
}

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= 1e-9 * left.abs().max(right.abs()).max(1.0)
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("armory should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: armory <weapons|stats|metrics|validate|export|rank|serve>"));
}

#[test]
fn weapons_command_lists_roster() {
    let output = Command::new(bin())
        .arg("weapons")
        .output()
        .expect("weapons should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let kinds: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(kinds, vec!["autocannon", "minigun", "flamethrower", "zhukov"]);
}

#[test]
fn metrics_command_emits_json() {
    let output = Command::new(bin())
        .args(["metrics", "zhukov", "-----4"])
        .output()
        .expect("metrics should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("metrics should emit json");
    assert!(payload["ideal_burst_dps"].as_f64().expect("number") > 0.0);
    assert!(payload["breakpoints"].is_array());
}

#[test]
fn amplified_flag_scales_metrics() {
    let run = |extra: &[&str]| {
        let output = Command::new(bin())
            .args(["metrics", "minigun", "------"])
            .args(extra)
            .output()
            .expect("metrics should run");
        assert_eq!(output.status.code(), Some(0));
        let payload: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("metrics should emit json");
        payload["ideal_burst_dps"].as_f64().expect("number")
    };
    assert!(approx_eq(run(&["--amplified"]), run(&[]) * 1.3));
}

#[test]
fn metrics_table_is_tab_separated() {
    let output = Command::new(bin())
        .args(["metrics", "autocannon", "--table"])
        .output()
        .expect("metrics should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("metric\tvalue"));
    assert!(lines.next().expect("first metric").starts_with("ideal_burst_dps\t"));
}

#[test]
fn stats_command_renders_table() {
    let output = Command::new(bin())
        .args(["stats", "autocannon", "A----3"])
        .output()
        .expect("stats should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().next().expect("first row").starts_with('*'));
}

#[test]
fn validate_command_reports_positions() {
    let output = Command::new(bin())
        .args(["validate", "zhukov", "C----9"])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("symbol #1 'C'"));
    assert!(stderr.contains("symbol #6 '9'"));

    let output = Command::new(bin())
        .args(["validate", "zhukov", "AB---1"])
        .output()
        .expect("validate should run");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn unknown_weapon_fails() {
    let output = Command::new(bin())
        .args(["stats", "railgun"])
        .output()
        .expect("stats should run");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn export_command_writes_csv() {
    let path = unique_temp_path("export");
    let output = Command::new(bin())
        .args(["export", "flamethrower", path.to_string_lossy().as_ref()])
        .output()
        .expect("export should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export complete: rows=19"));
    let written = fs::read_to_string(&path).expect("export file exists");
    assert_eq!(written.lines().count(), 20);

    let _ = fs::remove_file(path);
}

#[test]
fn rank_command_orders_builds() {
    let output = Command::new(bin())
        .args(["rank", "zhukov", "sustained", "4"])
        .output()
        .expect("rank should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("rank should emit json");
    let ranked = payload.as_array().expect("array of builds");
    assert_eq!(ranked.len(), 4);
    let scores: Vec<f64> = ranked
        .iter()
        .map(|build| build["score"].as_f64().expect("score"))
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

    let output = Command::new(bin())
        .args(["rank", "zhukov", "style"])
        .output()
        .expect("rank should run");
    assert_eq!(output.status.code(), Some(1));
}
