use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_sim_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[device]
backend = "sim"

[poll]
interval_ms = 20
channel_depth = 8

[history]
capacity = 5
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn last_json_line(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with('{'))
        .unwrap_or("")
        .to_string();
    assert!(!line.is_empty(), "no JSON line on stdout: {text}");
    serde_json::from_str(&line).expect("valid JSON")
}

/// Validate the JSON shape of a finished watch run.
#[rstest]
fn watch_json_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_sim_config(&dir);

    let out = Command::cargo_bin("tracker")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["watch", "--ticks", "7"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);

    assert_eq!(v["ingested"], 7);
    assert!(v["stats"]["fetched"].as_u64().unwrap() >= 7);
    for key in ["failed", "skipped_ticks", "dropped_payloads"] {
        assert!(v["stats"][key].as_u64().is_some(), "{key} missing");
    }

    // History is capped at the configured capacity
    let acc = v["snapshot"]["acceleration"].as_array().unwrap();
    assert_eq!(acc.len(), 5);
    assert!(acc[0]["x"].as_f64().is_some());

    // Flat realtime schema: azimuth/elevation projected from the angle
    let rt = &v["snapshot"]["realtime"];
    assert!(rt["azimuth"].as_f64().is_some());
    assert!(rt["elevation"].as_f64().is_some());
    assert!(rt["panel"]["voltage"].as_f64().is_some());

    assert_eq!(v["snapshot"]["control"]["mode"], "auto");
    assert_eq!(v["snapshot"]["control_revision"], 1);
}

/// Errors are reported as one JSON object on stdout with a stable reason.
#[rstest]
fn json_error_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_sim_config(&dir);

    let out = Command::cargo_bin("tracker")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["setting", "set", "--mode", "turbo"])
        .assert()
        .code(4)
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);
    assert_eq!(v["reason"], "InvalidMode");
    assert!(v["message"].as_str().unwrap().contains("auto"));
}

#[rstest]
fn setting_get_json_is_one_line() {
    let dir = tempdir().unwrap();
    let cfg = write_sim_config(&dir);

    let out = Command::cargo_bin("tracker")
        .unwrap()
        .arg("--json")
        .arg("--config")
        .arg(&cfg)
        .args(["setting", "get"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);
    // Firmware strings arrive coerced to numbers
    assert_eq!(v["th"]["maxv"], 12.1);
    assert_eq!(v["pid"]["pos"]["maxout"], 30.0);
    assert_eq!(v["mode"], "auto");
}
