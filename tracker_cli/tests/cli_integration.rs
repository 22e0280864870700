use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config for the simulated backend
fn write_sim_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[device]
backend = "sim"

[poll]
# fast ticks keep watch runs short
interval_ms = 20
channel_depth = 8

[retry]
max_attempts = 1
backoff_ms = 0
max_backoff_ms = 0
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["health"], 0, "backend=sim", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["watch", "--ticks", "3"], 0, "Ingested 3 payload(s)", "stdout")]
#[case(&["watch", "--duration-ms", "100"], 0, "Poller: fetched=", "stdout")]
#[case(&["setting", "get"], 0, "\"mode\": \"auto\"", "stdout")]
#[case(&["setting", "set", "--mode", "manual"], 0, "setting data received", "stdout")]
#[case(&["setting", "set", "--mode", "turbo"], 4, "Invalid mode", "stderr")]
#[case(&["setting", "set"], 2, "required", "stderr")]
#[case(&["brightness", "--data", "42"], 0, "controlData", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_sim_config(&dir);

    let mut cmd = Command::cargo_bin("tracker").unwrap();

    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg).arg("--log-level").arg("error");
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
#[case("[poll]\ninterval_ms = 0\n", "poll.interval_ms")]
#[case("[device]\nbackend = \"http\"\nbase_url = \"192.168.4.1\"\n", "http://")]
#[case("[retry]\nbackoff_ms = 500\nmax_backoff_ms = 100\n", "max_backoff_ms")]
#[case("[poll\n", "parse config")]
fn invalid_config_exits_with_5(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    Command::cargo_bin("tracker")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("health")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains(needle));
}

#[test]
fn missing_config_file_falls_back_to_sim_defaults() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("tracker")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend=sim"))
        .stdout(predicate::str::contains("interval_ms=1000"));
}

#[test]
fn unreachable_device_exits_with_3() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("http.toml");
    // Port 9 (discard) on localhost is closed on test machines
    fs::write(
        &path,
        "[device]\nbackend = \"http\"\nbase_url = \"http://127.0.0.1:9\"\ntimeout_ms = 200\n[retry]\nmax_attempts = 1\n",
    )
    .unwrap();

    Command::cargo_bin("tracker")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("--log-level")
        .arg("error")
        .arg("self-check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("What happened"));
}

#[rstest]
#[case(r#"{"mode": "manual", "man": {"pitch": 10, "yaw": 90}}"#, 0, "setting data received", "stdout")]
#[case(r#"{"mode": "turbo"}"#, 4, "Invalid mode", "stderr")]
#[case("mode=manual", 1, "Malformed data", "stderr")]
fn setting_set_from_file(
    #[case] body: &str,
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_sim_config(&dir);
    let file = dir.path().join("setting.json");
    fs::write(&file, body).unwrap();

    let assert = Command::cargo_bin("tracker")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--log-level")
        .arg("error")
        .args(["setting", "set", "--file"])
        .arg(&file)
        .assert()
        .code(exit_code);
    if stream == "stdout" {
        assert.stdout(predicate::str::contains(needle));
    } else {
        assert.stderr(predicate::str::contains(needle));
    }
}
