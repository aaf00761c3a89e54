//! Smoke tests for the `tokenpulse` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn tokenpulse() -> Command {
    let mut cmd = Command::cargo_bin("tokenpulse").unwrap();
    cmd.env_remove("TOKENPULSE_LOG_LEVEL")
        .env_remove("TOKENPULSE_DEPTH_LEVELS")
        .env_remove("TOKENPULSE_VOLATILITY_LOOKBACK_MS")
        .env_remove("TOKENPULSE_CONFIG");
    cmd
}

#[test]
fn prints_default_config() {
    tokenpulse()
        .arg("--print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[risk.weights]"))
        .stdout(predicate::str::contains("volatility_lookback_ms = 3600000"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tokenpulse.toml");

    tokenpulse().args(["init", "--commented", "--output"]).arg(&path).assert().success();
    assert!(std::fs::read_to_string(&path).unwrap().contains("TokenPulse Configuration"));

    tokenpulse()
        .args(["init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    tokenpulse().args(["init", "--force", "--output"]).arg(&path).assert().success();
    tokenpulse()
        .args(["check-config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn check_config_rejects_bad_thresholds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "version = \"0.1.0\"\n\n[risk.thresholds]\nhigh = 99.0\n").unwrap();

    tokenpulse()
        .args(["check-config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("elevated <= high <= severe"));
}

#[test]
fn analyze_writes_report() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("tokenpulse.toml");
    let input = dir.path().join("request.json");
    let output = dir.path().join("out").join("report.json");

    tokenpulse().args(["init", "--output"]).arg(&config).assert().success();
    std::fs::write(
        &input,
        r#"{
            "nowMs": 1700000000000,
            "addresses": ["a", "b", "c", "d"],
            "riskInput": { "volumeChangeRatio": 1.0, "flashloanDetected": true,
                           "smartWalletDensity": 1.0, "sybilOverlapScore": 1.0 }
        }"#,
    )
    .unwrap();

    tokenpulse()
        .args(["analyze", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\": \"Severe\""))
        .stdout(predicate::str::contains("\"txEntropyScore\": 100"));

    tokenpulse()
        .args(["analyze", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["risk"]["score"], serde_json::json!(100.0));
    assert_eq!(report["entropy"]["verdict"], serde_json::json!("fragmented"));
}

#[test]
fn analyze_reports_missing_input() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("tokenpulse.toml");
    tokenpulse().args(["init", "--output"]).arg(&config).assert().success();

    tokenpulse()
        .args(["analyze", "--input"])
        .arg(dir.path().join("nope.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
