//! tilt-cli 端到端测试
//!
//! 只覆盖不需要串口硬件的路径：配置管理与启动失败。

use assert_cmd::Command;
use predicates::prelude::*;

fn tilt() -> Command {
    let mut cmd = Command::cargo_bin("tilt-cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    tilt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run").and(predicate::str::contains("config")));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tilt.toml");

    tilt()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    tilt()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("device = \"/dev/ttyACM0\"")
                .and(predicate::str::contains("output = \"HDMI-2\""))
                .and(predicate::str::contains("gate_mode = \"legacy\"")),
        );
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tilt.toml");
    std::fs::write(&path, "[display]\noutput = \"DP-1\"\n").unwrap();

    tilt()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    tilt()
        .args(["config", "init", "--force", "--path"])
        .arg(&path)
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("HDMI-2"));
}

#[test]
fn test_config_show_rejects_invalid_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[filter]\nratio_lower = 2.0\nratio_upper = 1.0\n").unwrap();

    tilt()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ratio_lower"));
}

#[test]
fn test_run_fails_on_missing_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tilt.toml");
    std::fs::write(&path, "").unwrap();

    tilt()
        .args(["run", "--dry-run", "--device", "/nonexistent/ttyTILT", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/ttyTILT"));
}
