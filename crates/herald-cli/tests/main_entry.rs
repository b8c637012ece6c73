//! Integration tests for the `herald` binary entry point.
//!
//! Verifies the recognizer settings probe and user-facing errors when the
//! invocation is incomplete.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn recognizer_settings_probe_succeeds() {
    let mut command = cargo_bin_cmd!("herald");
    command.arg("--recognizer-settings");
    command
        .assert()
        .success()
        .stdout(contains("\"language\": \"en-US\""));
}

#[test]
fn send_without_target_exits_with_failure() {
    let mut command = cargo_bin_cmd!("herald");
    command.env_remove("HERALD_TARGET");
    command.args(["send", "stop"]);
    command
        .assert()
        .failure()
        .stderr(contains("no target address configured"));
}

#[test]
fn malformed_target_flag_exits_with_failure() {
    let mut command = cargo_bin_cmd!("herald");
    command.args(["--target", "robot.local", "send", "stop"]);
    command
        .assert()
        .failure()
        .stderr(contains("Not a valid ip:port combination"));
}
