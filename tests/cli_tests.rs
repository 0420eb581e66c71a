//! Integration tests for the marq CLI
//!
//! These tests run the marq binary and verify CLI surface behavior: help,
//! exit codes, structured JSON error envelopes, and the commands that work
//! without a configured record store. Store semantics themselves are
//! covered by unit tests in marq-core.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for marq with a config path that resolves to defaults,
/// so a developer's real config file never leaks into the tests
fn marq() -> Command {
    let mut cmd = cargo_bin_cmd!("marq");
    cmd.env_remove("MARQ_STORE_URL");
    cmd.env_remove("MARQ_STORE_TIMEOUT");
    cmd.args(["--config", "/nonexistent/marq-test-config.toml"]);
    cmd
}

// ============================================================================
// Help and version tests
// ============================================================================

#[test]
fn test_help_flag() {
    marq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: marq"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("grade"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("rubric"));
}

#[test]
fn test_version_flag() {
    marq()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("marq"));
}

#[test]
fn test_subcommand_help() {
    marq()
        .args(["grade", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interactive grading wizard"));
}

// ============================================================================
// Exit code tests
// ============================================================================

#[test]
fn test_no_command_exit_code_2() {
    marq().assert().code(2);
}

#[test]
fn test_unknown_format_exit_code_2() {
    marq().args(["--format", "records", "list"]).assert().code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    marq()
        .args(["--format", "json", "list", "--bogus-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_duplicate_format_json_usage_error() {
    marq()
        .args(["--format", "json", "--format", "human", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"duplicate_format\""));
}

#[test]
fn test_unknown_command_exit_code_2() {
    marq().arg("nonexistent").assert().code(2);
}

#[test]
fn test_unknown_command_json_usage_error() {
    marq()
        .args(["--format", "json", "nonexistent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_invalid_course_filter_exit_code_2() {
    marq()
        .args(["list", "--course", "weekend_intensive"])
        .assert()
        .code(2);
}

// ============================================================================
// Store configuration
// ============================================================================

#[test]
fn test_list_without_store_url_exit_code_3() {
    marq()
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no store URL configured"));
}

#[test]
fn test_store_not_configured_json_envelope() {
    marq()
        .args(["--format", "json", "export"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"store_not_configured\""));
}

#[test]
fn test_overview_without_store_url_exit_code_3() {
    marq().arg("overview").assert().code(3);
}

#[test]
fn test_store_url_from_config_file() {
    // nothing listens on port 1, so a configured URL fails with a
    // transport error (exit 1) instead of the unconfigured data error
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "store_url = \"http://127.0.0.1:1\"\ntimeout_seconds = 5\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("marq");
    cmd.env_remove("MARQ_STORE_URL");
    cmd.env_remove("MARQ_STORE_TIMEOUT");
    cmd.args(["--config", config_path.to_str().unwrap(), "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("store request failed"));
}

#[test]
fn test_store_url_flag_overrides() {
    marq()
        .args(["--store-url", "http://127.0.0.1:1", "list"])
        .assert()
        .code(1);
}

// ============================================================================
// Grade wizard preconditions
// ============================================================================

#[test]
fn test_grade_requires_tty() {
    // assert_cmd pipes stdin, so the wizard must refuse with a usage error
    marq()
        .args(["--store-url", "http://127.0.0.1:1", "grade"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interactive terminal required"));
}

// ============================================================================
// Rubric command (no store needed)
// ============================================================================

#[test]
fn test_rubric_human_output() {
    marq()
        .arg("rubric")
        .assert()
        .success()
        .stdout(predicate::str::contains("Metacognitive Self-Awareness"))
        .stdout(predicate::str::contains("KTS Framework Application"))
        .stdout(predicate::str::contains("Cognitive Transformation"))
        .stdout(predicate::str::contains("Development Pathway"))
        .stdout(predicate::str::contains("Missing KTS appendix"))
        .stdout(predicate::str::contains("Outstanding"))
        .stdout(predicate::str::contains("85–100%"));
}

#[test]
fn test_rubric_json_output_is_well_formed() {
    let output = marq()
        .args(["--format", "json", "rubric"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["pillars"].as_array().unwrap().len(), 4);
    assert_eq!(value["bands"].as_array().unwrap().len(), 5);
    assert_eq!(value["red_flags"]["critical"].as_array().unwrap().len(), 5);
    assert_eq!(value["red_flags"]["moderate"].as_array().unwrap().len(), 5);
    assert_eq!(value["cross_pillar_checks"].as_array().unwrap().len(), 7);

    let max_total: i64 = value["pillars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["max_points"].as_i64().unwrap())
        .sum();
    assert_eq!(max_total, 100);
}

#[test]
fn test_rubric_quiet_still_prints_data() {
    marq()
        .args(["--quiet", "rubric"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pillars:"));
}
