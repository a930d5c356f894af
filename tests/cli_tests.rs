//! End-to-end tests for the `brasa` binary
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional
//!
//! analyze, compare and chunk subcommands in text and JSON form, plus
//! configuration file handling and error exits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn brasa() -> Command {
    Command::cargo_bin("brasa").unwrap()
}

#[test]
fn test_analyze_text_report() {
    brasa()
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Profile Analysis: /api/orders"))
        .stdout(predicate::str::contains("## Hot Paths"))
        .stdout(predicate::str::contains("### Path 1: 40.0% of samples, 160ms"))
        .stdout(predicate::str::contains("| `execute` |").not());
}

#[test]
fn test_analyze_all_frames() {
    brasa()
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .arg("--all-frames")
        .arg("--max-hot-paths")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("- **View**: All frames"))
        .stdout(predicate::str::contains("| `execute` |"))
        .stdout(predicate::str::contains("### Path 2").not());
}

#[test]
fn test_analyze_json_output() {
    let output = brasa()
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["transaction_name"], "/api/orders");
    assert_eq!(json["has_profile_data"], true);
    assert_eq!(json["hot_paths"].as_array().unwrap().len(), 5);
    assert_eq!(json["hot_paths"][0]["sample_count"], 16);

    let hotspots = json["hotspots"].as_array().unwrap();
    assert_eq!(hotspots.len(), 5);
    assert_eq!(hotspots[0]["frame"]["name"], "main");
    assert_eq!(hotspots[0]["insights"][0], "consistent");
}

#[test]
fn test_analyze_empty_payload_prints_message() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.json");
    fs::write(&path, r#"{"platform": "python", "transactionName": "/health"}"#).unwrap();

    brasa()
        .arg("analyze")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No profile data available for this transaction.",
        ));
}

/// Samples reference frames, but the frame table is empty
const FRAMELESS_PAYLOAD: &str = r#"{
    "platform": "python",
    "transactionName": "/frameless",
    "profiles": [{"samples": [[3, 4]], "sample_counts": [1], "sample_durations_ns": [1000000], "weights": [1.0]}],
    "shared": {"frames": [], "frame_infos": [], "profiles": []}
}"#;

#[test]
fn test_analyze_json_without_frames_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("frameless.json");
    fs::write(&path, FRAMELESS_PAYLOAD).unwrap();

    let output = brasa()
        .arg("analyze")
        .arg(&path)
        .arg("--all-frames")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["transaction_name"], "/frameless");
    assert_eq!(json["has_profile_data"], false);
    assert_eq!(json["hot_paths"].as_array().unwrap().len(), 0);
    assert_eq!(json["hotspots"].as_array().unwrap().len(), 0);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("unknown"));
}

#[test]
fn test_compare_json_without_frames_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("frameless.json");
    fs::write(&path, FRAMELESS_PAYLOAD).unwrap();

    let output = brasa()
        .arg("compare")
        .arg(fixture("flamegraph_baseline.json"))
        .arg(&path)
        .arg("--all-frames")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["has_profile_data"], false);
    assert_eq!(json["summary"]["major_regressions"], 0);
    assert_eq!(json["comparisons"].as_array().unwrap().len(), 0);
}

#[test]
fn test_analyze_missing_file_fails() {
    brasa()
        .arg("analyze")
        .arg("/nonexistent/flamegraph.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load flamegraph"));
}

#[test]
fn test_analyze_invalid_json_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    brasa()
        .arg("analyze")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid profile JSON"));
}

#[test]
fn test_analyze_zero_hot_paths_rejected() {
    brasa()
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .arg("--max-hot-paths")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_hot_paths must be at least 1"));
}

#[test]
fn test_compare_text_report() {
    brasa()
        .arg("compare")
        .arg(fixture("flamegraph_baseline.json"))
        .arg(fixture("flamegraph_current.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Profile Comparison: /api/orders"))
        .stdout(predicate::str::contains("🔴 Major regression"))
        .stdout(predicate::str::contains("## Improvements").not());
}

#[test]
fn test_compare_json_all_frames() {
    let output = brasa()
        .arg("compare")
        .arg(fixture("flamegraph_baseline.json"))
        .arg(fixture("flamegraph_current.json"))
        .arg("--all-frames")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["has_profile_data"], true);
    assert_eq!(json["summary"]["major_regressions"], 2);
    assert_eq!(json["summary"]["improvements"], 1);
    assert_eq!(json["comparisons"][0]["frame"]["name"], "execute");
    assert_eq!(json["comparisons"][0]["change_type"], "major_regression");
}

#[test]
fn test_chunk_text_report() {
    brasa()
        .arg("chunk")
        .arg(fixture("profile_chunk.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Profile Chunk Analysis"))
        .stdout(predicate::str::contains("| 140245 | MainThread | 4 |"))
        .stdout(predicate::str::contains("- **Samples**: 7 (1 invalid)"));
}

#[test]
fn test_chunk_user_code_json() {
    let output = brasa()
        .arg("chunk")
        .arg(fixture("profile_chunk.json"))
        .arg("--user-code")
        .arg("--max-frames")
        .arg("1")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let frames = json["top_frames"].as_array().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["frame"]["function"], "handle_order");
}

#[test]
fn test_chunk_zero_max_frames_rejected() {
    brasa()
        .arg("chunk")
        .arg(fixture("profile_chunk.json"))
        .arg("--max-frames")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-frames must be at least 1"));
}

#[test]
fn test_config_file_applies() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("brasa.toml");
    fs::write(
        &config,
        "[analysis]\nfocus_on_user_code = false\nmax_hot_paths = 2\n",
    )
    .unwrap();

    brasa()
        .arg("--config")
        .arg(&config)
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("- **View**: All frames"))
        .stdout(predicate::str::contains("### Path 2"))
        .stdout(predicate::str::contains("### Path 3").not());
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("brasa.toml");
    fs::write(&config, "[chunk]\nmax_frames = 0\n").unwrap();

    brasa()
        .arg("chunk")
        .arg(fixture("profile_chunk.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_debug_flag_logs_to_stderr() {
    brasa()
        .arg("--debug")
        .arg("analyze")
        .arg(fixture("flamegraph_baseline.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed flamegraph"))
        .stdout(predicate::str::contains("parsed flamegraph").not());
}

#[test]
fn test_help_lists_subcommands() {
    brasa()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("chunk"));
}
