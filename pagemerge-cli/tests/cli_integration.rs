//! Integration tests for the pagemerge CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn merge_cmd(baseline: &str, candidate: &str) -> Command {
    let mut cmd = Command::cargo_bin("pagemerge").unwrap();
    cmd.arg("merge")
        .arg("-b")
        .arg(fixture_path(baseline))
        .arg("-c")
        .arg(fixture_path(candidate));
    cmd
}

#[test]
fn test_merge_to_stdout() {
    merge_cmd("baseline.json", "empty.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha."))
        .stdout(predicate::str::contains("Beta."))
        .stdout(predicate::str::contains("\"file_name\": \"a.pdf\""))
        .stdout(predicate::str::contains("Footer X").not())
        .stderr(predicate::str::contains("chunks: 2 | mean length:"));
}

#[test]
fn test_quiet_suppresses_summary() {
    merge_cmd("baseline.json", "empty.json")
        .arg("-q")
        .assert()
        .success()
        .stderr(predicate::str::contains("chunks:").not());
}

#[test]
fn test_jsonl_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("merged.jsonl");

    merge_cmd("baseline.json", "candidate.json")
        .arg("-f")
        .arg("jsonl")
        .arg("-o")
        .arg(&output_file)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output_file).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["metadata"]["page"], 0);
    assert_eq!(lines[1]["metadata"]["page"], 1);
    assert!(lines[1]["content"]
        .as_str()
        .unwrap()
        .contains("second extractor"));
}

#[test]
fn test_report_records_offset() {
    let temp_dir = TempDir::new().unwrap();
    let report_file = temp_dir.path().join("report.json");

    merge_cmd("baseline.json", "candidate.json")
        .arg("-q")
        .arg("--report")
        .arg(&report_file)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_file).unwrap()).unwrap();
    assert_eq!(report["offsets"]["a.pdf"], -1);
    assert_eq!(report["candidate"]["accepted"], 2);

    // Restricting the search to no shift keeps the candidate pages as given
    merge_cmd("baseline.json", "candidate.json")
        .arg("-q")
        .arg("--offsets=0")
        .arg("--report")
        .arg(&report_file)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_file).unwrap()).unwrap();
    assert_eq!(report["offsets"]["a.pdf"], 0);
}

#[test]
fn test_repeated_runs_identical() {
    let run = || {
        merge_cmd("baseline.json", "candidate.json")
            .arg("-q")
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_missing_candidate() {
    merge_cmd("baseline.json", "nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("candidate file not found"));
}

#[test]
fn test_invalid_config_fails_before_inputs() {
    merge_cmd("nonexistent.json", "nonexistent.json")
        .arg("--target-len")
        .arg("100")
        .arg("--overlap")
        .arg("100")
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlap (100) must be less than target_len (100)"))
        .stderr(predicate::str::contains("not found").not());
}

#[test]
fn test_unparsable_input() {
    merge_cmd("broken.json", "empty.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_failed_run_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("merged.json");

    merge_cmd("broken.json", "empty.json")
        .arg("-o")
        .arg(&output_file)
        .assert()
        .failure();

    assert!(!output_file.exists());
}

#[test]
fn test_generate_validate_and_use_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("pagemerge.toml");

    Command::cargo_bin("pagemerge")
        .unwrap()
        .arg("generate-config")
        .arg("-o")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated successfully"));

    Command::cargo_bin("pagemerge")
        .unwrap()
        .arg("validate")
        .arg("--config")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    merge_cmd("baseline.json", "empty.json")
        .arg("--config")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha."));
}

#[test]
fn test_validate_rejects_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    fs::write(&config_file, "[chunking]\ntarget_len = 100\nmax_len = 50\n").unwrap();

    Command::cargo_bin("pagemerge")
        .unwrap()
        .arg("validate")
        .arg("--config")
        .arg(&config_file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_parallel_flag() {
    merge_cmd("baseline.json", "candidate.json")
        .arg("--parallel")
        .arg("--threads")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("second extractor"));
}

#[test]
fn test_version() {
    Command::cargo_bin("pagemerge")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pagemerge"));
}
