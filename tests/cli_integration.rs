//! Integration tests for the studyplan CLI
//!
//! Runs the built binary against a temporary data directory.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run studyplan with a data directory and return (success, stdout, stderr)
fn run_studyplan(data_dir: &Path, args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyplan"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute studyplan");

    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn write_topics(dir: &Path) -> String {
    let path = dir.join("topics.json");
    std::fs::write(
        &path,
        r#"[
            {"name": "Arrays", "complexity": "Easy", "estimated_hours": 4},
            {"topic": "Dynamic Programming", "complexity": "Hard", "estimated_hours": 8}
        ]"#,
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    let (success, stdout, _) = run_studyplan(temp.path(), &["--version"]);
    assert!(success, "studyplan --version should succeed");
    assert!(stdout.contains("studyplan"));
}

#[test]
fn test_init_writes_config_and_database() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let (success, stdout, stderr) = run_studyplan(&data_dir, &["init"]);
    assert!(success, "init failed: {}", stderr);
    assert!(stdout.contains("Initialized"));
    assert!(data_dir.join("config.toml").exists());
    assert!(data_dir.join("studyplan.sqlite").exists());
}

#[test]
fn test_plan_json_output() {
    let temp = TempDir::new().unwrap();
    let topics = write_topics(temp.path());

    let (success, stdout, stderr) = run_studyplan(
        temp.path(),
        &[
            "plan", "--learner", "ada", "--topics", &topics, "--hours", "2", "--days", "10",
            "--today", "2024-01-08", "--json",
        ],
    );
    assert!(success, "plan failed: {}", stderr);

    let record: serde_json::Value = serde_json::from_str(&stdout).expect("plan output is JSON");
    let day_one = record["plan"]["days"]["1"].as_array().unwrap();
    assert_eq!(day_one[0]["type"], "study");
    assert_eq!(day_one[0]["topic"], "Arrays");
    assert_eq!(day_one.last().unwrap()["type"], "micro_test");
    assert_eq!(day_one.last().unwrap()["questions"], 5);
    assert_eq!(record["deadline_days"], 10);
}

#[test]
fn test_report_then_status_and_show() {
    let temp = TempDir::new().unwrap();
    let topics = write_topics(temp.path());
    let (success, _, stderr) = run_studyplan(
        temp.path(),
        &["plan", "--learner", "ada", "--topics", &topics, "--today", "2024-01-08"],
    );
    assert!(success, "plan failed: {}", stderr);

    let report = temp.path().join("report.json");
    std::fs::write(
        &report,
        r#"{
            "study_sessions": [{"topic_id": "Arrays", "hours": 1.5}],
            "micro_tests": [{"topic": "Arrays", "score": 0.9}],
            "expected_hours": 4,
            "actual_hours": 1
        }"#,
    )
    .unwrap();

    let (success, stdout, stderr) = run_studyplan(
        temp.path(),
        &[
            "report",
            "--learner",
            "ada",
            "--report",
            report.to_str().unwrap(),
            "--today",
            "2024-01-08",
        ],
    );
    assert!(success, "report failed: {}", stderr);
    assert!(stdout.contains("Consistency: 0.95"));
    assert!(stdout.contains("Learning speed: 0.85"));

    let (success, stdout, _) = run_studyplan(temp.path(), &["status", "--learner", "ada"]);
    assert!(success);
    assert!(stdout.contains("Arrays"));
    assert!(stdout.contains("Days recorded: 1"));
    assert!(stdout.contains("Plans stored: 1"));

    let (success, stdout, _) = run_studyplan(temp.path(), &["show", "--learner", "ada"]);
    assert!(success);
    assert!(stdout.contains("Day 1"));
    assert!(stdout.contains("micro_test"));
}

#[test]
fn test_invalid_hours_fail() {
    let temp = TempDir::new().unwrap();
    let topics = write_topics(temp.path());
    let (success, _, stderr) = run_studyplan(
        temp.path(),
        &["plan", "--learner", "ada", "--topics", &topics, "--hours", "0"],
    );
    assert!(!success);
    assert!(stderr.contains("hours per day must be positive"));
}

#[test]
fn test_revisions_for_unknown_learner() {
    let temp = TempDir::new().unwrap();
    let (success, stdout, _) = run_studyplan(temp.path(), &["revisions", "--learner", "nobody"]);
    assert!(success);
    assert!(stdout.contains("No topics due for revision"));
}
