//! The `hostprint` binary: argument handling, stdout contract, exit status.

use std::path::Path;
use std::process::{Command, Output};

use crate::common::{Workspace, read_json, two_family_capture};

fn hostprint(ws: &Workspace, args: &[&str]) -> Output {
    let config = ws.write("config.toml", "[forest]\ntrees = 10\n");
    Command::new(env!("CARGO_BIN_EXE_hostprint"))
        .args(args)
        .env("HOSTPRINT_CONFIG", &config)
        .env_remove("HOSTPRINT_TREES")
        .env_remove("HOSTPRINT_SEED")
        .env_remove("HOSTPRINT_TEST_SIZE")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn hostprint")
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn prints_accuracy_and_output_path() {
    let ws = Workspace::new();
    let input = ws.write_jsonl("capture.jsonl", &two_family_capture(10));
    let output = ws.path("out.json");

    let result = hostprint(&ws, &[arg(&input), arg(&output)]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let stdout = String::from_utf8(result.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout}");
    assert_eq!(lines[0], "Accuracy: 1.0");
    assert_eq!(lines[1], format!("Results saved to {}", output.display()));

    let written = read_json(&output);
    assert_eq!(written.as_array().map(Vec::len), Some(20));
}

#[test]
fn logs_stay_off_stdout() {
    let ws = Workspace::new();
    let input = ws.write_jsonl("capture.jsonl", &two_family_capture(5));
    let output = ws.path("out.json");

    let result = hostprint(&ws, &[arg(&input), arg(&output)]);
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(!stdout.contains("Loaded records"));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Loaded records"));
}

#[test]
fn quiet_suppresses_info_logs() {
    let ws = Workspace::new();
    let input = ws.write_jsonl("capture.jsonl", &two_family_capture(5));
    let output = ws.path("out.json");

    let result = hostprint(&ws, &[arg(&input), arg(&output), "--quiet"]);
    assert!(result.status.success());
    assert!(!String::from_utf8_lossy(&result.stderr).contains("Loaded records"));
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.starts_with("Accuracy: "));
}

#[test]
fn log_file_receives_logs() {
    let ws = Workspace::new();
    let input = ws.write_jsonl("capture.jsonl", &two_family_capture(5));
    let output = ws.path("out.json");
    let log = ws.path("logs/run.log");

    let result = hostprint(&ws, &[arg(&input), arg(&output), "--log-file", arg(&log)]);
    assert!(result.status.success());
    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("Model evaluated on holdout split"));
}

#[test]
fn missing_input_fails_without_output() {
    let ws = Workspace::new();
    let output = ws.path("out.json");

    let result = hostprint(&ws, &[arg(&ws.path("absent.jsonl")), arg(&output)]);
    assert!(!result.status.success());
    assert!(result.stdout.is_empty());
    assert!(!output.exists());
}

#[test]
fn invalid_override_is_rejected() {
    let ws = Workspace::new();
    let input = ws.write_jsonl("capture.jsonl", &two_family_capture(5));
    let output = ws.path("out.json");

    let result = hostprint(&ws, &[arg(&input), arg(&output), "--test-size", "1.5"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("invalid configuration"));
}
