//! End-to-end runs of the library pipeline.

use hostprint_config::ResolvedConfig;
use hostprint_core::{PipelineError, PreprocessStats, RunRequest, run};
use hostprint_types::{Prediction, TreeCount};
use serde_json::json;

use crate::common::{Workspace, handshake, read_json, two_family_capture};

fn request(ws: &Workspace, input: &str) -> RunRequest {
    let mut config = ResolvedConfig::default();
    config.forest = config.forest.with_trees(TreeCount::new(15).unwrap());
    RunRequest::new(ws.path(input), ws.path("predictions.json"), &config)
}

#[test]
fn separable_capture_is_classified_perfectly() {
    let ws = Workspace::new();
    ws.write_jsonl("capture.jsonl", &two_family_capture(20));

    let summary = run(&request(&ws, "capture.jsonl")).unwrap();

    assert_eq!(summary.records, 40);
    assert_eq!(summary.test_rows, 8);
    assert_eq!(summary.train_rows, 32);
    assert!((summary.accuracy - 1.0).abs() < f64::EPSILON);
    assert_eq!(summary.predictions.len(), 40);
    for prediction in &summary.predictions {
        let expected = if prediction.ip.starts_with("10.0.0.") { "Linux" } else { "Windows" };
        assert_eq!(prediction.predicted_os, expected, "{}", prediction.ip);
        assert!(prediction.confidence > 0.5 && prediction.confidence <= 1.0);
    }
}

#[test]
fn output_file_matches_returned_predictions() {
    let ws = Workspace::new();
    ws.write_jsonl("capture.jsonl", &two_family_capture(10));

    let summary = run(&request(&ws, "capture.jsonl")).unwrap();
    let written: Vec<Prediction> =
        serde_json::from_value(read_json(&summary.output)).unwrap();
    assert_eq!(written.len(), summary.predictions.len());
    for (w, p) in written.iter().zip(&summary.predictions) {
        assert_eq!((&w.ip, &w.predicted_os), (&p.ip, &p.predicted_os));
        assert!((w.confidence - p.confidence).abs() < 1e-12);
    }

    let text = std::fs::read_to_string(&summary.output).unwrap();
    assert!(text.starts_with("[\n    {\n        \"ip\": "));
    assert!(text.ends_with("]\n"));
}

#[test]
fn predictions_follow_input_order_after_dedup() {
    let ws = Workspace::new();
    let mut records = two_family_capture(10);
    records.insert(3, records[0].clone());
    ws.write_jsonl("capture.jsonl", &records);

    let summary = run(&request(&ws, "capture.jsonl")).unwrap();
    assert_eq!(summary.stats.duplicates, 1);

    let ips: Vec<&str> = summary.predictions.iter().map(|p| p.ip.as_str()).collect();
    let mut expected: Vec<String> = Vec::new();
    for record in &records {
        let ip = record["ip"].as_str().unwrap().to_string();
        if !expected.contains(&ip) {
            expected.push(ip);
        }
    }
    assert_eq!(ips, expected);
}

#[test]
fn same_seed_gives_identical_output() {
    let ws = Workspace::new();
    let mut records = two_family_capture(12);
    // Overlapping hosts so the forest has something to disagree about.
    records.push(handshake("10.0.2.1", "Linux", "771", 31, 128));
    records.push(handshake("10.0.2.2", "macOS", "772", 17, 64));
    ws.write_jsonl("capture.jsonl", &records);

    let first = run(&request(&ws, "capture.jsonl")).unwrap();
    let second = run(&request(&ws, "capture.jsonl")).unwrap();
    assert_eq!(first.predictions, second.predictions);
    assert!((first.accuracy - second.accuracy).abs() < f64::EPSILON);
}

#[test]
fn stats_account_for_every_record() {
    let ws = Workspace::new();
    let mut records = two_family_capture(8);
    let mut no_ttl = handshake("10.9.9.9", "Linux", "772", 17, 64);
    no_ttl["tcpip"] = json!({ "ip": {} });
    records.push(no_ttl);
    records.push(records[1].clone());
    let mut unlabeled = handshake("10.9.9.10", "ignored", "772", 17, 64);
    unlabeled.as_object_mut().unwrap().remove("os_prediction");
    records.push(unlabeled);
    ws.write_jsonl("capture.jsonl", &records);

    let summary = run(&request(&ws, "capture.jsonl")).unwrap();
    assert_eq!(
        summary.stats,
        PreprocessStats {
            input: 19,
            duplicates: 1,
            incomplete: 1,
            kept: 17,
        }
    );
    assert!(
        summary
            .predictions
            .iter()
            .any(|p| p.ip == "10.9.9.10")
    );
}

#[test]
fn capture_without_usable_rows_is_rejected() {
    let ws = Workspace::new();
    ws.write_jsonl("capture.jsonl", &[json!({ "ip": "1.1.1.1" }), json!({})]);

    let err = run(&request(&ws, "capture.jsonl")).unwrap_err();
    assert!(matches!(err, PipelineError::NoUsableRows { records: 2 }));
    assert!(!ws.path("predictions.json").exists());
}

#[test]
fn single_row_cannot_be_split() {
    let ws = Workspace::new();
    ws.write_jsonl("capture.jsonl", &[handshake("1.1.1.1", "Linux", "772", 17, 64)]);

    let err = run(&request(&ws, "capture.jsonl")).unwrap_err();
    assert!(matches!(err, PipelineError::DatasetTooSmall { rows: 1, .. }));
}

#[test]
fn malformed_line_fails_unless_skipped() {
    let ws = Workspace::new();
    let mut body: String = two_family_capture(6).iter().map(|r| format!("{r}\n")).collect();
    body.push_str("{truncated\n");
    ws.write("capture.jsonl", &body);

    let err = run(&request(&ws, "capture.jsonl")).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedLine { line: 13, .. }));

    let mut lenient = request(&ws, "capture.jsonl");
    lenient.load.skip_malformed = true;
    let summary = run(&lenient).unwrap();
    assert_eq!(summary.records, 12);
}

#[test]
fn missing_input_is_an_io_error() {
    let ws = Workspace::new();
    let err = run(&request(&ws, "absent.jsonl")).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}
