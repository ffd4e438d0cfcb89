//! End-to-end tests driving the `terrascan-infer` binary over stdin/stdout.

use std::collections::BTreeSet;
use std::io::Write;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;

fn terrascan() -> Command {
    cargo_bin_cmd!("terrascan-infer")
}

fn analyze(input: &str) -> Value {
    let output = terrascan()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout is one JSON document")
}

fn classes(value: &Value) -> BTreeSet<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn test_help() {
    terrascan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fixture"))
        .stdout(predicate::str::contains("--pretty"));
}

#[test]
fn test_sector_five_example() {
    let result = analyze(r#"{"coordinates": [12.9, 77.6], "area": "Sector 5"}"#);

    assert_eq!(result["total_objects"], 3);
    assert_eq!(result["coordinates"], serde_json::json!([12.9, 77.6]));
    assert_eq!(result["area"], "Sector 5");

    let expected: BTreeSet<String> = ["building", "car", "person"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(classes(&result["object_types"]), expected);

    let person = &result["change_analysis"]["changes"]["person"];
    assert_eq!(person["change_percent"], 100.0);
    assert_eq!(person["current"], 1);
    assert_eq!(person["historical"], 0);
    assert_eq!(result["change_analysis"]["change_detected"], true);
}

#[test]
fn test_totals_match_detection_lists() {
    let result = analyze(r#"{"coordinates": "tile-9", "image_url": "now.png"}"#);

    let current = result["current_detections"].as_array().unwrap();
    let historical = result["historical_detections"].as_array().unwrap();
    assert_eq!(result["total_objects"], current.len());
    assert_eq!(
        result["change_analysis"]["total_current_objects"],
        current.len()
    );
    assert_eq!(
        result["change_analysis"]["total_historical_objects"],
        historical.len()
    );

    let from_detections: BTreeSet<String> = current
        .iter()
        .map(|d| d["class"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(classes(&result["object_types"]), from_detections);
}

#[test]
fn test_repeated_runs_differ_only_in_timestamp() {
    let input = r#"{"coordinates": [1, 2], "area": "Dock"}"#;
    let mut first = analyze(input);
    let mut second = analyze(input);

    assert!(first["timestamp"].is_string());
    first["timestamp"] = Value::Null;
    second["timestamp"] = Value::Null;
    assert_eq!(first, second);
}

#[test]
fn test_missing_coordinates_fails() {
    let output = terrascan()
        .write_stdin("{}")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .get_output()
        .stderr
        .clone();

    let report: Value = serde_json::from_slice(&output).unwrap();
    let message = report["error"].as_str().unwrap();
    assert!(message.contains("coordinates"), "{message}");
    assert_eq!(report["kind"], "validation");
    assert!(report["timestamp"].is_string());
}

#[test]
fn test_null_coordinates_fail() {
    terrascan()
        .write_stdin(r#"{"coordinates": null, "area": "x"}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing required parameter: coordinates"));
}

#[test]
fn test_malformed_input_fails() {
    terrascan()
        .write_stdin("{\"coordinates\": [1, 2]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed_json"));
}

#[test]
fn test_fixture_detector() {
    let mut fixture = tempfile::NamedTempFile::new().unwrap();
    write!(
        fixture,
        r#"{{
            "current": [
                {{"class": "truck", "confidence": 0.66, "bbox": [0, 0, 40, 20]}},
                {{"class": "truck", "confidence": 0.71, "bbox": [50, 0, 90, 20]}}
            ],
            "historical": [
                {{"class": "truck", "confidence": 0.64, "bbox": [0, 0, 40, 20]}},
                {{"class": "person", "confidence": 0.52, "bbox": [5, 5, 9, 15]}}
            ],
            "note": "recorded survey"
        }}"#
    )
    .unwrap();

    let output = terrascan()
        .arg("--fixture")
        .arg(fixture.path())
        .write_stdin(r#"{"coordinates": [0, 0], "historical_image_url": "then.png"}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(result["total_objects"], 2);
    assert_eq!(result["note"], "recorded survey");
    let changes = &result["change_analysis"]["changes"];
    assert_eq!(changes["truck"]["change_percent"], 100.0);
    assert_eq!(changes["person"]["change"], -1);
    assert_eq!(changes["person"]["change_percent"], -100.0);
    assert!(
        result["environmental_summary"]
            .as_str()
            .unwrap()
            .contains("Vehicle activity: 2 vehicles")
    );
}

#[test]
fn test_fixture_without_historical_image_has_empty_baseline() {
    let mut fixture = tempfile::NamedTempFile::new().unwrap();
    write!(
        fixture,
        r#"{{
            "current": [{{"class": "car", "confidence": 0.8, "bbox": [0, 0, 10, 10]}}],
            "historical": [{{"class": "car", "confidence": 0.8, "bbox": [0, 0, 10, 10]}}]
        }}"#
    )
    .unwrap();

    let output = terrascan()
        .arg("--fixture")
        .arg(fixture.path())
        .write_stdin(r#"{"coordinates": [0, 0]}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(result["historical_detections"], serde_json::json!([]));
    assert_eq!(result["change_analysis"]["changes"]["car"]["change_percent"], 100.0);
}

#[test]
fn test_falsy_coordinates_fail() {
    for body in [
        r#"{"coordinates": 0}"#,
        r#"{"coordinates": 0.0}"#,
        r#"{"coordinates": false}"#,
    ] {
        terrascan()
            .write_stdin(body)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("missing required parameter: coordinates"));
    }
}

#[test]
fn test_non_string_image_urls_pass_through() {
    analyze(r#"{"coordinates": [1, 2], "image_url": 123}"#);
    analyze(r#"{"coordinates": [1, 2], "historical_image_url": {"href": "then.png"}}"#);
}

#[test]
fn test_bad_fixture_is_reported_as_config_error() {
    terrascan()
        .args(["--fixture", "/nonexistent/fixture.json"])
        .write_stdin(r#"{"coordinates": [0, 0]}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("\"kind\":\"config\""));
}
