#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

fn config() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("quadkey.toml");
    fs::write(&path, "[identifier]\nid_size = 8\n").expect("write config");
    (dir, path)
}

fn run_json(args: &[&str]) -> Value {
    let (_dir, path) = config();
    let output = cargo_bin_cmd!("quadkey")
        .arg("--config")
        .arg(&path)
        .args(["--format", "json"])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("valid json")
}

#[test]
fn encode_then_decode() {
    let encoded = run_json(&["encode", "\"chat\"@fr"]);
    assert_eq!(encoded["tag"], "LANGUAGE_HASH_LITERAL");
    let hex = encoded["hex"].as_str().expect("hex string");
    let decoded = run_json(&["decode", hex]);
    assert_eq!(decoded["value"], "\"chat\"@fr");
}

#[test]
fn id_reports_width_and_roles() {
    let json = run_json(&["id", "<http://example.org/x>"]);
    assert_eq!(json["id"].as_str().map(str::len), Some(16));
    assert_eq!(json["kind"], "Iri");
    assert_eq!(json["string"], false);
    let iri = json["iri"].as_str().expect("minted iri");
    assert!(iri.starts_with("<urn:quadkey:id:"));
}

#[test]
fn keys_lists_six_indices() {
    let json = run_json(&["keys", "<http://example.org/s> <http://example.org/p> 42 ."]);
    let names: Vec<_> = json
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["index"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["SPO", "POS", "OSP", "CSPO", "CPOS", "COSP"]);
}

#[test]
fn partition_and_splits() {
    let first = run_json(&["partition", "--index", "POS", "--count", "4", "--fork", "0"]);
    assert_eq!(first["start"], "01");
    let keys = run_json(&["splits", "--bits", "1"]);
    assert_eq!(keys.as_array().map(Vec::len), Some(13));
}

#[test]
fn bad_input_fails_with_a_message() {
    let (_dir, path) = config();
    let output = cargo_bin_cmd!("quadkey")
        .arg("--config")
        .arg(&path)
        .args(["partition", "--count", "3"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("power of two"), "{stderr}");

    cargo_bin_cmd!("quadkey")
        .arg("--config")
        .arg(&path)
        .args(["decode", "ee"])
        .assert()
        .failure();
}
