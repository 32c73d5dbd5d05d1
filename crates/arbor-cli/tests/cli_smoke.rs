use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

fn vine_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("vines.json");
    fs::write(
        &path,
        r#"{
            "nodes": [
                {"id": "printing", "title": "Printing Press", "vine": "technology",
                 "time_height": 1440.0, "shoots": ["reformation"]},
                {"id": "reformation", "title": "Reformation", "vine": "history",
                 "time_height": 1517.0}
            ]
        }"#,
    )
    .expect("write fixture");
    path
}

#[test]
fn unknown_flag_exits_with_usage() {
    let exe = assert_cmd::cargo_bin!("arbor-cli");
    let assert = Command::new(exe).arg("--bogus").assert().code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("USAGE"));
}

#[test]
fn render_writes_svg_for_a_vine_data_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = vine_fixture(tmp.path());
    let out = tmp.path().join("out.svg");

    let exe = assert_cmd::cargo_bin!("arbor-cli");
    Command::new(exe)
        .args([
            "render",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Printing Press"));
    assert!(svg.contains(r#"class="connection successor""#));
}

#[test]
fn render_fails_cleanly_when_data_is_missing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let exe = assert_cmd::cargo_bin!("arbor-cli");
    Command::new(exe)
        .current_dir(tmp.path())
        .args(["render", "definitely-missing.json"])
        .assert()
        .code(1);
}

#[test]
fn estimate_prints_a_row_per_credential() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("credentials.json");
    fs::write(
        &path,
        r#"{
            "credentials": [
                {"id": "m-k1", "title": "Counting", "cadence": "seasonal",
                 "category": "MATH", "level": "K-1", "duration_weeks": 10}
            ]
        }"#,
    )
    .expect("write fixture");

    let exe = assert_cmd::cargo_bin!("arbor-cli");
    let assert = Command::new(exe)
        .args(["estimate", path.to_string_lossy().as_ref()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let rows: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json rows");
    assert_eq!(rows[0]["id"], "m-k1");
    assert_eq!(rows[0]["estimated_weeks"], 9);
}

#[test]
fn match_without_a_cache_reports_no_courses() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("credentials.json");
    fs::write(&path, r#"{"credentials": []}"#).expect("write fixture");

    let exe = assert_cmd::cargo_bin!("arbor-cli");
    let assert = Command::new(exe)
        .current_dir(tmp.path())
        .args(["match", path.to_string_lossy().as_ref()])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("no cached courses"));
}
