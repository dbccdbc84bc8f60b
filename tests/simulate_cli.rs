use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const HEADER: &str = "time_s,altitude_km,velocity_m_s,mass_kg,thrust_n,stage";

#[test]
fn simulate_writes_csv_and_sidecar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("flight.csv");
    let json_path = dir.path().join("flight.json");

    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args([
            "--mission",
            "data/missions/single_stage_solid.yaml",
            "--output",
            csv_path.to_str().unwrap(),
            "--summary",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Single Stage Solid Demo"))
        .stdout(predicate::str::contains("Stage 1 separation"))
        .stdout(predicate::str::contains("Max altitude"));

    let csv = fs::read_to_string(&csv_path).expect("csv");
    assert!(csv.lines().next() == Some(HEADER));
    assert!(csv.lines().count() > 10, "expected a real trajectory");

    let sidecar = fs::read_to_string(&json_path).expect("sidecar");
    assert!(sidecar.contains("\"mission\": \"Single Stage Solid Demo\""));
    assert!(sidecar.contains("\"stage_count\": 1"));
    assert!(sidecar.contains("\"engine_type\": \"Solid\""));
}

#[test]
fn simulate_streams_csv_to_stdout() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args([
            "--mission",
            "data/missions/single_stage_solid.yaml",
            "--output",
            "-",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(HEADER));
}

#[test]
fn simulate_reports_missing_mission_file() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(["--mission", "data/missions/never_written.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
