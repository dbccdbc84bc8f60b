use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Write;

#[test]
fn flight_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("flight.csv");
    let png_path = dir.path().join("flight.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "time_s,altitude_km,velocity_m_s,mass_kg,thrust_n,stage").unwrap();
    for i in 0..40 {
        let t = i as f64 * 2.0;
        let stage = if i < 20 { 1 } else { 2 };
        writeln!(
            file,
            "{t:.6},{:.6},{:.6},{:.3},{:.3},{stage}",
            0.01 * t * t,
            15.0 * t,
            24_000.0 - 150.0 * t,
            if stage == 1 { 400_000.0 } else { 100_000.0 },
        )
        .unwrap();
    }

    Command::cargo_bin("flight_plot")
        .expect("flight_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "800",
            "--height",
            "600",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn flight_plot_rejects_foreign_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("wrong.csv");
    let png_path = dir.path().join("wrong.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();

    Command::cargo_bin("flight_plot")
        .expect("flight_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
        ])
        .assert()
        .failure();
}
