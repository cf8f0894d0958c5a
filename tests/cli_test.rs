//! Command-line validation test

use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
}

#[test]
fn test_cli_runs_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("metrics.json");
    let csv_path = dir.path().join("metrics.csv");

    let output = binary()
        .env("RUST_LOG", "info")
        .args(["--duration", "600", "--seed", "7", "--histogram", "5"])
        .arg("--metrics-path")
        .arg(&json_path)
        .arg("--csv-path")
        .arg(&csv_path)
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("=== SIMULATION COMPLETE ==="), "stderr: {stderr}");
    assert!(stderr.contains("Total vehicles:"));
    assert!(stdout.contains("Total vehicles:"), "stdout: {stdout}");
    assert!(json_path.exists());
    assert!(csv_path.exists());
}

#[test]
fn test_cli_dynamic_mode() {
    let output = binary()
        .args(["--duration", "300", "--dynamic", "--start-time", "28800"])
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());
}

#[test]
fn test_cli_rejects_negative_rate() {
    let output = binary()
        .args(["--duration", "60", "--north-rate=-0.5"])
        .output()
        .expect("failed to run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rate"), "stderr: {stderr}");
}

#[test]
fn test_cli_verbose_prints_intersection_summary() {
    let output = binary()
        .args(["--duration", "120", "--verbose"])
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Intersection Simulation Summary ==="), "stdout: {stdout}");
    assert!(stdout.contains("Time: 120.00s"));
    assert!(stdout.contains("North light:"));
    assert!(stdout.contains("Lane West #0"));
    assert!(stdout.contains("Total vehicles:"));
}
