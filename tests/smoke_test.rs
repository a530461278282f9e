/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

#[test]
fn binary_shows_help() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("latglobe"),
        "Help output should mention latglobe"
    );
    assert!(
        stdout.contains("globe") && stdout.contains("distance"),
        "Help output should list the subcommands"
    );
}

#[test]
fn binary_shows_version() {
    let output = Command::new("cargo")
        .args(["run", "--", "--version"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = Command::new("cargo")
        .args(["run", "--", "nonexistent-command"])
        .output()
        .expect("Failed to execute cargo run");

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn pairs_mock_flag_wins_over_an_environment_token() {
    let output = Command::new("cargo")
        .args(["run", "--", "pairs", "--mock", "--seed", "1"])
        .env("CLOUDFLARE_API_TOKEN", "dummy")
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "pairs --mock failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("(mock)"),
        "pairs --mock should report the mock source, got: {stdout}"
    );
}

#[test]
fn distance_reports_a_known_pair() {
    let output = Command::new("cargo")
        .args(["run", "--", "distance", "binance", "gcp-nl"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        output.status.success(),
        "distance failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("km"), "distance output should include km");
    assert!(stdout.contains("ms"), "distance output should include latency");
}

#[test]
fn distance_rejects_unknown_ids() {
    let output = Command::new("cargo")
        .args(["run", "--", "distance", "ftx", "aws-sg"])
        .output()
        .expect("Failed to execute cargo run");

    assert!(
        !output.status.success(),
        "Unknown endpoint should return error status"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"));
}
