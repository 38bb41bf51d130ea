//! Runs the compiled binary with `--query` against the built-in mock database.

use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn run_headless(args: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.toml");

    Command::new(env!("CARGO_BIN_EXE_rangeview"))
        .arg("--mock-db")
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RANGEVIEW_DB_URL")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run rangeview binary")
}

#[test]
fn test_count_query_prints_json() {
    let output = run_headless(&["--query", "SELECT COUNT(*) AS n FROM games;"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "[\n  {\n    \"n\": 3\n  }\n]\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("Done. 1 row(s)."));
}

#[test]
fn test_blank_query_prompts_for_input() {
    let output = run_headless(&["--query", "   "]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Please enter a SQL query.\n"
    );
}

#[test]
fn test_unknown_query_prints_no_rows() {
    let output = run_headless(&["-q", "SELECT * FROM games WHERE 0"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No rows.\n");
}

#[test]
fn test_param_without_query_is_rejected() {
    let output = run_headless(&["--param", "1"]);
    assert!(!output.status.success());
}
