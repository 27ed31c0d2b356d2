use std::fs;
use std::path::Path;
use std::process::{Output, Stdio};

use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

/// Run the binary in `dir` with `args`, feeding `input` on stdin.
async fn run_cinelog(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_cinelog"))
        .args(args)
        .current_dir(dir)
        .env_remove("CINELOG_CONFIG")
        .env("RUST_LOG", "error") // Quiet logs during tests
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn cinelog");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).await.unwrap();
    drop(stdin);

    child.wait_with_output().await.unwrap()
}

#[tokio::test]
async fn test_csv_session_persists_movies() {
    let dir = TempDir::new().unwrap();

    let output = run_cinelog(
        dir.path(),
        &["--backend", "csv"],
        "2\nInception\n2010\n8.8\n\n\n1\n\n0\n",
    )
    .await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Movie 'Inception' successfully added."));
    assert!(stdout.contains("Inception: 8.8, 2010"));
    assert!(stdout.contains("Exiting program. Goodbye!"));

    let written = fs::read_to_string(dir.path().join("movies.csv")).unwrap();
    assert_eq!(written, "title,rating,year,Poster\nInception,8.8,2010,\n");
}

#[tokio::test]
async fn test_json_catalog_survives_restart() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("data.json"),
        r#"{"Up": {"rating": 8.3, "year": 2009, "Poster": ""}}"#,
    )
    .unwrap();

    let output = run_cinelog(dir.path(), &[], "4\nUp\n9\n\n0\n").await;
    assert!(output.status.success());

    let output = run_cinelog(dir.path(), &[], "8\n\n0\n").await;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Up: 9.0"));
}

#[tokio::test]
async fn test_print_config_redacts_api_key() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("cinelog.toml"),
        "[storage]\nbackend = \"json\"\n\n[omdb]\napi_key = \"super-secret\"\n",
    )
    .unwrap();

    let output = run_cinelog(dir.path(), &["--print-config"], "").await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("super-secret"));

    let printed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(printed["storage"]["backend"], "json");
    assert_eq!(printed["omdb"]["api_key_configured"], true);
}

#[tokio::test]
async fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    let output = run_cinelog(dir.path(), &["--config", "nope.toml"], "0\n").await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.toml"));
}
