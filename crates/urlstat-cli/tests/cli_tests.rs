//! End-to-end tests for the urlstat binary
//!
//! These tests run the compiled binary against a local mock server:
//! - `get` output modes and failures
//! - `from-csv` over one table and over a whole directory
//! - Exit codes for fatal and usage errors

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Binary isolated from the caller's environment and working directory
fn urlstat(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("urlstat").unwrap();
    cmd.current_dir(workdir)
        .env_remove("URLSTAT_INPUT_DIR")
        .env_remove("URLSTAT_OUTPUT_DIR")
        .env_remove("URLSTAT_CACHE_TTL_MS")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FILTER");
    cmd
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("body"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_prints_status() {
    let server = MockServer::start().await;
    mount_status(&server, "/ok", 200).await;
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .args(["get", "--url", &format!("{}/ok", server.uri())])
        .assert()
        .success()
        .stdout(predicate::str::contains("Responded with status: 200"));
}

#[tokio::test]
async fn test_get_reports_error_statuses() {
    let server = MockServer::start().await;
    mount_status(&server, "/gone", 404).await;
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .args(["get", "--url", &format!("{}/gone", server.uri())])
        .assert()
        .success()
        .stdout(predicate::str::contains("Responded with status: 404"));
}

#[tokio::test]
async fn test_get_json_output() {
    let server = MockServer::start().await;
    mount_status(&server, "/ok", 200).await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/ok", server.uri());

    let output = urlstat(dir.path())
        .args(["get", "--url", &url, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], 200);
    assert_eq!(json["request_url"], url.as_str());
    assert_eq!(json["body"], "body");
}

#[tokio::test]
async fn test_get_writes_output_table() {
    let server = MockServer::start().await;
    mount_status(&server, "/ok", 200).await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/ok", server.uri());

    urlstat(dir.path())
        .args(["get", "--url", &url, "--output", "single.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = fs::read_to_string(dir.path().join("single.csv")).unwrap();
    assert_eq!(written, format!("URL,Status\n{},200\n", url));
}

#[test]
fn test_get_invalid_url_fails() {
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .args(["get", "--url", "not a url"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid URL"));
}

#[tokio::test]
async fn test_from_csv_single_table() {
    let server = MockServer::start().await;
    mount_status(&server, "/a", 200).await;
    mount_status(&server, "/b", 500).await;
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();

    let uri = server.uri();
    fs::write(
        input.join("links.csv"),
        format!("first,{uri}/a\nsecond,{uri}/b\nthird,not-a-url\n"),
    )
    .unwrap();

    urlstat(dir.path())
        .arg("from-csv")
        .args(["--filename", "links", "--url-column", "1"])
        .arg("--input-dir")
        .arg(&input)
        .arg("--output-dir")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 written, 1 skipped"))
        .stdout(predicate::str::contains("links_results.csv"))
        .stdout(predicate::str::contains("2 fetch(es), 0 cache hit(s), 1 failure(s)"));

    let written = fs::read_to_string(output.join("links_results.csv")).unwrap();
    assert_eq!(written, format!("URL,Status\n{uri}/a,200\n{uri}/b,500\n"));
}

#[tokio::test]
async fn test_from_csv_repeated_url_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/same"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();

    let url = format!("{}/same", server.uri());
    fs::write(input.join("dup.csv"), format!("{url}\n{url}\n{url}\n")).unwrap();

    urlstat(dir.path())
        .args(["from-csv", "--filename", "dup.csv", "--cache-ttl-ms", "60000"])
        .arg("--input-dir")
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 fetch(es), 2 cache hit(s)"));

    let written = fs::read_to_string(dir.path().join("out/dup_results.csv")).unwrap();
    assert_eq!(written.lines().count(), 4);
}

#[tokio::test]
async fn test_from_csv_all_tables_with_separators() {
    let server = MockServer::start().await;
    mount_status(&server, "/x", 200).await;
    mount_status(&server, "/y", 301).await;
    let dir = TempDir::new().unwrap();
    let uri = server.uri();

    // Default directories relative to the working directory
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("one.csv"), format!("{uri}/x;a\n")).unwrap();
    fs::write(input.join("two.csv"), format!("{uri}/y;b\n")).unwrap();
    fs::write(input.join("notes.txt"), "ignored").unwrap();

    urlstat(dir.path())
        .args(["from-csv", "--csv-separator", ";", "--output-separator", "|"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 table(s)"));

    let output = dir.path().join("output");
    assert_eq!(
        fs::read_to_string(output.join("one_results.csv")).unwrap(),
        format!("URL|Status\n{uri}/x|200\n")
    );
    assert!(output.join("two_results.csv").exists());
    assert!(!output.join("notes_results.csv").exists());
}

#[test]
fn test_from_csv_empty_input_dir() {
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .arg("from-csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("No input tables found"));

    assert!(dir.path().join("input").is_dir());
    assert!(dir.path().join("output").is_dir());
}

#[test]
fn test_from_csv_clean_empties_output_dir() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("stale_results.csv"), "URL,Status\n").unwrap();

    urlstat(dir.path())
        .args(["from-csv", "--clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 1 file(s)"));

    assert!(!output.join("stale_results.csv").exists());
}

#[test]
fn test_from_csv_column_out_of_bounds_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("short.csv"), "a,b,c\n").unwrap();

    urlstat(dir.path())
        .args(["from-csv", "--filename", "short", "--url-column", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("URL column is 5"));
}

#[test]
fn test_from_csv_missing_table_fails() {
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .args(["from-csv", "--filename", "absent"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input table not found"));
}

#[test]
fn test_invalid_ttl_env_fails() {
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .env("URLSTAT_CACHE_TTL_MS", "soon")
        .arg("from-csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("URLSTAT_CACHE_TTL_MS"));
}

#[test]
fn test_missing_subcommand_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();

    urlstat(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("subcommand is required"));
}
