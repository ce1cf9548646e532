//! Upload source and CLI integration harness.
//!
//! # What this covers
//!
//! - **File source**: reading from disk, BOM stripping, missing files.
//! - **Upload errors**: a rejected upload surfaces as `FeedError::Upload`.
//! - **CLI**: `report`, `validate` and `generate` end to end against the
//!   built binary.
//!
//! # Running
//!
//! ```sh
//! cargo test --test feeds_harness
//! ```

mod common;
use common::*;
use pilotlog::config::Config;
use pilotlog::feeds::{self, CsvSource, FeedError, FileSource};
use pilotlog::Session;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::Command;

fn upload_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

// ---------------------------------------------------------------------------
// File source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_upload_loads_session() {
    let file = upload_file(UPLOAD_PILOT.as_bytes());
    let mut session = Session::new(&Config::defaults());

    let summary = feeds::upload(&FileSource::new(file.path()), &mut session).await.unwrap();
    assert_eq!(summary.accepted, 6);
    assert_eq!(session.snapshot().records().len(), 6);
}

#[tokio::test]
async fn excel_bom_is_stripped() {
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice(UPLOAD_LEGACY.as_bytes());
    let file = upload_file(&bytes);

    let text = FileSource::new(file.path()).read_text().await.unwrap();
    assert!(text.starts_with("ID,User"));
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::new(dir.path().join("absent.csv"));
    let err = source.read_text().await.unwrap_err();
    assert!(matches!(err, FeedError::Io { .. }), "{err:?}");
    assert!(err.to_string().contains("absent.csv"));
}

#[tokio::test]
async fn rejected_upload_is_upload_error() {
    let file = upload_file(HEADER.as_bytes());
    let mut session = Session::new(&Config::defaults());
    let err = feeds::upload(&FileSource::new(file.path()), &mut session).await.unwrap_err();
    assert!(matches!(err, FeedError::Upload(_)), "{err:?}");
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

fn pilotlog(args: &[&str]) -> std::process::Output {
    let config_dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_pilotlog"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn report_emits_all_views() {
    let file = upload_file(UPLOAD_PILOT.as_bytes());
    let path = file.path().to_str().unwrap();
    let out = pilotlog(&["report", path, "--start", "2025-12-18", "--end", "2025-12-18"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["range"]["start"], "2025-12-18");
    assert_eq!(json["kpis"]["totalRequests"], 2);
    assert_eq!(json["daily"][0]["successRate"], 50);
    assert_eq!(json["funnel"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["logs"][0]["id"], "Q-004");
}

#[test]
fn validate_fails_on_dirty_upload() {
    let file = upload_file(UPLOAD_DIRTY.as_bytes());
    let out = pilotlog(&["validate", file.path().to_str().unwrap()]);
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("3 of 5 data rows accepted"), "{stdout}");
}

#[test]
fn generate_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");
    let path = path.to_str().unwrap();

    let out = pilotlog(&["generate", "--out", path, "--per-day", "5", "--seed", "9"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(pilotlog(&["validate", path]).status.success());
}
