use dtc_lib::browser::snapshot_file_name;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_snapshot(dir: &Path, url: &str, margin: &str) {
    let body = json!({
        "url": url,
        "status": 200,
        "elements": {
            "div": [{ "styles": { "margin-top": margin, "color": "rgb(17, 24, 39)" } }]
        }
    });
    std::fs::write(dir.join(snapshot_file_name(url)), body.to_string()).expect("write snapshot");
}

/// Crawl file with two captured pages and one 404.
fn fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let styles = dir.path().join("styles");
    std::fs::create_dir_all(&styles).unwrap();
    write_snapshot(&styles, "https://site.test/", "8px");
    write_snapshot(&styles, "https://site.test/docs", "8px");
    std::fs::write(
        dir.path().join("crawl.yaml"),
        "baseUrl: https://site.test\n\
         crawledPages:\n\
         \x20 - url: https://site.test/\n\
         \x20   status: 200\n\
         \x20 - url: https://site.test/docs\n\
         \x20   status: 200\n\
         \x20 - url: https://site.test/gone\n\
         \x20   status: 404\n",
    )
    .unwrap();
    dir
}

fn dtc(dir: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dtc"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("HOME", dir)
        .args(["extract", "--crawl", "crawl.yaml", "--styles-dir", "styles"])
        .args(extra)
        .output()
        .expect("run dtc")
}

#[test]
fn extract_writes_token_files_and_summary() {
    let dir = fixture();
    let out = dtc(dir.path(), &["--output-dir", "tokens"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let summary: Value = serde_json::from_slice(&out.stdout).expect("json summary");
    assert_eq!(summary["mode"], "extract");
    assert_eq!(summary["pagesCaptured"], 2);
    assert_eq!(summary["pagesFailed"], 1);
    assert_eq!(summary["categories"].as_array().unwrap().len(), 5);

    let spacing_file = dir.path().join("tokens/raw/spacing-analysis.json");
    let tokens: Value =
        serde_json::from_str(&std::fs::read_to_string(spacing_file).unwrap()).unwrap();
    assert_eq!(tokens[0]["name"], "spacing-2");
    assert_eq!(tokens[0]["usageCount"], 2);
    assert!(dir.path().join("tokens/raw/color-analysis.json").exists());
}

#[test]
fn categories_flag_limits_output() {
    let dir = fixture();
    let out = dtc(dir.path(), &["--categories", "color", "--min-occurrences", "2"]);
    assert_eq!(out.status.code(), Some(0));

    let summary: Value = serde_json::from_slice(&out.stdout).unwrap();
    let categories = summary["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["kind"], "color");
    assert_eq!(categories[0]["tokenCount"], 1);
    assert!(dir.path().join("output/raw/color-analysis.json").exists());
    assert!(!dir.path().join("output/raw/spacing-analysis.json").exists());
}

#[test]
fn invalid_options_exit_with_error_payload() {
    let dir = fixture();
    let out = dtc(dir.path(), &["--categories", "shadows"]);
    assert_eq!(out.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(payload["mode"], "error");
    assert_eq!(payload["error"]["category"], "config");

    let out = dtc(dir.path(), &["--min-occurrences", "0"]);
    assert_eq!(out.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("minimum_occurrences"));
}

#[test]
fn config_file_sets_output_dir_and_rejects_unknown_keys() {
    let dir = fixture();
    std::fs::write(dir.path().join("dtc.toml"), "[output]\ndir = \"from-config\"\n").unwrap();
    let out = dtc(dir.path(), &["--config", "dtc.toml"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("from-config/raw/border-analysis.json").exists());

    std::fs::write(dir.path().join("bad.toml"), "[spacing]\nscale = 4\n").unwrap();
    let out = dtc(dir.path(), &["--config", "bad.toml"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_crawl_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("styles")).unwrap();
    let out = dtc(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(payload["message"]
        .as_str()
        .unwrap()
        .contains("Failed to read crawl result"));
}
