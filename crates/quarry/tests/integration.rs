use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn quarry_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("quarry");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("alpha.md"),
        "# Alpha Document\n\nThis is the alpha document about Rust programming.\n\nIt contains information about cargo and crates.",
    ).unwrap();
    fs::write(files_dir.join("beta.docx"), "binary-ish payload").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/quarry.sqlite"

[chunking]
window = 500
overlap = 50

[retrieval]
top_k = 5

[server]
bind = "127.0.0.1:7431"
"#,
        root.display()
    );

    let config_path = config_dir.join("quarry.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_quarry(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = quarry_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run quarry binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_quarry(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));

    let db_path = tmp.path().join("data").join("quarry.sqlite");
    assert!(db_path.exists(), "Database should exist after init");
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_quarry(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_quarry(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_list_empty_corpus() {
    let (_tmp, config_path) = setup_test_env();

    run_quarry(&config_path, &["init"]);
    let (stdout, _, success) = run_quarry(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("No documents stored"));
}

#[test]
fn test_ingest_fails_with_disabled_provider() {
    let (tmp, config_path) = setup_test_env();

    run_quarry(&config_path, &["init"]);
    let file = tmp.path().join("files").join("alpha.md");
    let (_, stderr, success) = run_quarry(&config_path, &["ingest", file.to_str().unwrap()]);
    assert!(!success, "ingest should fail when embeddings disabled");
    assert!(
        stderr.contains("disabled"),
        "Should mention disabled, got: {}",
        stderr
    );
}

#[test]
fn test_ingest_rejects_unsupported_extension() {
    let (tmp, config_path) = setup_test_env();

    run_quarry(&config_path, &["init"]);
    let file = tmp.path().join("files").join("beta.docx");
    let (_, stderr, success) = run_quarry(&config_path, &["ingest", file.to_str().unwrap()]);
    assert!(!success, "Unsupported extension should fail");
    assert!(
        stderr.contains("unsupported file type"),
        "Should mention unsupported type, got: {}",
        stderr
    );
}

#[test]
fn test_search_fails_with_disabled_provider() {
    let (_tmp, config_path) = setup_test_env();

    run_quarry(&config_path, &["init"]);
    let (_, stderr, success) = run_quarry(&config_path, &["search", "anything"]);
    assert!(!success, "search should fail when embeddings disabled");
    assert!(
        stderr.contains("disabled"),
        "Should mention disabled, got: {}",
        stderr
    );
}

#[test]
fn test_delete_missing_id_is_noop() {
    let (_tmp, config_path) = setup_test_env();

    run_quarry(&config_path, &["init"]);
    let (stdout, stderr, success) = run_quarry(&config_path, &["delete", "999"]);
    assert!(
        success,
        "Deleting a missing id should succeed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("Deleted document 999"));
}

#[test]
fn test_invalid_config_rejected() {
    let (tmp, config_path) = setup_test_env();

    // Overwrite with a window that does not exceed the overlap
    let bad = format!(
        "[db]\npath = \"{}/data/quarry.sqlite\"\n\n[chunking]\nwindow = 50\noverlap = 50\n",
        tmp.path().display()
    );
    fs::write(&config_path, bad).unwrap();

    let (_, stderr, success) = run_quarry(&config_path, &["init"]);
    assert!(!success, "Invalid chunking config should fail");
    assert!(
        stderr.contains("chunking.window"),
        "Should mention chunking.window, got: {}",
        stderr
    );
}
