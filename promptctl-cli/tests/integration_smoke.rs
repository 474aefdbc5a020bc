//! Smoke tests for command wiring and exit behavior

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Isolated from any promptctl.toml or env config on the host.
fn promptctl(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("promptctl").unwrap();
    cmd.current_dir(cwd.path())
        .env_remove("PROMPTCTL_CONFIG")
        .env("PROMPTCTL_QUIET", "1");
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("makam-report"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_extract_help() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--input-dir"))
        .stdout(predicate::str::contains("--dry-run"));
}

// === Extract ===

#[test]
fn test_extract_missing_input_dir_fails() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .args(["extract", "--input-dir", "does-not-exist"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Input directory does not exist: does-not-exist",
        ));
}

#[test]
fn test_extract_prints_count() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports/20250114");
    fs::create_dir_all(&exports).unwrap();
    fs::write(
        exports.join("codex-chat.txt"),
        "hello world\nNo tasks in progress\n----------\nnext task here\n",
    )
    .unwrap();

    promptctl(&dir)
        .args(["extract", "--input-dir", "exports", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted prompts: 2"));

    let written: Vec<_> = fs::read_dir(dir.path().join("out/20250114"))
        .unwrap()
        .collect();
    assert_eq!(written.len(), 2);
}

#[test]
fn test_extract_dry_run_leaves_output_absent() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("exports")).unwrap();
    fs::write(dir.path().join("exports/prompt_one.md"), "Ship the fix\n").unwrap();

    promptctl(&dir)
        .args([
            "extract",
            "--input-dir",
            "exports",
            "--output-dir",
            "out",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt_one.md__0001__Ship-the-fix__"))
        .stdout(predicate::str::contains("Extracted prompts: 1"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_extract_reads_local_config() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("chats")).unwrap();
    fs::write(
        dir.path().join("chats/codex-chat.txt"),
        "just chatting\nNo tasks in progress\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("promptctl.toml"),
        "[extract]\ninput_dir = \"chats\"\noutput_dir = \"found\"\nkind = \"official\"\n",
    )
    .unwrap();

    promptctl(&dir)
        .arg("extract")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted prompts: 0"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .args(["extract", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

// === Makam report ===

#[test]
fn test_makam_report_writes_json() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus.abc");
    fs::write(
        &corpus,
        "X:1\nT:Song A\nT:Hicaz Peşrev\nK:Bb\n\nX:2\nT:Song B\nT:Hicaz Saz Semaisi\nK:Bb\n\nX:3\nT:Only\nT:Uşşak Şarkı\nK:F#\n",
    )
    .unwrap();
    let output = dir.path().join("reports/makam.json");

    promptctl(&dir)
        .arg("makam-report")
        .arg("--input")
        .arg(&corpus)
        .arg("--output-json")
        .arg(&output)
        .assert()
        .success();

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"tunesTotal\": 3"));
    assert!(json.contains("\"hicaz\""));
    assert!(json.contains("\"ussak\""));
    assert!(json.ends_with("}\n"));
}

#[test]
fn test_makam_report_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .args(["makam-report", "--input", "missing.abc", "--output-json", "out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.abc"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    promptctl(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promptctl"));
}
