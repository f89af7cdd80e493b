//! End-to-end tests for the folderscan binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn folderscan() -> Command {
    Command::cargo_bin("folderscan").unwrap()
}

#[test]
fn test_writes_text_document() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn lib() {}").unwrap();
    let out = dir.path().join("scan_output.txt");

    folderscan()
        .arg("-p")
        .arg(&root)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let doc = fs::read_to_string(&out).unwrap();
    assert!(doc.contains("*Directory: proj*"));
    let block = format!(
        "'''--- {} ---\npub fn lib() {{}}\n'''",
        root.join("src/lib.rs").display()
    );
    assert!(doc.contains(&block));
}

#[test]
fn test_markdown_to_stdout_with_depth_suffix() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("top.txt"), "top").unwrap();
    fs::write(root.join("nested/inner.txt"), "inner").unwrap();

    folderscan()
        .arg("-p")
        .arg(format!("{}/root+0", root.display()))
        .args(["-f", "md", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Directory Scan Results"))
        .stdout(predicate::str::contains("top.txt"))
        .stdout(predicate::str::contains("inner.txt").not());
}

#[test]
fn test_missing_path_warns_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("scan_output.txt");

    folderscan()
        .arg("-p")
        .arg(dir.path().join("does-not-exist"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("No valid paths found"));
    assert!(!out.exists());
}

#[test]
fn test_exclude_patterns_flag() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.rs"), "keep").unwrap();
    fs::write(root.join("secret.env"), "TOKEN=1").unwrap();

    folderscan()
        .arg("-p")
        .arg(&root)
        .args(["--exclude-patterns", ".env", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keep.rs"))
        .stdout(predicate::str::contains("secret.env").not());
}

#[test]
fn test_invalid_depth_flag_is_rejected() {
    let dir = tempdir().unwrap();
    folderscan()
        .arg("-p")
        .arg(dir.path())
        .args(["--depth", "deep"])
        .assert()
        .failure();
}
