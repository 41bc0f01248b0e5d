//! CLI smoke tests

use assert_cmd::Command;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("fuel-mix-archiver").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    let output = cmd().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("ingest"));
    assert!(stdout.contains("check"));
}

#[test]
fn test_ingest_requires_a_payload_source() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["ingest", "--archive"])
        .arg(dir.path().join("fuelinst.csv.gz"))
        .assert()
        .failure();
}

#[test]
fn test_ingest_from_local_legacy_file() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload.csv");
    std::fs::write(
        &payload,
        "HDR\nFUELINST,20230621,23,20230621110000,6030,3065\nFTR,1\n",
    )
    .unwrap();
    let archive = dir.path().join("fuelinst.csv.gz");

    cmd()
        .args(["ingest", "--format", "legacy"])
        .arg("--archive")
        .arg(&archive)
        .arg("--input")
        .arg(&payload)
        .assert()
        .success();
    assert!(archive.exists());

    // The freshly written archive passes its own strict check.
    cmd().arg("check").arg(&archive).assert().success();
}

#[test]
fn test_check_missing_archive_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg("check")
        .arg(dir.path().join("absent.csv.gz"))
        .assert()
        .failure();
}

#[test]
fn test_check_rejects_corrupt_archive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fuelinst.csv.gz");
    std::fs::write(&path, b"definitely not gzip").unwrap();

    cmd().arg("check").arg(&path).assert().failure();
}
