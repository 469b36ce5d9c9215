//! Smoke tests for command wiring and startup failure handling

use assert_cmd::Command;
use predicates::prelude::*;

/// Binary run from an empty directory so no stray .env is picked up.
fn stackhost(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stackhost").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_serve_help() {
    let dir = tempfile::tempdir().unwrap();
    stackhost(&dir)
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Port to listen on"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_migrate_help() {
    let dir = tempfile::tempdir().unwrap();
    stackhost(&dir)
        .arg("migrate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--migrations-dir"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let dir = tempfile::tempdir().unwrap();
    stackhost(&dir)
        .arg("serve")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_migrate_without_database_url_fails() {
    let dir = tempfile::tempdir().unwrap();
    stackhost(&dir)
        .arg("migrate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_unreachable_database_exits_before_serving() {
    let dir = tempfile::tempdir().unwrap();
    stackhost(&dir)
        .args([
            "serve",
            "--port",
            "0",
            "--database-url",
            "postgres://stackhost@127.0.0.1:1/stackhost",
            "--acquire-timeout-ms",
            "300",
        ])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Server error"));
}
