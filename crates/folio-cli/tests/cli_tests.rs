//! CLI integration tests
//!
//! Run the `folio` binary against a SQLite file in a temporary directory.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn folio(dir: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_folio"))
        .current_dir(dir)
        .env("FOLIO_BACKEND", "sqlite")
        .env("FOLIO_SQLITE__PATH", db)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_migrate_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("data").join("folio.db");

    let first = folio(temp_dir.path(), &db, &["migrate"]);
    assert!(first.status.success(), "{:?}", first);
    assert!(stdout(&first).contains("2 migration(s) applied, 2 new"));
    assert!(db.exists());

    let second = folio(temp_dir.path(), &db, &["migrate"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("0 new"));
}

#[test]
fn test_migrate_explicit_db_flag() {
    let temp_dir = TempDir::new().unwrap();
    let configured = temp_dir.path().join("configured.db");
    let explicit = temp_dir.path().join("explicit.db");

    let output = folio(
        temp_dir.path(),
        &configured,
        &["migrate", "--db", explicit.to_str().unwrap()],
    );
    assert!(output.status.success(), "{:?}", output);
    assert!(explicit.exists());
    assert!(!configured.exists());
}

#[test]
fn test_user_add_then_duplicate_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("folio.db");
    let add = [
        "user",
        "add",
        "--email",
        "Owner@Example.com",
        "--password",
        "pw-123",
        "--admin",
    ];

    let created = folio(temp_dir.path(), &db, &add);
    assert!(created.status.success(), "{:?}", created);
    let text = stdout(&created);
    assert!(text.contains("admin"), "{}", text);
    assert!(text.contains("owner@example.com"), "{}", text);
    assert!(!text.contains("pw-123"));

    let duplicate = folio(temp_dir.path(), &db, &add);
    assert!(!duplicate.status.success());
    let stderr = String::from_utf8_lossy(&duplicate.stderr);
    assert!(stderr.contains("Email already registered"), "{}", stderr);
}

#[test]
fn test_invalid_config_file_reported() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("folio.db");
    let config = temp_dir.path().join("bad.toml");
    std::fs::write(&config, "[auth]\ntoken_ttl_hours = 0\n").unwrap();

    let output = folio(
        temp_dir.path(),
        &db,
        &["migrate", "--config", config.to_str().unwrap()],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auth.token_ttl_hours"), "{}", stderr);
}
