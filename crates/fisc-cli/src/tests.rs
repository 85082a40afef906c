//! CLI command tests
//!
//! This module contains tests for the CLI commands.

use fisc_core::db::Database;

use crate::commands;

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

// ========== Users Command Tests ==========

#[test]
fn test_cmd_users_add() {
    let db = setup_test_db();
    let result = commands::cmd_users_add(&db, "alice@example.com", "Alice", "a-long-password");
    assert!(result.is_ok());

    let (user, hash) = db.get_user_by_email("alice@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Alice");
    // Stored as an argon2 PHC string, never plaintext
    assert!(hash.starts_with("$argon2"));
}

#[test]
fn test_cmd_users_add_normalizes_email() {
    let db = setup_test_db();
    commands::cmd_users_add(&db, " Alice@Example.Com ", "Alice", "a-long-password").unwrap();
    assert!(db.get_user_by_email("alice@example.com").unwrap().is_some());
}

#[test]
fn test_cmd_users_add_validation() {
    let db = setup_test_db();
    assert!(commands::cmd_users_add(&db, "alice@example.com", "", "a-long-password").is_err());
    assert!(commands::cmd_users_add(&db, "not-an-email", "Alice", "a-long-password").is_err());
    assert!(commands::cmd_users_add(&db, "alice@example.com", "Alice", "short").is_err());
    assert_eq!(db.count_users().unwrap(), 0);
}

#[test]
fn test_cmd_users_add_duplicate_fails() {
    let db = setup_test_db();
    commands::cmd_users_add(&db, "alice@example.com", "Alice", "a-long-password").unwrap();
    let result = commands::cmd_users_add(&db, "alice@example.com", "Alice", "a-long-password");
    assert!(result.is_err());
    assert_eq!(db.count_users().unwrap(), 1);
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status_runs() {
    let db = setup_test_db();
    let result = commands::cmd_status(std::path::Path::new("test.db"), &db);
    assert!(result.is_ok());
}

// ========== Init Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fisc.db");
    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running against an existing database is fine
    commands::cmd_init(&path).unwrap();
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_cli_parses_serve_args() {
    use clap::Parser;

    let cli = crate::cli::Cli::try_parse_from([
        "fisc",
        "serve",
        "--port",
        "8080",
        "--allowed-origin",
        "http://localhost:5173",
    ])
    .unwrap();

    match cli.command {
        crate::cli::Commands::Serve {
            port,
            allowed_origin,
            ..
        } => {
            assert_eq!(port, 8080);
            assert_eq!(allowed_origin, vec!["http://localhost:5173"]);
        }
        _ => panic!("expected serve command"),
    }
}
