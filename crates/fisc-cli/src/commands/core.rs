//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` / `open_db` - Shared database utilities
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fisc_core::db::Database;

/// Pick the database path: explicit flag, or fisc.db under the platform
/// data directory (falling back to the working directory)
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let Some(data_dir) = dirs::data_local_dir() else {
        return Ok(PathBuf::from("fisc.db"));
    };

    let app_dir = data_dir.join("fisc");
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("fisc.db"))
}

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: fisc users add --email you@example.com --name You --password ...");
    println!("  2. Start the API: FISC_JWT_SECRET=... fisc serve");

    Ok(())
}

pub fn cmd_status(db_path: &Path, db: &Database) -> Result<()> {
    let users = db.count_users()?;
    let transactions = db.count_transactions()?;
    let budgets = db.count_budgets()?;

    println!("📊 Database Status");
    println!("   ─────────────────────────────");
    println!("   Path: {}", db_path.display());
    println!("   Users: {}", users);
    println!("   Transactions: {}", transactions);
    println!("   Budgets: {}", budgets);

    Ok(())
}
