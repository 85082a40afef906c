//! User management commands

use anyhow::{bail, Context, Result};
use fisc_core::db::Database;

pub fn cmd_users_add(db: &Database, email: &str, name: &str, password: &str) -> Result<()> {
    let email = email.trim().to_lowercase();
    let name = name.trim();

    if name.is_empty() {
        bail!("Name must not be empty");
    }
    if !email.contains('@') {
        bail!("Invalid email address: {}", email);
    }
    if password.chars().count() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let password_hash =
        fisc_core::auth::hash_password(password).context("Failed to hash password")?;
    let user = db
        .create_user(&email, name, &password_hash)
        .context("Failed to create user")?;

    println!("✅ Created user {} ({})", user.email, user.id);
    Ok(())
}
