//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use fisc_server::ServerConfig;

use super::open_db;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "FISC_JWT_SECRET";

/// Environment variable with comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "FISC_ALLOWED_ORIGINS";

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origin_flags: Vec<String>,
) -> Result<()> {
    let jwt_secret = std::env::var(JWT_SECRET_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .with_context(|| {
            format!(
                "Token signing secret required. Set the {} environment variable.",
                JWT_SECRET_ENV
            )
        })?;

    // Flags and environment are merged
    let mut allowed_origins = allowed_origin_flags;
    if let Ok(env_origins) = std::env::var(ALLOWED_ORIGINS_ENV) {
        allowed_origins.extend(
            env_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }

    println!("🚀 Starting fisc API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }

    let db = open_db(db_path)?;

    let mut config = ServerConfig::new(jwt_secret);
    config.allowed_origins = allowed_origins;

    let static_dir_str = static_dir.and_then(|p| p.to_str());
    fisc_server::serve(db, host, port, static_dir_str, config).await
}
