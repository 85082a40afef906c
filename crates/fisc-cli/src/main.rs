//! fisc CLI - Personal finance tracker
//!
//! Usage:
//!   fisc init                  Initialize the database
//!   fisc users add ...         Create a user account
//!   fisc serve --port 5000     Start the REST API server
//!   fisc status                Show database status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origin,
        } => commands::cmd_serve(&db_path, &host, port, static_dir.as_deref(), allowed_origin).await,
        Commands::Status => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_status(&db_path, &db)
        }
        Commands::Users { action } => {
            let db = commands::open_db(&db_path)?;
            match action {
                UsersAction::Add {
                    email,
                    name,
                    password,
                } => commands::cmd_users_add(&db, &email, &name, &password),
            }
        }
    }
}
