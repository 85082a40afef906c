//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// fisc - Track income, expenses, and monthly budgets
#[derive(Parser)]
#[command(name = "fisc")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to fisc.db in the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable); also read from FISC_ALLOWED_ORIGINS
        #[arg(long)]
        allowed_origin: Vec<String>,
    },

    /// Show database status (path, row counts)
    Status,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user account
    Add {
        /// Email address (unique)
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Password (at least 8 characters)
        #[arg(long)]
        password: String,
    },
}
