//! CLI argument definitions using clap
//!
//! Commands:
//! - catalog-api serve [--config <path>]
//! - catalog-api migrate [--config <path>]
//! - catalog-api create-user --username <u> --password <p> [--email <e>]
//! - catalog-api generate-secret-key

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Catalog API - people and products over HTTP
#[derive(Parser, Debug)]
#[command(name = "catalog-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply the schema and start the HTTP server
    Serve {
        /// Optional JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply the schema and exit
    Migrate {
        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a login account
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        email: Option<String>,

        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a fresh random secret key
    GenerateSecretKey,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
