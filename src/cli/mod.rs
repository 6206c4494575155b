//! CLI module for the catalog API
//!
//! Provides command-line interface for:
//! - serve: Apply the schema and serve HTTP
//! - migrate: Apply the schema and exit
//! - create-user: Add a login account
//! - generate-secret-key: Print a random signing key

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{create_user, migrate, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
