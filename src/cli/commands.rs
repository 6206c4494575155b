//! CLI command implementations
//!
//! Every command except `generate-secret-key` loads configuration, installs
//! logging, opens the database and applies the schema before doing its
//! own work.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::auth::crypto::{generate_secret_key, PasswordPolicy};
use crate::auth::AuthService;
use crate::config::Config;
use crate::http_server::{AppState, HttpServer};
use crate::observability::init_logging;
use crate::store::SqlStore;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and run the chosen command on a fresh runtime
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_command(cli.command))
}

/// Dispatch a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(config.as_deref()).await,
        Command::Migrate { config } => migrate(config.as_deref()).await,
        Command::CreateUser {
            username,
            password,
            email,
            config,
        } => create_user(config.as_deref(), &username, &password, email).await,
        Command::GenerateSecretKey => {
            println!("{}", generate_secret_key());
            Ok(())
        }
    }
}

/// Load configuration, start logging and open a migrated store
async fn boot(path: Option<&Path>) -> CliResult<(Config, SqlStore)> {
    let config = Config::load(path)?;
    init_logging(&config.logging.level, config.log_format());

    let store = SqlStore::connect(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;

    Ok((config, store))
}

/// Serve HTTP until interrupted
pub async fn serve(path: Option<&Path>) -> CliResult<()> {
    let (config, store) = boot(path).await?;
    let store = Arc::new(store);

    info!(
        service = %config.service_name,
        environment = ?config.environment,
        jwt = config.auth.enable_jwt,
        require_auth = config.auth.require_auth,
        page_size = config.page_size,
        "Starting service"
    );

    let server = HttpServer::new(AppState::new(Arc::clone(&store), config).shared());
    server.start().await?;

    store.close().await;
    Ok(())
}

/// Apply the schema and exit
pub async fn migrate(path: Option<&Path>) -> CliResult<()> {
    let (config, store) = boot(path).await?;
    info!(url = %config.database.url, "Schema is up to date");
    store.close().await;
    Ok(())
}

/// Create a login account. Works whether or not token login is enabled.
pub async fn create_user(
    path: Option<&Path>,
    username: &str,
    password: &str,
    email: Option<String>,
) -> CliResult<()> {
    let (_, store) = boot(path).await?;
    let store = Arc::new(store);

    let auth = AuthService::new(Arc::clone(&store), None, PasswordPolicy::default());
    let user = auth.create_user(username, email, password).await?;

    info!(id = %user.id, username = %user.username, "Created user");
    println!("Created user {} ({})", user.username, user.id);

    store.close().await;
    Ok(())
}
