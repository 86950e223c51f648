//! askdb - ask your database questions in plain language.

mod cli;
mod config;
mod db;
mod error;
mod llm;
mod session;

use cli::Cli;
use config::{Config, ConnectionConfig};
use db::MockDatabaseClient;
use error::{AskError, Result};
use llm::Provider;
use session::Session;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Resolve the completion provider: CLI flag wins over the config file.
    let provider: Provider = cli
        .provider
        .as_deref()
        .unwrap_or(&config.llm.provider)
        .parse()
        .map_err(AskError::config)?;

    let mut llm_config = config.llm.clone();
    if cli.model.is_some() {
        llm_config.model = cli.model.clone();
    }
    let llm_client = llm::create_client(provider, &llm_config)?;
    info!("Using completion provider: {}", provider);

    // Open the session
    let mut session = if cli.mock_db {
        Session::with_clients(Box::new(MockDatabaseClient::new()), llm_client)
    } else {
        let connection = resolve_connection(&cli, &config)?;
        Session::connect(&connection, llm_client).await?
    };

    // Ask the question and report, closing the connection either way.
    let outcome = session.ask(&cli.question).await;
    let sql = session.last_sql().map(String::from);
    session.close().await?;

    let results = outcome?;

    if let Some(sql) = sql {
        println!("Generated SQL query: {sql}");
    }
    println!();
    println!("Results:");
    println!("{}", results.to_json_pretty());

    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file,
/// and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    // Start with CLI connection config if provided
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try named connection from config
    if connection.is_none() {
        if let Some(name) = &cli.connection {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(AskError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try default from config
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Apply environment variable defaults
    let mut connection = connection.unwrap_or_default();
    connection.apply_env_defaults();

    Ok(connection)
}
