//! authservice command-line client
//!
//! Exercises the client SDK against a running authservice: fetch (and cache)
//! the client id, obtain a token pair, and check a token record.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Register this host and print its client id
//! authservice-client --base-url http://localhost:8080 client-id
//!
//! # Obtain the token pair for this host
//! authservice-client --cache-path ./clientid token
//!
//! # Check a token record previously printed by `token`
//! authservice-client validate --token '{"client_id":"...","address":"...","access_token":"..."}'
//! ```
//!
//! ## Environment Variables
//!
//! - `AUTH_SERVICE_URL`: base URL of the service (overridden by --base-url)
//! - `CLIENT_ID_CACHE_PATH`: client id cache file (overridden by --cache-path)
//! - `HTTP_CLIENT_TIMEOUT`, `CLIENT_MAX_ATTEMPTS`
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (network, parsing, configuration)
//! - 3: The presented token is not valid

use authservice::client::AuthServiceClient;
use authservice::config::ClientConfig;
use authservice::errors::ClientError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "authservice-client",
    about = "authservice client CLI",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Base URL of the auth service
    #[arg(long, help = "Base URL of the auth service (defaults to AUTH_SERVICE_URL)")]
    base_url: Option<String>,

    /// Client id cache file
    #[arg(long, help = "Client id cache file (defaults to CLIENT_ID_CACHE_PATH)")]
    cache_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output for debugging")]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json", help = "Output format for token records")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// JSON formatted output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Print this host's client id, registering it if necessary
    ClientId,
    /// Print this host's token record
    Token,
    /// Check whether a token record is valid
    Validate(ValidateArgs),
    /// Remove the cached client id
    ClearCache,
}

/// Arguments for token validation
#[derive(Args)]
struct ValidateArgs {
    /// Token record as JSON
    #[arg(long, help = "Token record as a JSON string, as printed by the token command")]
    token: String,
}

/// Application errors
#[derive(Debug)]
enum AppError {
    /// Configuration could not be loaded
    Config(anyhow::Error),
    /// SDK errors
    Client(ClientError),
    /// JSON serialization errors
    Json(serde_json::Error),
    /// The token was checked and rejected
    InvalidToken,
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Client(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
            AppError::Client(err) => write!(f, "{}", err),
            AppError::Json(err) => write!(f, "JSON error: {}", err),
            AppError::InvalidToken => write!(f, "Token is not valid"),
        }
    }
}

/// Main application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("authservice=debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match build_client(&cli) {
        Ok(client) => run(&cli, &client).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(AppError::InvalidToken) => {
            println!("false");
            process::exit(3);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

/// Build the SDK client from the environment and command-line overrides
fn build_client(cli: &Cli) -> Result<AuthServiceClient, AppError> {
    let mut config = ClientConfig::new().map_err(AppError::Config)?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url
            .clone()
            .try_into()
            .map_err(|err: authservice::errors::ConfigError| AppError::Config(err.into()))?;
    }
    if let Some(cache_path) = &cli.cache_path {
        config.cache_path = cache_path.clone();
    }

    if cli.verbose {
        eprintln!(
            "Using auth service {} with cache {:?}",
            config.base_url.as_ref(),
            config.cache_path
        );
    }

    Ok(AuthServiceClient::new(&config)?)
}

async fn run(cli: &Cli, client: &AuthServiceClient) -> Result<(), AppError> {
    match &cli.command {
        Commands::ClientId => {
            println!("{}", client.client_id().await?);
        }
        Commands::Token => {
            let record = client.access_token().await?;
            let output = match cli.format {
                OutputFormat::Json => serde_json::to_string(&record)?,
                OutputFormat::JsonPretty => serde_json::to_string_pretty(&record)?,
            };
            println!("{}", output);
        }
        Commands::Validate(args) => {
            if !client.validate_token_str(&args.token).await {
                return Err(AppError::InvalidToken);
            }
            println!("true");
        }
        Commands::ClearCache => {
            client.clear_cached_client_id().await?;
            if cli.verbose {
                eprintln!("Removed {:?}", client.cache_path());
            }
        }
    }

    Ok(())
}
