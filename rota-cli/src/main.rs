//! Rota CLI - Command line interface for Rota
//!
//! Serves the reviewer assignment API and offers admin commands that talk to
//! the database directly.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rota_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{PrArgs, ServeArgs, TeamArgs, UserArgs};

/// Rota: reviewer assignment for pull requests
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "ROTA_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides config and env)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Serve the HTTP API
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Manage teams
    Team(TeamArgs),

    /// Manage users
    User(UserArgs),

    /// Manage pull requests
    Pr(PrArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let (host, port) = match &cli.command {
        Some(Commands::Serve(args)) => (args.host.clone(), args.port),
        _ => (None, None),
    };

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.config.as_deref(), host, port, cli.db.clone())?;

    tracing::debug!(
        addr = %config.server.bind_addr(),
        db = %config.database.path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Some(Commands::Version) => {
            println!("rota {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Team(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::User(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Pr(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Rota Configuration");
            println!("==================");
            println!();
            println!("Server Settings:");
            println!("  host: {}", config.server.host);
            println!("  port: {}", config.server.port);
            println!("  shutdown_timeout: {:?}", config.server.shutdown_timeout);
            println!();
            println!("Database Settings:");
            println!("  path: {}", config.database.path.display());
            println!("  max_connections: {}", config.database.max_connections);
            println!("  busy_timeout: {:?}", config.database.busy_timeout);
            println!();
            let path = cli.config.clone().or_else(Config::default_config_path);
            if let Some(path) = path {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Rota - reviewer assignment for pull requests");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
