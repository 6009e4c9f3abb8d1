//! Highroller API Server Binary
//!
//! Serves the casino API and the static web client.

use clap::Parser;
use highroller::api::ApiServer;
use highroller::config::ServerConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "highroller-api")]
#[command(about = "Highroller casino API server", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// API server host
    #[arg(long)]
    host: Option<String>,

    /// API server port
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding the built web client
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Skip embedded migrations on startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine
    dotenv::dotenv().ok();
    let args = Args::parse();

    highroller::init_tracing(highroller::DEFAULT_LOG_FILTER);

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::from_file(path)?
        }
        None => ServerConfig::default(),
    };
    config.apply_env()?;

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = Some(dir);
    }
    if args.skip_migrations {
        config.run_migrations = false;
    }

    ApiServer::new(config).run().await?;
    Ok(())
}
