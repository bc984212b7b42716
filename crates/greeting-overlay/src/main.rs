use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeting_overlay::{
    config::{Config, defaults::DEFAULT_CONFIG_FILE},
    services::RetentionSweeper,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "greeting-overlay")]
#[command(version)]
#[command(about = "Upload an image, stamp a greeting onto it and serve the result")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Directory for uploads and composed images (overrides config file)
    #[arg(short = 'u', long, value_name = "DIR")]
    uploads_dir: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "greeting_overlay={0},sandboxed_file_manager={0}",
        cli.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Greeting Overlay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(uploads_dir) = cli.uploads_dir {
        config.storage.uploads_dir = uploads_dir;
    }

    let state = AppState::from_config(config.clone()).await?;
    info!("Storing uploads in {}", state.storage.base_dir().display());

    if config.retention.enabled {
        RetentionSweeper::from_config(state.storage.clone(), &config.retention)?.spawn();
    } else {
        info!("Retention sweep disabled");
    }

    let web_server = WebServer::new(&config, state)?;
    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    info!("Server stopped");
    Ok(())
}
