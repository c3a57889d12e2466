use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tap_wordpress_reviews::config::Config;
use tap_wordpress_reviews::singer::{self, Catalog, SingerWriter, State};
use tap_wordpress_reviews::wordpress::{WordpressClient, WordpressReviews};

#[derive(Parser)]
#[command(
    name = "tap-wordpress-reviews",
    version,
    about = "Singer tap for WordPress.org plugin reviews"
)]
struct Cli {
    /// Config JSON file (falls back to WP_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the catalog and exit
    #[arg(short, long)]
    discover: bool,
    /// Catalog JSON file selecting the streams to sync
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// State JSON file with bookmarks from a previous run
    #[arg(short, long)]
    state: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        ">>> Running tap-wordpress-reviews"
    );

    if cli.discover {
        let catalog = singer::discover().context("Failed to build catalog")?;
        serde_json::to_writer_pretty(io::stdout().lock(), &catalog)
            .context("Failed to write catalog")?;
        println!();
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        plugins = ?config.plugins,
        number = config.number,
        "Configuration loaded"
    );

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?,
        None => singer::discover().context("Failed to build catalog")?,
    };

    let state = match &cli.state {
        Some(path) => State::from_file(path)
            .with_context(|| format!("Failed to read state: {}", path.display()))?,
        None => State::default(),
    };

    let client = WordpressClient::new(&config.base_url).context("Failed to build HTTP client")?;
    let mut reviews = WordpressReviews::new(client, config.plugins, config.number);
    let mut sink = SingerWriter::new(io::stdout().lock());

    singer::sync(&mut reviews, &catalog, state, &mut sink)
        .await
        .context("Sync failed")?;

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tap_wordpress_reviews=debug"));

    // stdout carries Singer messages, so logs always go to stderr
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
