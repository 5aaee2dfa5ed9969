use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use glucodash_types::Range;

mod config;
mod tui;

use config::Config;

#[derive(Parser)]
#[command(name = "glucodash")]
#[command(author, version, about = "Terminal dashboard for glucose monitoring", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Session user identifier (overrides config)
    #[arg(long)]
    user: Option<String>,

    /// Initial chart range (3h, 6h, 12h, 24h)
    #[arg(long)]
    range: Option<Range>,

    /// Hide the 70-180 mg/dL target band on the chart
    #[arg(long)]
    no_target_band: bool,

    /// Use an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so they never corrupt the alternate screen.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // CLI flags override the config file.
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(user) = cli.user {
        config.api.user_id = user;
    }
    if let Some(range) = cli.range {
        config.ui.default_range = range;
    }
    if cli.no_target_band {
        config.ui.show_target_band = false;
    }

    tui::run(config).await
}
