mod app;
mod config;
mod engine;
mod export;
mod headless;
mod session;
mod timer;

use std::path::PathBuf;

use anyhow::Result;
use app::AntApp;
use clap::Parser;
use config::{AppConfig, load_config, window_conf};
use tracing::{error, info};

/// Command-line arguments for the ant farm.
#[derive(Parser, Debug)]
#[command(name = "antfarm", version, about = "Grid ant foraging simulation")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u32>,

    /// Ticks per run.
    #[arg(long, conflicts_with = "forever")]
    ticks: Option<u64>,

    /// Never end a run on its own.
    #[arg(long)]
    forever: bool,

    /// Base random seed; run k uses seed + k.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of runs before exiting.
    #[arg(long)]
    runs: Option<u32>,

    /// Snapshot to start every run from instead of generating a world.
    #[arg(long)]
    world: Option<PathBuf>,

    /// Write every frame as PNG under this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let file_config = load_config(cli.config.as_deref())?;
    let config = AppConfig::from_cli_and_config(&cli, file_config)?;
    info!("Config: {:?} {:?}", config.simulation, config.presenter);

    if config.headless {
        let reports = headless::run(config)?;
        let feedings: u64 = reports.iter().map(|r| r.feedings).sum();
        info!("Finished {} runs with {} feedings", reports.len(), feedings);
        return Ok(());
    }

    let conf = window_conf(&config);
    macroquad::Window::from_config(conf, async move {
        let result = match AntApp::new(config) {
            Ok(mut app) => app.run().await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!("{:#}", e);
            std::process::exit(1);
        }
    });
    Ok(())
}
