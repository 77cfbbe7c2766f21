use anyhow::{Context, Result, bail};
use antgrid::Grid;
use macroquad::prelude::Conf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::Cli;

// Grid size limits; the rendered frame must fit a u16 image.
pub const MAX_GRID_DIMENSION: u32 = 8192;
pub const MAX_FRAME_DIMENSION: u32 = u16::MAX as u32;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub ticks: Option<u64>,     // Ticks per run, None runs forever
    pub seed: u64,              // Run k uses seed + k
    pub runs: Option<u32>,      // Number of runs, None cycles forever
    pub world: Option<String>,  // Optional snapshot used instead of the generator
    pub snapshots_dir: String,  // Where `S` saves snapshots
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 90,
            ticks: Some(1024),
            seed: 0,
            runs: None,
            world: None,
            snapshots_dir: "snapshots/".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PresenterConfig {
    pub scale: u32,
    pub tick_rate: f32,             // Ticks per second in the window
    pub unlimited: bool,            // Tick as fast as a frame allows
    pub export_dir: Option<String>, // Write every frame as PNG under this directory
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            scale: 4,
            tick_rate: 100.0,
            unlimited: false,
            export_dir: None,
        }
    }
}

/// Layout of the TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub simulation: SimulationConfig,
    pub presenter: PresenterConfig,
}

/// Configuration for the entire application including CLI parameters
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub presenter: PresenterConfig,
    pub headless: bool,
    /// Grid loaded from `simulation.world`, if any.
    pub world: Option<Grid>,
}

/// Loads the configuration from a TOML file or uses defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
            info!("Loaded config from '{}'", path.display());
            Ok(config)
        }
        None => {
            info!("No config file provided, using defaults.");
            Ok(FileConfig::default())
        }
    }
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

impl AppConfig {
    pub fn from_cli_and_config(cli: &Cli, file: FileConfig) -> Result<Self> {
        let FileConfig {
            mut simulation,
            mut presenter,
        } = file;

        if let Some(width) = cli.width {
            simulation.width = width;
        }
        if let Some(height) = cli.height {
            simulation.height = height;
        }
        if cli.forever {
            simulation.ticks = None;
        } else if let Some(ticks) = cli.ticks {
            simulation.ticks = Some(ticks);
        }
        if let Some(seed) = cli.seed {
            simulation.seed = seed;
        }
        if let Some(runs) = cli.runs {
            simulation.runs = Some(runs);
        }
        if let Some(world) = &cli.world {
            simulation.world = Some(world.display().to_string());
        }
        if let Some(dir) = &cli.export_dir {
            presenter.export_dir = Some(dir.display().to_string());
        }

        let world = match &simulation.world {
            Some(path) => {
                let grid = Grid::load_snapshot(PathBuf::from(path))
                    .with_context(|| format!("Failed to load world snapshot '{}'", path))?;
                let (w, h) = (grid.width() as u32, grid.height() as u32);
                let explicit = cli.width.is_some() || cli.height.is_some();
                if explicit && (w, h) != (simulation.width, simulation.height) {
                    bail!(
                        "World '{}' is {}x{} but {}x{} was requested",
                        path,
                        w,
                        h,
                        simulation.width,
                        simulation.height
                    );
                }
                simulation.width = w;
                simulation.height = h;
                Some(grid)
            }
            None => None,
        };

        let config = Self {
            simulation,
            presenter,
            headless: cli.headless,
            world,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        let presenter = &self.presenter;
        for (name, value) in [("width", sim.width), ("height", sim.height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                bail!("Grid {} must be in 1..={}, got {}", name, MAX_GRID_DIMENSION, value);
            }
        }
        if sim.runs == Some(0) {
            bail!("Runs must be at least 1 when set");
        }
        if sim.ticks == Some(0) {
            bail!("Ticks per run must be at least 1 when set");
        }
        if presenter.scale == 0 {
            bail!("Presenter scale must be at least 1");
        }
        let frame = sim.width.max(sim.height) as u64 * presenter.scale as u64;
        if frame > MAX_FRAME_DIMENSION as u64 {
            bail!(
                "A {}x{} grid at scale {} exceeds the {} pixel frame limit",
                sim.width,
                sim.height,
                presenter.scale,
                MAX_FRAME_DIMENSION
            );
        }
        if !(presenter.tick_rate > 0.0) {
            bail!("Tick rate must be positive, got {}", presenter.tick_rate);
        }
        Ok(())
    }
}

pub fn window_conf(config: &AppConfig) -> Conf {
    let scale = config.presenter.scale;
    Conf {
        window_title: "Ants".to_owned(),
        window_width: (config.simulation.width * scale) as i32,
        window_height: (config.simulation.height * scale) as i32,
        high_dpi: true,
        ..Default::default()
    }
}
