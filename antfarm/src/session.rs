use anyhow::{Context, Result};
use antgrid::{ClassicGenerator, FixedWorld, Grid, Layout, Simulation, WorldGenerator};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::config::SimulationConfig;

/// A sequence of runs over freshly populated worlds.
pub struct Session {
    pub sim: Simulation,
    pub run: u32,
    config: SimulationConfig,
    generator: Box<dyn WorldGenerator>,
}

impl Session {
    pub fn new(config: &SimulationConfig, world: Option<Grid>) -> Result<Self> {
        let generator: Box<dyn WorldGenerator> = match world {
            Some(grid) => Box::new(FixedWorld { grid }),
            None => Box::new(ClassicGenerator),
        };
        let sim = Simulation::generate(
            config.width as i32,
            config.height as i32,
            config.seed,
            generator.as_ref(),
        )
        .context("Failed to create world")?;

        let session = Self {
            sim,
            run: 0,
            config: config.clone(),
            generator,
        };
        session.log_run_start();
        Ok(session)
    }

    pub fn seed(&self) -> u64 {
        self.seed_for(self.run)
    }

    pub fn seed_for(&self, run: u32) -> u64 {
        self.config.seed.wrapping_add(run as u64)
    }

    fn log_run_start(&self) {
        let seed = self.seed();
        if self.config.world.is_some() {
            info!(run = self.run, seed, "Starting run on loaded world");
        } else {
            info!(run = self.run, seed, layout = ?Layout::for_seed(seed), "Starting run");
        }
    }

    /// Repopulates the grid for the current run and resets its counters.
    pub fn restart_run(&mut self) {
        let seed = self.seed();
        let mut grid = self.sim.grid.clone();
        self.generator.populate(&mut grid, seed);
        self.sim.restart(grid, seed);
        self.log_run_start();
    }

    /// Moves on to the next run. Returns false once the configured number
    /// of runs is used up.
    pub fn next_run(&mut self) -> bool {
        if self.runs_exhausted_after(self.run) {
            return false;
        }
        self.run += 1;
        self.restart_run();
        true
    }

    fn runs_exhausted_after(&self, run: u32) -> bool {
        self.config.runs.is_some_and(|runs| run + 1 >= runs)
    }

    /// True when the current run has used up its ticks.
    pub fn run_finished(&self) -> bool {
        self.config.ticks.is_some_and(|ticks| self.sim.tick >= ticks)
    }

    /// True when the session never ends on its own.
    pub fn is_unbounded(&self) -> bool {
        self.config.ticks.is_none() || self.config.runs.is_none()
    }

    pub fn ticks_per_run(&self) -> Option<u64> {
        self.config.ticks
    }

    /// Saves the current grid under the snapshots directory.
    pub fn save_snapshot(&self) -> Result<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!("run-{:04}-tick-{:08}-{}.snap", self.run, self.sim.tick, millis);
        let path = PathBuf::from(&self.config.snapshots_dir).join(name);
        self.sim
            .grid
            .save_snapshot(&path)
            .with_context(|| format!("Failed to save snapshot to '{}'", path.display()))?;
        Ok(path)
    }
}
