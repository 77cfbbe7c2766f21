use anyhow::Result;
use macroquad::prelude::*;
use tracing::{info, warn};

use crate::config::{AppConfig, PresenterConfig};
use crate::engine::Renderer;
use crate::export::FrameExporter;
use crate::session::Session;
use crate::timer::Timer;

/// Frame budget for unlimited mode.
const TARGET_FRAME_TIME: f64 = 1.0 / 60.0;
/// Ticks allowed per frame before the pacer drops its backlog.
const MAX_TICKS_PER_FRAME: u32 = 256;

/// Main application structure for the windowed presenter.
pub struct AntApp {
    session: Session,                // Runs, seeds and the simulation itself.
    renderer: Renderer,              // Turns the grid into pixels.
    exporter: Option<FrameExporter>, // Writes frames when exporting.
    tick_timer: Timer,               // Paces ticks to the configured rate.
    presenter: PresenterConfig,
    is_paused: bool,
    is_done: bool, // Set once the last run has finished.
}

impl AntApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let session = Session::new(&config.simulation, config.world)?;
        let renderer = Renderer::new(&session.sim, config.presenter.scale);
        let mut exporter = config
            .presenter
            .export_dir
            .as_ref()
            .map(FrameExporter::new)
            .transpose()?;
        if let Some(exporter) = exporter.as_mut() {
            exporter.begin_set(session.run)?;
        }

        Ok(Self {
            session,
            renderer,
            exporter,
            tick_timer: Timer::per_second(config.presenter.tick_rate),
            presenter: config.presenter,
            is_paused: false,
            is_done: false,
        })
    }

    /// Runs the main application loop until Escape is pressed. After the
    /// last run the final frame stays on screen.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if is_key_pressed(KeyCode::Escape) {
                info!("Quit requested");
                break;
            }
            self.handle_shortcuts()?;

            // Draw before ticking so exported frames include the initial state.
            self.renderer.render(&self.session.sim, &self.status_line());

            if !self.is_paused && !self.is_done {
                if self.exporter.is_some() {
                    // One frame per tick while exporting.
                    self.export_frame()?;
                    self.step()?;
                } else {
                    self.advance(get_frame_time())?;
                }
            }

            next_frame().await;
        }
        Ok(())
    }

    /// Runs as many ticks as the elapsed time allows.
    fn advance(&mut self, dt: f32) -> Result<()> {
        if self.presenter.unlimited {
            let frame_start = get_time();
            while get_time() - frame_start < TARGET_FRAME_TIME && !self.is_done {
                self.step()?;
            }
            return Ok(());
        }

        self.tick_timer.update(dt);
        let mut ticks = 0;
        while self.tick_timer.is_ready() && !self.is_done {
            self.step()?;
            self.tick_timer.consume();
            ticks += 1;
            if ticks >= MAX_TICKS_PER_FRAME {
                self.tick_timer.reset();
                break;
            }
        }
        Ok(())
    }

    /// One tick, rolling over to the next run when the current one is spent.
    fn step(&mut self) -> Result<()> {
        self.session.sim.step();
        if self.session.run_finished() {
            info!(
                run = self.session.run,
                ticks = self.session.sim.tick,
                feedings = self.session.sim.feedings,
                "Run finished"
            );
            if self.session.next_run() {
                self.begin_export_set()?;
            } else {
                info!("All runs finished");
                self.is_done = true;
            }
        }
        Ok(())
    }

    fn export_frame(&mut self) -> Result<()> {
        if let Some(exporter) = self.exporter.as_mut() {
            exporter.write(self.renderer.frame(), self.session.sim.tick)?;
        }
        Ok(())
    }

    fn begin_export_set(&mut self) -> Result<()> {
        if let Some(exporter) = self.exporter.as_mut() {
            exporter.begin_set(self.session.run)?;
        }
        Ok(())
    }

    /// Handles keyboard shortcuts.
    fn handle_shortcuts(&mut self) -> Result<()> {
        if is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Space) {
            self.is_paused = !self.is_paused;
            info!(paused = self.is_paused, "Toggled pause");
        } else if is_key_pressed(KeyCode::R) {
            self.session.restart_run();
            self.is_done = false;
            self.begin_export_set()?;
        } else if is_key_pressed(KeyCode::N) {
            if self.session.next_run() {
                self.is_done = false;
                self.begin_export_set()?;
            } else {
                warn!("No runs left");
            }
        } else if is_key_pressed(KeyCode::S) {
            match self.session.save_snapshot() {
                Ok(path) => info!("Snapshot written to '{}'", path.display()),
                Err(e) => warn!("Failed to save snapshot: {:#}", e),
            }
        }
        Ok(())
    }

    fn status_line(&self) -> String {
        let sim = &self.session.sim;
        let ticks = match self.session.ticks_per_run() {
            Some(limit) => format!("{}/{}", sim.tick, limit),
            None => sim.tick.to_string(),
        };
        let state = if self.is_done {
            "  [done]"
        } else if self.is_paused {
            "  [paused]"
        } else {
            ""
        };
        format!(
            "run {}  seed {}  tick {}  feedings {}{}",
            self.session.run,
            self.session.seed(),
            ticks,
            sim.feedings,
            state
        )
    }
}
