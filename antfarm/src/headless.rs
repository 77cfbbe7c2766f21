use anyhow::Result;
use antgrid::{EntityKind, TickSummary};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::engine::render_frame;
use crate::export::FrameExporter;
use crate::session::Session;

/// How often an unbounded run reports progress.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Per-run result of a headless session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run: u32,
    pub seed: u64,
    pub ticks: u64,
    pub feedings: u64,
    pub totals: TickSummary,
}

/// Runs the whole session without a window.
pub fn run(config: AppConfig) -> Result<Vec<RunReport>> {
    let mut session = Session::new(&config.simulation, config.world)?;
    let mut exporter = config
        .presenter
        .export_dir
        .as_ref()
        .map(FrameExporter::new)
        .transpose()?;
    if session.is_unbounded() {
        warn!("Session has no tick or run limit; it will run until interrupted");
    }

    let scale = config.presenter.scale;
    let mut reports = Vec::new();
    loop {
        if let Some(exporter) = exporter.as_mut() {
            exporter.begin_set(session.run)?;
        }

        let mut totals = TickSummary::default();
        while !session.run_finished() {
            if let Some(exporter) = exporter.as_mut() {
                let image = render_frame(&session.sim.grid, session.sim.feedings, scale);
                exporter.write(&image, session.sim.tick)?;
            }
            totals += session.sim.step();
            if session.ticks_per_run().is_none() && session.sim.tick % PROGRESS_INTERVAL == 0 {
                info!(
                    run = session.run,
                    tick = session.sim.tick,
                    feedings = session.sim.feedings,
                    "Progress"
                );
            }
        }

        let report = RunReport {
            run: session.run,
            seed: session.seed(),
            ticks: session.sim.tick,
            feedings: session.sim.feedings,
            totals,
        };
        let census = session.sim.census();
        info!(
            run = report.run,
            seed = report.seed,
            ticks = report.ticks,
            feedings = report.feedings,
            pickups = totals.pickups,
            agents = census.agents(),
            carrying = census.get(EntityKind::AntCarryingFoodLayingTrail)
                + census.get(EntityKind::AntCarryingFood),
            food = census.get(EntityKind::Food),
            markers = census.markers(),
            "Run finished"
        );
        reports.push(report);

        if !session.next_run() {
            break;
        }
    }

    if let Some(exporter) = exporter {
        info!(
            "Wrote {} frames to '{}'",
            exporter.frames_written,
            exporter.run_dir().display()
        );
    }
    Ok(reports)
}
