use rand::Rng;
use std::ops::AddAssign;
use tracing::debug;

use crate::behavior::{self, Outcome};
use crate::error::GridError;
use crate::generator::WorldGenerator;
use crate::grid::Grid;
use crate::kind::EntityKind;
use crate::rng::{SimRng, seeded};

/// What happened during one pass over the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub deliveries: u32,
    pub pickups: u32,
    pub moves: u32,
    pub markers_faded: u32,
    pub feedees_recovered: u32,
}

impl TickSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Delivered { .. } => self.deliveries += 1,
            Outcome::PickedUp { .. } => self.pickups += 1,
            Outcome::Moved { .. } => self.moves += 1,
            Outcome::MarkerFaded => self.markers_faded += 1,
            Outcome::FeedeeRecovered => self.feedees_recovered += 1,
            Outcome::Idle => {}
        }
    }
}

impl AddAssign for TickSummary {
    fn add_assign(&mut self, other: Self) {
        self.deliveries += other.deliveries;
        self.pickups += other.pickups;
        self.moves += other.moves;
        self.markers_faded += other.markers_faded;
        self.feedees_recovered += other.feedees_recovered;
    }
}

/// Cell count per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Census {
    counts: [usize; EntityKind::COUNT],
}

impl Census {
    pub fn of(grid: &Grid) -> Self {
        let mut counts = [0; EntityKind::COUNT];
        for kind in grid.cells() {
            counts[kind.index()] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, kind: EntityKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn agents(&self) -> usize {
        EntityKind::ALL
            .iter()
            .filter(|k| k.is_agent())
            .map(|k| self.get(*k))
            .sum()
    }

    pub fn markers(&self) -> usize {
        self.get(EntityKind::GrassWithFoodMarker) + self.get(EntityKind::GrassWithFeedeeMarker)
    }
}

/// Runs every cell's rule once, `y` outer and `x` inner, mutating in place.
///
/// A cell sees whatever earlier cells in the same pass already wrote, so an
/// agent that steps forward in scan order is updated again this pass and
/// one that steps backward waits until the next.
pub fn tick<R: Rng>(grid: &mut Grid, rng: &mut R) -> TickSummary {
    let mut summary = TickSummary::default();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            summary.record(behavior::update(grid, rng, x, y));
        }
    }
    summary
}

/// A grid, its random source and the feeding counter for one run.
pub struct Simulation {
    pub tick: u64,
    pub grid: Grid,
    pub feedings: u64,
    rng: SimRng,
}

impl Simulation {
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self {
            tick: 0,
            grid,
            feedings: 0,
            rng: seeded(seed),
        }
    }

    /// Creates a grid of the given size and lets `generator` populate it.
    pub fn generate(
        width: i32,
        height: i32,
        seed: u64,
        generator: &dyn WorldGenerator,
    ) -> Result<Self, GridError> {
        let mut grid = Grid::new(width, height)?;
        generator.populate(&mut grid, seed);
        Ok(Self::new(grid, seed))
    }

    /// Starts a new run on `grid`: counters go back to zero and the random
    /// source is reseeded.
    pub fn restart(&mut self, grid: Grid, seed: u64) {
        self.grid = grid;
        self.tick = 0;
        self.feedings = 0;
        self.rng = seeded(seed);
    }

    /// Advances one tick.
    pub fn step(&mut self) -> TickSummary {
        let summary = tick(&mut self.grid, &mut self.rng);
        self.feedings += summary.deliveries as u64;
        self.tick += 1;
        debug!(tick = self.tick, ?summary, "tick");
        summary
    }

    /// Advances `ticks` ticks and returns the accumulated summary.
    pub fn run(&mut self, ticks: u64) -> TickSummary {
        let mut total = TickSummary::default();
        for _ in 0..ticks {
            total += self.step();
        }
        total
    }

    pub fn census(&self) -> Census {
        Census::of(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ClassicGenerator;

    fn grid_of(w: i32, h: i32, fill: EntityKind, cells: &[(i32, i32, EntityKind)]) -> Grid {
        let mut grid = Grid::filled(w, h, fill).unwrap();
        for &(x, y, kind) in cells {
            grid.put(x, y, kind);
        }
        grid
    }

    #[test]
    fn test_food_scenario_recorded_trace() {
        use EntityKind::{
            AntCarryingFoodLayingTrail as Carrier, EmptyAntLayingFeedeeTrail as Empty,
            FedFeedee as Fed, Feedee, Grass as G, GrassWithFeedeeMarker as Fm,
            GrassWithFoodMarker as Ff,
        };
        let grid = grid_of(
            4,
            4,
            EntityKind::Grass,
            &[
                (1, 1, EntityKind::Food),
                (0, 0, EntityKind::Ant),
                (3, 3, EntityKind::Feedee),
            ],
        );
        let mut sim = Simulation::new(grid, 0);

        // Tick 1: the food at (1, 1) is always a neighbor of (0, 0) on a 4x4 torus.
        let summary = sim.step();
        assert_eq!(summary.pickups, 1);
        assert_eq!(
            sim.grid.cells(),
            &[
                Carrier, G, G, G, //
                G, Ff, G, G, //
                G, G, G, G, //
                G, G, G, Feedee,
            ]
        );
        assert_eq!(sim.feedings, 0);

        // Tick 2: (3, 3) wraps onto (0, 0), so the carrier delivers and marks
        // every unmarked grass neighbor.
        let summary = sim.step();
        assert_eq!(summary.deliveries, 1);
        assert_eq!(
            sim.grid.cells(),
            &[
                Empty, Fm, G, Fm, //
                Fm, Ff, G, Fm, //
                G, G, G, G, //
                Fm, Fm, G, Fed,
            ]
        );
        assert_eq!(sim.feedings, 1);

        // Tick 3: the empty ant walks off laying its feedee trail.
        sim.step();
        assert_eq!(
            sim.grid.cells(),
            &[
                Fm, Fm, G, Empty, //
                Fm, Ff, G, Fm, //
                G, G, G, G, //
                Fm, Fm, Fm, Fed,
            ]
        );
        assert_eq!(sim.feedings, 1);
    }

    #[test]
    fn test_forward_mover_updates_twice_in_one_pass() {
        // One-row corridor: the ant steps to x=1, gets visited again there
        // and steps back to x=0, its only walkable neighbor.
        let grid = grid_of(
            3,
            1,
            EntityKind::Water,
            &[(0, 0, EntityKind::Ant), (1, 0, EntityKind::Grass)],
        );
        let mut sim = Simulation::new(grid, 3);
        let summary = sim.step();
        assert_eq!(summary.moves, 2);
        assert_eq!(sim.grid.get(0, 0), EntityKind::Ant);
        assert_eq!(sim.grid.get(1, 0), EntityKind::Grass);
    }

    #[test]
    fn test_backward_mover_waits_for_next_pass() {
        let grid = grid_of(
            3,
            1,
            EntityKind::Water,
            &[(0, 0, EntityKind::Grass), (1, 0, EntityKind::Ant)],
        );
        let mut sim = Simulation::new(grid, 3);
        let summary = sim.step();
        assert_eq!(summary.moves, 1);
        assert_eq!(sim.grid.get(0, 0), EntityKind::Ant);
        assert_eq!(sim.grid.get(1, 0), EntityKind::Grass);
    }

    #[test]
    fn test_delivery_increments_feedings_once() {
        let grid = grid_of(
            3,
            3,
            EntityKind::Water,
            &[(0, 0, EntityKind::Feedee), (1, 1, EntityKind::AntCarryingFood)],
        );
        let mut sim = Simulation::new(grid, 1);
        let summary = sim.step();
        assert_eq!(summary.deliveries, 1);
        assert_eq!(sim.feedings, 1);
        assert_eq!(sim.grid.get(0, 0), EntityKind::FedFeedee);
        assert_eq!(sim.grid.get(1, 1), EntityKind::EmptyAntLayingFeedeeTrail);
    }

    #[test]
    fn test_delivery_conservation_over_long_run() {
        let mut sim = Simulation::generate(48, 32, 2, &ClassicGenerator).unwrap();
        for _ in 0..400 {
            let before = sim.census();
            let fed_before = sim.feedings;
            let summary = sim.step();
            let after = sim.census();
            assert_eq!(sim.feedings - fed_before, summary.deliveries as u64);

            // Every delivery turns a carrier into an empty ant; pickups go the other way.
            let carriers = |c: &Census| {
                c.get(EntityKind::AntCarryingFoodLayingTrail) + c.get(EntityKind::AntCarryingFood)
            };
            assert_eq!(
                carriers(&after) as i64 - carriers(&before) as i64,
                summary.pickups as i64 - summary.deliveries as i64
            );
            assert_eq!(before.agents(), after.agents());
        }
    }

    #[test]
    fn test_identical_seeds_give_identical_runs() {
        let mut a = Simulation::generate(40, 24, 5, &ClassicGenerator).unwrap();
        let mut b = Simulation::generate(40, 24, 5, &ClassicGenerator).unwrap();
        assert_eq!(a.grid, b.grid);
        for _ in 0..200 {
            assert_eq!(a.step(), b.step());
            assert_eq!(a.grid, b.grid);
        }
        assert_eq!(a.feedings, b.feedings);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let grid = Simulation::generate(40, 24, 5, &ClassicGenerator).unwrap().grid;
        let mut a = Simulation::new(grid.clone(), 1);
        let mut b = Simulation::new(grid, 2);
        a.run(50);
        b.run(50);
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_markers_decay_to_grass() {
        let mut grid = Grid::new(16, 16).unwrap();
        for (i, (x, y)) in (0..16).flat_map(|y| (0..16).map(move |x| (x, y))).enumerate() {
            let kind = match i % 3 {
                0 => EntityKind::GrassWithFoodMarker,
                1 => EntityKind::GrassWithFeedeeMarker,
                _ => EntityKind::Water,
            };
            grid.put(x, y, kind);
        }
        let mut sim = Simulation::new(grid, 77);
        let mut ticks = 0;
        while sim.census().markers() > 0 {
            sim.step();
            ticks += 1;
            assert!(ticks < 5_000, "markers survived {} ticks", ticks);
        }
        assert_eq!(sim.census().get(EntityKind::Water), 85);
        assert_eq!(sim.census().get(EntityKind::Grass), 256 - 85);
    }

    #[test]
    fn test_water_never_changes() {
        let mut sim = Simulation::generate(64, 36, 0, &ClassicGenerator).unwrap();
        let water: Vec<_> = sim
            .grid
            .iter()
            .filter(|(_, _, k)| *k == EntityKind::Water)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!water.is_empty());
        sim.run(300);
        for (x, y) in water {
            assert_eq!(sim.grid.get(x, y), EntityKind::Water);
        }
    }

    #[test]
    fn test_census_covers_every_cell() {
        let mut sim = Simulation::generate(30, 20, 1, &ClassicGenerator).unwrap();
        for _ in 0..50 {
            sim.step();
            assert_eq!(sim.census().total(), 600);
        }
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut sim = Simulation::generate(30, 20, 2, &ClassicGenerator).unwrap();
        sim.run(100);
        assert_eq!(sim.tick, 100);
        let fresh = Grid::new(30, 20).unwrap();
        sim.restart(fresh.clone(), 9);
        assert_eq!(sim.tick, 0);
        assert_eq!(sim.feedings, 0);
        assert_eq!(sim.grid, fresh);
    }
}
