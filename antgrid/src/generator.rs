use rand::Rng;

use crate::grid::Grid;
use crate::kind::EntityKind;
use crate::rng::{GENERATOR_STREAM, SimRng, seeded_stream};
use crate::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

/// Fills a fresh grid before the first tick.
pub trait WorldGenerator {
    /// Must leave every cell holding a valid kind.
    fn populate(&self, grid: &mut Grid, seed: u64);
}

/// Counts below are tuned for a 160x90 world and scale with area.
const OCEAN_STEPS: u32 = 16384;
const SCATTER_COUNT: u32 = 256;
const ANT_COUNT: u32 = 128;
const FEEDEE_CLUSTERS: u32 = 24;
const FEEDEE_CLUSTER_SIZE: i32 = 3;
const FAT_FOOD_PATCHES: u32 = 24;
const FAT_FOOD_SIZE: i32 = 7;
const FOOD_PATCHES: u32 = 64;
const FOOD_SIZE: i32 = 5;

/// The layout family picked by a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub ocean: bool,
    /// Ants and feedees mixed in one scatter, rather than ants apart from
    /// clustered feedees.
    pub mixed_scatter: bool,
    /// Fewer, larger food patches.
    pub fat_food: bool,
}

impl Layout {
    pub fn for_seed(seed: u64) -> Self {
        Self {
            ocean: seed % 4 < 3,
            mixed_scatter: seed % 2 == 0,
            fat_food: seed % 3 == 1,
        }
    }
}

/// Random-walk oceans, scattered ants and feedees, square food patches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicGenerator;

impl ClassicGenerator {
    fn scaled(count: u32, grid: &Grid) -> u32 {
        let area = grid.len() as f64;
        let reference = (REFERENCE_WIDTH * REFERENCE_HEIGHT) as f64;
        ((count as f64 * area / reference).round() as u32).max(1)
    }

    fn random_cell(rng: &mut SimRng, grid: &Grid) -> (i32, i32) {
        (
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        )
    }

    fn stamp(grid: &mut Grid, cx: i32, cy: i32, size: i32, kind: EntityKind) {
        for dy in 0..size {
            for dx in 0..size {
                grid.put(cx + dx, cy + dy, kind);
            }
        }
    }

    fn ocean(rng: &mut SimRng, grid: &mut Grid) {
        let (mut x, mut y) = Self::random_cell(rng, grid);
        for _ in 0..Self::scaled(OCEAN_STEPS, grid) {
            grid.put(x, y, EntityKind::Water);
            match rng.random_range(0..4) {
                0 => x += 1,
                1 => x -= 1,
                2 => y += 1,
                _ => y -= 1,
            }
            (x, y) = grid.wrap(x, y);
        }
    }

    fn mixed_scatter(rng: &mut SimRng, grid: &mut Grid) {
        for _ in 0..Self::scaled(SCATTER_COUNT, grid) {
            let kind = match rng.random_range(0..3) {
                0 => EntityKind::Ant,
                _ => EntityKind::Feedee,
            };
            let (x, y) = Self::random_cell(rng, grid);
            grid.put(x, y, kind);
        }
    }

    fn separate_scatter(rng: &mut SimRng, grid: &mut Grid) {
        for _ in 0..Self::scaled(ANT_COUNT, grid) {
            let (x, y) = Self::random_cell(rng, grid);
            grid.put(x, y, EntityKind::Ant);
        }
        for _ in 0..Self::scaled(FEEDEE_CLUSTERS, grid) {
            let (cx, cy) = Self::random_cell(rng, grid);
            Self::stamp(grid, cx, cy, FEEDEE_CLUSTER_SIZE, EntityKind::Feedee);
        }
    }

    fn food(rng: &mut SimRng, grid: &mut Grid, patches: u32, size: i32) {
        for _ in 0..Self::scaled(patches, grid) {
            let (cx, cy) = Self::random_cell(rng, grid);
            Self::stamp(grid, cx, cy, size, EntityKind::Food);
        }
    }
}

impl WorldGenerator for ClassicGenerator {
    fn populate(&self, grid: &mut Grid, seed: u64) {
        let layout = Layout::for_seed(seed);
        let mut rng = seeded_stream(seed, GENERATOR_STREAM);

        grid.fill(EntityKind::Grass);
        if layout.ocean {
            Self::ocean(&mut rng, grid);
        }
        if layout.mixed_scatter {
            Self::mixed_scatter(&mut rng, grid);
        } else {
            Self::separate_scatter(&mut rng, grid);
        }
        if layout.fat_food {
            Self::food(&mut rng, grid, FAT_FOOD_PATCHES, FAT_FOOD_SIZE);
        } else {
            Self::food(&mut rng, grid, FOOD_PATCHES, FOOD_SIZE);
        }
    }
}

/// Populates every run with a fixed grid, such as a loaded snapshot.
#[derive(Debug, Clone)]
pub struct FixedWorld {
    pub grid: Grid,
}

impl WorldGenerator for FixedWorld {
    fn populate(&self, grid: &mut Grid, _seed: u64) {
        if grid.width() == self.grid.width() && grid.height() == self.grid.height() {
            grid.clone_from(&self.grid);
        } else {
            // Tile the stored world over a differently sized grid.
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    grid.put(x, y, self.grid.get(x, y));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Census;

    #[test]
    fn test_layout_for_seed() {
        assert_eq!(
            Layout::for_seed(0),
            Layout { ocean: true, mixed_scatter: true, fat_food: false }
        );
        assert_eq!(
            Layout::for_seed(1),
            Layout { ocean: true, mixed_scatter: false, fat_food: true }
        );
        assert_eq!(
            Layout::for_seed(3),
            Layout { ocean: false, mixed_scatter: false, fat_food: false }
        );
    }

    #[test]
    fn test_populate_is_deterministic() {
        for seed in 0..6 {
            let mut a = Grid::new(80, 45).unwrap();
            let mut b = Grid::new(80, 45).unwrap();
            ClassicGenerator.populate(&mut a, seed);
            ClassicGenerator.populate(&mut b, seed);
            assert_eq!(a, b, "seed {}", seed);
        }
    }

    #[test]
    fn test_populate_places_agents_food_and_feedees() {
        for seed in 0..12 {
            let mut grid = Grid::new(160, 90).unwrap();
            ClassicGenerator.populate(&mut grid, seed);
            let census = Census::of(&grid);
            assert_eq!(census.total(), 160 * 90);
            assert!(census.get(EntityKind::Ant) > 0, "seed {} has no ants", seed);
            assert!(census.get(EntityKind::Food) > 0, "seed {} has no food", seed);
            assert!(census.get(EntityKind::Feedee) > 0, "seed {} has no feedees", seed);
            assert_eq!(census.markers(), 0);
            assert_eq!(census.get(EntityKind::Water) > 0, Layout::for_seed(seed).ocean);
        }
    }

    #[test]
    fn test_populate_overwrites_previous_contents() {
        let mut grid = Grid::filled(20, 20, EntityKind::FedFeedee).unwrap();
        ClassicGenerator.populate(&mut grid, 3);
        assert_eq!(grid.count(EntityKind::FedFeedee), 0);
    }

    #[test]
    fn test_populate_tiny_grid() {
        let mut grid = Grid::new(1, 1).unwrap();
        ClassicGenerator.populate(&mut grid, 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_fixed_world_tiles() {
        let mut stored = Grid::new(2, 2).unwrap();
        stored.put(1, 1, EntityKind::Food);
        let world = FixedWorld { grid: stored.clone() };

        let mut same = Grid::new(2, 2).unwrap();
        world.populate(&mut same, 0);
        assert_eq!(same, stored);

        let mut larger = Grid::new(4, 4).unwrap();
        world.populate(&mut larger, 0);
        assert_eq!(larger.count(EntityKind::Food), 4);
        assert_eq!(larger.get(3, 3), EntityKind::Food);
    }
}
