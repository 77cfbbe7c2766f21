//! Per-kind update rules.
//!
//! Each rule reads and writes the grid in place and reports what it did.
//! Rules never look further than the eight neighbors of their own cell.

use rand::Rng;

use crate::grid::Grid;
use crate::kind::{EntityKind, Probe};
use crate::rng::chance;
use crate::search::{Cell, move_and_become, search, walk};
use crate::{
    BIAS_CHANCE, BIAS_SCALE, COOLDOWN_DENOMINATOR, MARKER_DECAY_DENOMINATOR,
    TRAIL_DEGRADE_DENOMINATOR,
};

/// The single thing a rule did this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Food at `food` was marked and the agent picked it up in place.
    PickedUp { food: Cell },
    /// The agent fed the feedee at `feedee` and is now empty.
    Delivered { feedee: Cell },
    /// The agent relocated to `to`.
    Moved { to: Cell },
    /// A marker reverted to plain grass.
    MarkerFaded,
    /// A fed feedee became hungry again.
    FeedeeRecovered,
    /// Nothing changed.
    Idle,
}

/// Runs the rule for whatever currently occupies `(x, y)`.
pub fn update<R: Rng>(grid: &mut Grid, rng: &mut R, x: i32, y: i32) -> Outcome {
    match grid.get(x, y) {
        EntityKind::Grass | EntityKind::Water | EntityKind::Food | EntityKind::Feedee => {
            Outcome::Idle
        }
        EntityKind::GrassWithFoodMarker | EntityKind::GrassWithFeedeeMarker => {
            revert_with_chance(grid, rng, x, y, MARKER_DECAY_DENOMINATOR, EntityKind::Grass)
        }
        EntityKind::FedFeedee => {
            revert_with_chance(grid, rng, x, y, COOLDOWN_DENOMINATOR, EntityKind::Feedee)
        }
        EntityKind::Ant => ant(grid, rng, x, y),
        EntityKind::AntCarryingFoodLayingTrail => ant_with_food_laying_trail(grid, rng, x, y),
        EntityKind::AntCarryingFood => ant_with_food(grid, rng, x, y),
        EntityKind::EmptyAntLayingFeedeeTrail => empty_ant_laying_trail(grid, rng, x, y),
    }
}

fn revert_with_chance<R: Rng>(
    grid: &mut Grid,
    rng: &mut R,
    x: i32,
    y: i32,
    denominator: u32,
    into: EntityKind,
) -> Outcome {
    if !chance(rng, 1, denominator) {
        return Outcome::Idle;
    }
    grid.put(x, y, into);
    match into {
        EntityKind::Feedee => Outcome::FeedeeRecovered,
        _ => Outcome::MarkerFaded,
    }
}

/// Most of the time look for `preferred` first; fall back to any walkable cell.
fn biased_step<R: Rng>(grid: &Grid, rng: &mut R, x: i32, y: i32, preferred: Probe) -> Option<Cell> {
    if chance(rng, BIAS_CHANCE, BIAS_SCALE) {
        if let Some(target) = search(grid, rng, x, y, preferred) {
            return Some(target);
        }
    }
    search(grid, rng, x, y, Probe::Walkable)
}

/// Marks the food and turns the carrier into a trail layer without moving.
fn pick_up(grid: &mut Grid, x: i32, y: i32, food: Cell) -> Outcome {
    grid.put(food.0, food.1, EntityKind::GrassWithFoodMarker);
    grid.put(x, y, EntityKind::AntCarryingFoodLayingTrail);
    Outcome::PickedUp { food }
}

fn ant<R: Rng>(grid: &mut Grid, rng: &mut R, x: i32, y: i32) -> Outcome {
    if let Some(food) = search(grid, rng, x, y, Probe::Food) {
        return pick_up(grid, x, y, food);
    }
    match biased_step(grid, rng, x, y, Probe::NearFood) {
        Some(to) => {
            walk(grid, (x, y), to, EntityKind::Ant);
            Outcome::Moved { to }
        }
        None => Outcome::Idle,
    }
}

fn ant_with_food_laying_trail<R: Rng>(grid: &mut Grid, rng: &mut R, x: i32, y: i32) -> Outcome {
    let next_self = if chance(rng, 1, TRAIL_DEGRADE_DENOMINATOR) {
        EntityKind::AntCarryingFood
    } else {
        EntityKind::AntCarryingFoodLayingTrail
    };

    if let Some(feedee) = search(grid, rng, x, y, Probe::Feedee) {
        grid.put(feedee.0, feedee.1, EntityKind::FedFeedee);
        // Only ever the same eight neighbors; this is not a flood fill.
        while let Some((tx, ty)) = search(grid, rng, x, y, Probe::UnmarkedGrass) {
            grid.put(tx, ty, EntityKind::GrassWithFeedeeMarker);
        }
        grid.put(x, y, EntityKind::EmptyAntLayingFeedeeTrail);
        return Outcome::Delivered { feedee };
    }

    match biased_step(grid, rng, x, y, Probe::NearFeedee) {
        Some(to) => {
            move_and_become(grid, (x, y), to, EntityKind::GrassWithFoodMarker, next_self);
            Outcome::Moved { to }
        }
        None => Outcome::Idle,
    }
}

fn ant_with_food<R: Rng>(grid: &mut Grid, rng: &mut R, x: i32, y: i32) -> Outcome {
    if let Some(feedee) = search(grid, rng, x, y, Probe::Feedee) {
        grid.put(feedee.0, feedee.1, EntityKind::FedFeedee);
        grid.put(x, y, EntityKind::EmptyAntLayingFeedeeTrail);
        return Outcome::Delivered { feedee };
    }
    match biased_step(grid, rng, x, y, Probe::NearFeedee) {
        Some(to) => {
            walk(grid, (x, y), to, EntityKind::AntCarryingFood);
            Outcome::Moved { to }
        }
        None => Outcome::Idle,
    }
}

fn empty_ant_laying_trail<R: Rng>(grid: &mut Grid, rng: &mut R, x: i32, y: i32) -> Outcome {
    let next_self = if chance(rng, 1, TRAIL_DEGRADE_DENOMINATOR) {
        EntityKind::Ant
    } else {
        EntityKind::EmptyAntLayingFeedeeTrail
    };

    if let Some(food) = search(grid, rng, x, y, Probe::Food) {
        return pick_up(grid, x, y, food);
    }
    match biased_step(grid, rng, x, y, Probe::NearFood) {
        Some(to) => {
            move_and_become(grid, (x, y), to, EntityKind::GrassWithFeedeeMarker, next_self);
            Outcome::Moved { to }
        }
        None => Outcome::Idle,
    }
}
