use rand::Rng;

use crate::grid::Grid;
use crate::kind::{EntityKind, Probe};

/// A grid coordinate. Search results are always wrapped onto the torus.
pub type Cell = (i32, i32);

/// The eight compass offsets in scan order, clockwise from north-west.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Scans the eight neighbors of `(x, y)` starting at a random direction and
/// continuing clockwise, returning the first one `probe` accepts.
///
/// Only the starting direction is random; ties between qualifying
/// neighbors go to whichever comes first after that start.
pub fn search<R: Rng>(grid: &Grid, rng: &mut R, x: i32, y: i32, probe: Probe) -> Option<Cell> {
    let start = rng.random_range(0..DIRECTIONS.len() as u32) as usize;
    scan_from(grid, start, x, y, probe)
}

/// The deterministic half of [`search`].
pub fn scan_from(grid: &Grid, start: usize, x: i32, y: i32, probe: Probe) -> Option<Cell> {
    (0..DIRECTIONS.len())
        .map(|d| DIRECTIONS[(start + d) & 7])
        .map(|(dx, dy)| grid.wrap(x + dx, y + dy))
        .find(|&(tx, ty)| probe.accepts(grid.get(tx, ty)))
}

/// Writes `leave_behind` at `from`, then `arrive` at `to`.
#[inline(always)]
pub fn move_and_become(
    grid: &mut Grid,
    from: Cell,
    to: Cell,
    leave_behind: EntityKind,
    arrive: EntityKind,
) {
    grid.put(from.0, from.1, leave_behind);
    grid.put(to.0, to.1, arrive);
}

/// Moves onto `to`, handing the destination's prior content back to `from`.
pub fn walk(grid: &mut Grid, from: Cell, to: Cell, arrive: EntityKind) {
    let displaced = grid.get(to.0, to.1);
    move_and_become(grid, from, to, displaced, arrive);
}
