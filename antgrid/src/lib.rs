//! Grid-resident ant foraging on a torus.
//!
//! Every cell holds one [`EntityKind`]. Once per tick each cell runs its
//! kind's rule in row-major order, writing straight back into the grid.

pub mod behavior;
mod error;
pub mod generator;
mod grid;
mod kind;
pub mod rng;
pub mod search;
mod sim;

pub use behavior::Outcome;
pub use error::{GridError, SnapshotError};
pub use generator::{ClassicGenerator, FixedWorld, Layout, WorldGenerator};
pub use grid::{Grid, SerializedGrid, floor_mod};
pub use kind::{EntityKind, Probe};
pub use rng::SimRng;
pub use search::{Cell, DIRECTIONS};
pub use sim::{Census, Simulation, TickSummary, tick};

// Rule probabilities, as `numerator / denominator` draws
pub const BIAS_CHANCE: u32 = 8;
pub const BIAS_SCALE: u32 = 10;
pub const MARKER_DECAY_DENOMINATOR: u32 = 100;
pub const COOLDOWN_DENOMINATOR: u32 = 20;
pub const TRAIL_DEGRADE_DENOMINATOR: u32 = 15;

// World size the generator's densities are tuned for
pub const REFERENCE_WIDTH: i32 = 160;
pub const REFERENCE_HEIGHT: i32 = 90;
