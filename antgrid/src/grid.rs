use bincode::{decode_from_slice, encode_to_vec};
use bincode_derive::{Decode, Encode};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{GridError, SnapshotError};
use crate::kind::EntityKind;

/// Floored modulo: the result always lies in `0..d` for `d > 0`,
/// including for negative `n`.
#[inline(always)]
pub fn floor_mod(n: i32, d: i32) -> i32 {
    n.rem_euclid(d)
}

/// Upper bound on `width * height`, so a flat index always fits an `i32`.
pub const MAX_CELLS: usize = i32::MAX as usize;

/// A wrapped-around 2D field of entity kinds. Every read and write goes
/// through [`floor_mod`], so any integer coordinate is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<EntityKind>,
}

impl Grid {
    /// Creates a grid filled with grass.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        Self::filled(width, height, EntityKind::Grass)
    }

    pub fn filled(width: i32, height: i32, kind: EntityKind) -> Result<Self, GridError> {
        let len = Self::cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![kind; len],
        })
    }

    /// Number of cells in a `width` x `height` grid, if that is a valid size.
    pub fn cell_count(width: i32, height: i32) -> Result<usize, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        match (width as usize).checked_mul(height as usize) {
            Some(len) if len <= MAX_CELLS => Ok(len),
            _ => Err(GridError::TooLarge {
                width,
                height,
                max: MAX_CELLS,
            }),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    fn index_of(&self, x: i32, y: i32) -> usize {
        let x = floor_mod(x, self.width);
        let y = floor_mod(y, self.height);
        y as usize * self.width as usize + x as usize
    }

    #[inline(always)]
    pub fn get(&self, x: i32, y: i32) -> EntityKind {
        self.cells[self.index_of(x, y)]
    }

    #[inline(always)]
    pub fn put(&mut self, x: i32, y: i32, kind: EntityKind) {
        let idx = self.index_of(x, y);
        self.cells[idx] = kind;
    }

    pub fn fill(&mut self, kind: EntityKind) {
        self.cells.fill(kind);
    }

    /// Normalizes a coordinate pair onto the torus.
    pub fn wrap(&self, x: i32, y: i32) -> (i32, i32) {
        (floor_mod(x, self.width), floor_mod(y, self.height))
    }

    /// Row-major view of the cells, `y` outer and `x` inner.
    pub fn cells(&self) -> &[EntityKind] {
        &self.cells
    }

    /// Yields `(x, y, kind)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, EntityKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, kind)| (i as i32 % width, i as i32 / width, *kind))
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells.iter().filter(|k| **k == kind).count()
    }

    /// Save the grid as a bincode snapshot.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let serialized = SerializedGrid::from(self);
        let data = encode_to_vec(&serialized, bincode::config::standard())?;
        fs::write(path, data)?;
        info!("Saved {}x{} snapshot to '{}'", self.width, self.height, path.display());
        Ok(())
    }

    /// Load a grid from a bincode snapshot.
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Grid, SnapshotError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let (serialized, _len): (SerializedGrid, _) =
            decode_from_slice(&data, bincode::config::standard())?;
        let grid = Grid::try_from(serialized)?;
        info!("Loaded {}x{} snapshot from '{}'", grid.width, grid.height, path.display());
        Ok(grid)
    }
}

/// On-disk form of a [`Grid`].
#[derive(Clone, Encode, Decode)]
pub struct SerializedGrid {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<EntityKind>,
}

impl From<&Grid> for SerializedGrid {
    fn from(grid: &Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            cells: grid.cells.clone(),
        }
    }
}

impl TryFrom<SerializedGrid> for Grid {
    type Error = SnapshotError;

    fn try_from(sgrid: SerializedGrid) -> Result<Self, Self::Error> {
        let SerializedGrid {
            width,
            height,
            cells,
        } = sgrid;
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height }.into());
        }
        // Check the header against the payload before trusting it.
        if (width as usize).checked_mul(height as usize) != Some(cells.len()) {
            return Err(SnapshotError::CellCountMismatch {
                width,
                height,
                cells: cells.len(),
            });
        }
        Self::cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}
