use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("grid of {width}x{height} exceeds {max} cells")]
    TooLarge { width: i32, height: i32, max: usize },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("snapshot holds {cells} cells but claims {width}x{height}")]
    CellCountMismatch {
        width: i32,
        height: i32,
        cells: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}
