use thiserror::Error;

use crate::cell::Coord;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Search requested before a start cell was chosen.
    #[error("no start cell has been marked")]
    MissingStart,

    /// Search requested before an end cell was chosen.
    #[error("no end cell has been marked")]
    MissingEnd,

    #[error("cell ({}, {}) is outside a {}x{} grid", .coord.row, .coord.column, .size, .size)]
    OutOfBounds { coord: Coord, size: usize },

    /// Endpoint is not the grid's marked start/end, or is a barrier.
    #[error("cell ({}, {}) is not a marked endpoint of the grid", .coord.row, .coord.column)]
    UnmarkedEndpoint { coord: Coord },

    /// Neighbor lists were never computed, or a barrier changed since they were.
    #[error("adjacency is stale (grid revision {grid_revision}, adjacency computed at {adjacency_revision:?})")]
    StaleAdjacency {
        grid_revision: u64,
        adjacency_revision: Option<u64>,
    },

    #[error("invalid grid text: {0}")]
    GridText(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
