pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod logging;
pub mod search;
pub mod trace;

pub use cell::{Cell, CellState, Coord};
pub use error::{Error, Result};
pub use grid::Grid;
pub use heuristic::Heuristic;
pub use search::{find_path, AStar, ProgressSink, SearchOutcome, SearchStats, Step};
pub use trace::{SearchTrace, Transition};
