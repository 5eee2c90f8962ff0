use serde::{Deserialize, Serialize};

use crate::cell::Coord;

/// Estimate of the remaining cost between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// `|r1 - r2| + |c1 - c2|`. Admissible and consistent on a unit-cost 4-connected grid.
    #[default]
    Manhattan,
    /// `|r1 - c1| + |r2 - c2|`, pairing each cell's own axes.
    /// Kept for parity with older visualizer runs; it is not admissible, so paths may be longer than optimal.
    CrossedAxis,
}

impl Heuristic {
    pub fn estimate(self, a: Coord, b: Coord) -> u32 {
        let estimate = match self {
            Heuristic::Manhattan => a.manhattan(&b),
            Heuristic::CrossedAxis => a.row.abs_diff(a.column) + b.row.abs_diff(b.column),
        };
        // Saturate rather than wrap on grids too large for u32 costs
        u32::try_from(estimate).unwrap_or(u32::MAX)
    }
}
