use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cell::{CellState, Coord};
use crate::error::Result;

/// One cell-state change made by the search engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Engine step during which the change happened (1-based)
    pub step: u64,
    pub coord: Coord,
    pub from: CellState,
    pub to: CellState,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[step {:5}] ({:3},{:3}) {:?} -> {:?}",
            self.step, self.coord.row, self.coord.column, self.from, self.to
        )
    }
}

/// Ordered record of a search run's cell-state changes.
/// Two runs over identical grids produce equal traces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTrace {
    transitions: Vec<Transition>,
}

impl SearchTrace {
    pub fn new(transitions: Vec<Transition>) -> Self {
        SearchTrace { transitions }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Number of transitions into each state
    pub fn counts(&self) -> BTreeMap<CellState, usize> {
        let mut counts = BTreeMap::new();
        for transition in &self.transitions {
            *counts.entry(transition.to).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let steps = self.transitions.last().map(|t| t.step).unwrap_or(0);
        let counts = self.counts();
        let count = |state: CellState| counts.get(&state).copied().unwrap_or(0);

        format!(
            "Steps: {}\n\
             Transitions: {}\n\
             Frontier: {}, Visited: {}, Path: {}",
            steps,
            self.transitions.len(),
            count(CellState::Frontier),
            count(CellState::Visited),
            count(CellState::Path)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchTrace {
        SearchTrace::new(vec![
            Transition {
                step: 1,
                coord: Coord::new(1, 0),
                from: CellState::Empty,
                to: CellState::Frontier,
            },
            Transition {
                step: 2,
                coord: Coord::new(1, 0),
                from: CellState::Frontier,
                to: CellState::Path,
            },
        ])
    }

    #[test]
    fn json_uses_snake_case_states() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"frontier\""));
        assert_eq!(SearchTrace::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn counts_are_keyed_by_target_state() {
        let counts = sample().counts();
        assert_eq!(counts.get(&CellState::Frontier), Some(&1));
        assert_eq!(counts.get(&CellState::Path), Some(&1));
        assert_eq!(counts.get(&CellState::Visited), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn summary_counts_target_states() {
        let summary = sample().summary();
        assert!(summary.contains("Steps: 2"));
        assert!(summary.contains("Frontier: 1, Visited: 0, Path: 1"));
    }
}
