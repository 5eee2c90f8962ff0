use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cell::{CellState, Coord};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::trace::{SearchTrace, Transition};

/// Receives control from the engine after every visible change.
///
/// The grid is handed over read-only, so a sink can observe or render it
/// but cannot alter the search. `should_cancel` is polled once per loop
/// iteration; returning `true` stops the search with [`SearchOutcome::Cancelled`].
pub trait ProgressSink {
    fn on_progress(&mut self, grid: &Grid);

    fn should_cancel(&mut self) -> bool {
        false
    }
}

impl<F: FnMut(&Grid)> ProgressSink for F {
    fn on_progress(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// How a search run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// `path` holds the intermediate cells from start to end, endpoints excluded
    Found { path: Vec<Coord> },
    /// Frontier exhausted
    NoPath,
    /// Stopped by the host before completion
    Cancelled,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&[Coord]> {
        match self {
            SearchOutcome::Found { path } => Some(path),
            _ => None,
        }
    }
}

/// Result of a single call to [`AStar::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A cell was taken off the frontier and its neighbors relaxed
    Expanded(Coord),
    /// A cell was marked as part of the final path
    Marked(Coord),
    Finished(SearchOutcome),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub expanded: usize,
    pub enqueued: usize,
    pub path_len: usize,
}

/// Frontier entry, ordered by priority then insertion sequence
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: u32,
    sequence: u64,
    coord: Coord,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .priority
            .cmp(&self.priority)
            // Equal priorities pop in insertion order
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Expanding,
    Tracing { cursor: Coord, path: Vec<Coord> },
    Done(SearchOutcome),
}

/// Incremental A* search over a [`Grid`] with uniform unit edge costs.
///
/// Each call to [`step`](AStar::step) performs one visible change so a
/// frame-driven host can interleave rendering. [`run`](AStar::run) drives the
/// search to completion through a [`ProgressSink`].
#[derive(Debug, Clone)]
pub struct AStar {
    start: Coord,
    end: Coord,
    heuristic: Heuristic,
    size: usize,
    frontier: BinaryHeap<FrontierEntry>,
    best_cost: Vec<Option<u32>>,
    predecessor: Vec<Option<Coord>>,
    in_frontier: Vec<bool>,
    sequence: u64,
    /// Expanded cell waiting to be tagged Visited once the host has seen the expansion
    pending_visit: Option<Coord>,
    phase: Phase,
    steps: u64,
    stats: SearchStats,
    transitions: Vec<Transition>,
}

impl AStar {
    /// Validate endpoints and adjacency, then seed the frontier with `start`.
    /// Distinct endpoints must be the grid's marked start and end; a single
    /// endpoint (`start == end`) only has to be a non-barrier cell.
    /// Nothing on the grid is modified here.
    pub fn new(
        grid: &Grid,
        start: Option<Coord>,
        end: Option<Coord>,
        heuristic: Heuristic,
    ) -> Result<Self> {
        let start = start.ok_or(Error::MissingStart)?;
        let end = end.ok_or(Error::MissingEnd)?;
        for coord in [start, end] {
            if !grid.contains(coord) {
                return Err(Error::OutOfBounds {
                    coord,
                    size: grid.size(),
                });
            }
        }
        if start == end {
            if grid.cell(start).is_some_and(|cell| cell.is_barrier()) {
                return Err(Error::UnmarkedEndpoint { coord: start });
            }
        } else {
            // Only the grid's own start/end may be searched between
            if grid.start() != Some(start) {
                return Err(Error::UnmarkedEndpoint { coord: start });
            }
            if grid.end() != Some(end) {
                return Err(Error::UnmarkedEndpoint { coord: end });
            }
        }
        grid.ensure_adjacency()?;

        let cell_count = grid.size() * grid.size();
        let mut search = AStar {
            start,
            end,
            heuristic,
            size: grid.size(),
            frontier: BinaryHeap::new(),
            best_cost: vec![None; cell_count],
            predecessor: vec![None; cell_count],
            in_frontier: vec![false; cell_count],
            sequence: 0,
            pending_visit: None,
            phase: Phase::Expanding,
            steps: 0,
            stats: SearchStats::default(),
            transitions: Vec::new(),
        };

        if start == end {
            debug!(row = start.row, column = start.column, "start equals end");
            search.phase = Phase::Done(SearchOutcome::Found { path: Vec::new() });
            return Ok(search);
        }

        let start_id = search.index(start);
        search.best_cost[start_id] = Some(0);
        search.in_frontier[start_id] = true;
        search.frontier.push(FrontierEntry {
            priority: heuristic.estimate(start, end),
            sequence: 0,
            coord: start,
        });
        search.stats.enqueued = 1;

        debug!(
            start = ?start,
            end = ?end,
            heuristic = ?heuristic,
            size = grid.size(),
            "search initialised"
        );
        Ok(search)
    }

    fn index(&self, coord: Coord) -> usize {
        coord.column + coord.row * self.size
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        if coord.row < self.size && coord.column < self.size {
            Some(self.index(coord))
        } else {
            None
        }
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn end(&self) -> Coord {
        self.end
    }

    /// Best known cost from start, `None` meaning unreached
    pub fn best_cost(&self, coord: Coord) -> Option<u32> {
        self.slot(coord).and_then(|id| self.best_cost[id])
    }

    pub fn predecessor(&self, coord: Coord) -> Option<Coord> {
        self.slot(coord).and_then(|id| self.predecessor[id])
    }

    /// Whether `coord` has a pending frontier entry
    pub fn is_frontier_resident(&self, coord: Coord) -> bool {
        self.slot(coord).is_some_and(|id| self.in_frontier[id])
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Every cell-state change made by this search, in order
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn trace(&self) -> SearchTrace {
        SearchTrace::new(self.transitions.clone())
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match &self.phase {
            Phase::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    fn retag(&mut self, grid: &mut Grid, coord: Coord, state: CellState) {
        let from = grid.set_state(coord, state);
        if from != state {
            self.transitions.push(Transition {
                step: self.steps,
                coord,
                from,
                to: state,
            });
        }
    }

    fn flush_pending_visit(&mut self, grid: &mut Grid) {
        if let Some(coord) = self.pending_visit.take() {
            self.retag(grid, coord, CellState::Visited);
        }
    }

    fn finish(&mut self, grid: &mut Grid, outcome: SearchOutcome) -> SearchOutcome {
        self.flush_pending_visit(grid);
        debug!(
            found = outcome.found(),
            expanded = self.stats.expanded,
            enqueued = self.stats.enqueued,
            path_len = self.stats.path_len,
            "search finished"
        );
        self.phase = Phase::Done(outcome.clone());
        outcome
    }

    /// Perform one unit of work
    pub fn step(&mut self, grid: &mut Grid) -> Step {
        let phase = std::mem::replace(&mut self.phase, Phase::Expanding);
        match phase {
            Phase::Done(outcome) => {
                self.phase = Phase::Done(outcome.clone());
                Step::Finished(outcome)
            }
            Phase::Tracing { cursor, path } => {
                self.steps += 1;
                self.trace_step(grid, cursor, path)
            }
            Phase::Expanding => {
                self.steps += 1;
                self.flush_pending_visit(grid);
                self.expand(grid)
            }
        }
    }

    fn expand(&mut self, grid: &mut Grid) -> Step {
        let Some(entry) = self.frontier.pop() else {
            return Step::Finished(self.finish(grid, SearchOutcome::NoPath));
        };
        let current = entry.coord;
        let current_id = self.index(current);
        self.in_frontier[current_id] = false;

        if current == self.end {
            trace!(row = current.row, column = current.column, "reached end");
            return self.trace_step(grid, current, Vec::new());
        }

        let current_cost = self.best_cost[current_id].unwrap_or(0);
        let tentative = current_cost + 1;
        let neighbors = grid.neighbors(current).to_vec();
        for neighbor in neighbors {
            let id = self.index(neighbor);
            let improves = match self.best_cost[id] {
                Some(best) => tentative < best,
                None => true,
            };
            if !improves {
                continue;
            }

            self.predecessor[id] = Some(current);
            self.best_cost[id] = Some(tentative);
            if !self.in_frontier[id] {
                self.sequence += 1;
                self.frontier.push(FrontierEntry {
                    priority: tentative.saturating_add(self.heuristic.estimate(neighbor, self.end)),
                    sequence: self.sequence,
                    coord: neighbor,
                });
                self.in_frontier[id] = true;
                self.stats.enqueued += 1;
                if neighbor != self.end {
                    self.retag(grid, neighbor, CellState::Frontier);
                }
            }
        }

        self.stats.expanded += 1;
        trace!(
            row = current.row,
            column = current.column,
            cost = current_cost,
            priority = entry.priority,
            frontier = self.frontier.len(),
            "expanded"
        );

        if current != self.start {
            self.pending_visit = Some(current);
        }
        self.phase = Phase::Expanding;
        Step::Expanded(current)
    }

    /// Walk one predecessor link back from `cursor`, marking it as path
    fn trace_step(&mut self, grid: &mut Grid, cursor: Coord, mut path: Vec<Coord>) -> Step {
        self.flush_pending_visit(grid);
        match self.predecessor(cursor) {
            Some(previous) if previous != self.start => {
                self.retag(grid, previous, CellState::Path);
                path.push(previous);
                self.stats.path_len = path.len();
                self.phase = Phase::Tracing {
                    cursor: previous,
                    path,
                };
                Step::Marked(previous)
            }
            _ => {
                let (start, end) = (self.start, self.end);
                self.retag(grid, start, CellState::Start);
                self.retag(grid, end, CellState::End);
                path.reverse();
                self.stats.path_len = path.len();
                Step::Finished(self.finish(grid, SearchOutcome::Found { path }))
            }
        }
    }

    /// Stop the search. Cells already marked stay marked.
    pub fn cancel(&mut self, grid: &mut Grid) -> SearchOutcome {
        if let Some(outcome) = self.outcome() {
            return outcome.clone();
        }
        debug!(expanded = self.stats.expanded, "search cancelled");
        self.finish(grid, SearchOutcome::Cancelled)
    }

    /// Drive the search to completion, reporting progress to `sink`
    pub fn run<S: ProgressSink + ?Sized>(&mut self, grid: &mut Grid, sink: &mut S) -> SearchOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                return outcome.clone();
            }
            if sink.should_cancel() {
                return self.cancel(grid);
            }
            match self.step(grid) {
                Step::Expanded(_) | Step::Marked(_) => sink.on_progress(grid),
                Step::Finished(outcome) => return outcome,
            }
        }
    }
}

/// Find a shortest path from `start` to `end`, marking the grid as the search proceeds.
///
/// `grid.compute_adjacency()` must have run since the last barrier change.
/// Missing endpoints, out-of-range endpoints or stale adjacency are rejected
/// before anything on the grid is touched.
pub fn find_path<S: ProgressSink + ?Sized>(
    grid: &mut Grid,
    start: Option<Coord>,
    end: Option<Coord>,
    heuristic: Heuristic,
    sink: &mut S,
) -> Result<SearchOutcome> {
    let mut search = AStar::new(grid, start, end, heuristic)?;
    Ok(search.run(grid, sink))
}
