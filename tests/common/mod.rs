#![allow(dead_code)]

use pathviz::{AStar, Coord, Grid, Heuristic, ProgressSink, SearchOutcome};

pub const WIDTH: usize = 600;

/// Parse a grid diagram and compute its adjacency so it is ready to search
pub fn ready(text: &str) -> Grid {
    let mut grid = Grid::from_ascii(text, WIDTH).expect("valid grid diagram");
    grid.compute_adjacency();
    grid
}

/// Open grid with the given endpoints, adjacency computed
pub fn open_grid(size: usize, start: Coord, end: Coord) -> Grid {
    let mut grid = Grid::new(size, WIDTH);
    grid.mark_start(start).unwrap();
    grid.mark_end(end).unwrap();
    grid.compute_adjacency();
    grid
}

/// Sink that counts progress calls, snapshots the grid and can request cancellation
#[derive(Default)]
pub struct RecordingSink {
    pub calls: usize,
    pub snapshots: Vec<String>,
    pub cancel_after: Option<usize>,
}

impl RecordingSink {
    pub fn cancelling_after(calls: usize) -> Self {
        RecordingSink {
            cancel_after: Some(calls),
            ..Default::default()
        }
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&mut self, grid: &Grid) {
        self.calls += 1;
        self.snapshots.push(grid.to_ascii());
    }

    fn should_cancel(&mut self) -> bool {
        self.cancel_after.is_some_and(|limit| self.calls >= limit)
    }
}

/// Run a search between the grid's marked endpoints
pub fn run(grid: &mut Grid, heuristic: Heuristic) -> (SearchOutcome, AStar, RecordingSink) {
    let mut search = AStar::new(grid, grid.start(), grid.end(), heuristic).expect("search preconditions");
    let mut sink = RecordingSink::default();
    let outcome = search.run(grid, &mut sink);
    (outcome, search, sink)
}

/// Mirrored variants of a grid, each with adjacency computed
pub fn flip_variants(grid: &Grid) -> Vec<(&'static str, Grid)> {
    let h = grid.flipped_horizontal();
    let v = grid.flipped_vertical();
    let hv = h.flipped_vertical();
    let mut variants = vec![
        ("original", grid.clone()),
        ("h_flip", h),
        ("v_flip", v),
        ("hv_flip", hv),
    ];
    for (_, variant) in &mut variants {
        variant.compute_adjacency();
    }
    variants
}

/// Check that `path` is a chain of orthogonal steps from `start` to `end` over open cells
pub fn assert_connected(grid: &Grid, start: Coord, end: Coord, path: &[Coord]) {
    let mut chain = Vec::with_capacity(path.len() + 2);
    chain.push(start);
    chain.extend_from_slice(path);
    chain.push(end);

    for pair in chain.windows(2) {
        assert_eq!(
            pair[0].manhattan(&pair[1]),
            1,
            "{:?} -> {:?} is not a single step",
            pair[0],
            pair[1]
        );
    }
    for coord in path {
        assert!(
            !grid.cell(*coord).unwrap().is_barrier(),
            "path crosses barrier at {:?}",
            coord
        );
    }
}
