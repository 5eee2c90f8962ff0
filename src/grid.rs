use crate::cell::{Cell, CellState, Coord};
use crate::error::{Error, Result};

/// Square grid of cells stored row-major
/// Start/end positions are tracked here so at most one of each exists
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cell_width: usize,
    cells: Vec<Cell>,
    start: Option<Coord>,
    end: Option<Coord>,
    /// Revision number - incremented whenever a cell's barrier status changes
    revision: u64,
    /// Revision at which neighbor lists were last computed
    adjacency_revision: Option<u64>,
}

impl Grid {
    /// Create a `size` x `size` grid of empty cells spread over `total_width` pixels
    pub fn new(size: usize, total_width: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for column in 0..size {
                cells.push(Cell::new(row, column));
            }
        }

        Grid {
            size,
            cell_width: if size == 0 { 0 } else { total_width / size },
            cells,
            start: None,
            end: None,
            revision: 0,
            adjacency_revision: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Pixel width of a single cell
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.column < self.size
    }

    /// Convert a coordinate to its index in the backing storage
    pub fn get_id(&self, coord: Coord) -> usize {
        coord.column + coord.row * self.size
    }

    /// Convert a storage index back to a coordinate
    pub fn get_coords(&self, id: usize) -> Coord {
        Coord::new(id / self.size, id % self.size)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        if !self.contains(coord) {
            return None;
        }
        self.cells.get(self.get_id(coord))
    }

    pub fn state(&self, coord: Coord) -> Option<CellState> {
        self.cell(coord).map(|cell| cell.state)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Neighbor list of a cell as of the last `compute_adjacency`
    pub fn neighbors(&self, coord: Coord) -> &[Coord] {
        self.cell(coord).map(|cell| cell.neighbors.as_slice()).unwrap_or(&[])
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| cell.state == state).count()
    }

    fn check_bounds(&self, coord: Coord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { coord, size: self.size })
        }
    }

    /// Overwrite a cell's state and return the previous one. Callers check bounds.
    pub(crate) fn set_state(&mut self, coord: Coord, state: CellState) -> CellState {
        let id = self.get_id(coord);
        let old_state = self.cells[id].state;
        if old_state != state {
            self.cells[id].state = state;
            if (old_state == CellState::Barrier) != (state == CellState::Barrier) {
                self.revision += 1;
            }
        }
        old_state
    }

    /// Make `coord` the start cell. A previous start cell becomes empty.
    pub fn mark_start(&mut self, coord: Coord) -> Result<()> {
        self.check_bounds(coord)?;
        if let Some(previous) = self.start.take() {
            self.set_state(previous, CellState::Empty);
        }
        if self.end == Some(coord) {
            self.end = None;
        }
        self.set_state(coord, CellState::Start);
        self.start = Some(coord);
        Ok(())
    }

    /// Make `coord` the end cell. A previous end cell becomes empty.
    pub fn mark_end(&mut self, coord: Coord) -> Result<()> {
        self.check_bounds(coord)?;
        if let Some(previous) = self.end.take() {
            self.set_state(previous, CellState::Empty);
        }
        if self.start == Some(coord) {
            self.start = None;
        }
        self.set_state(coord, CellState::End);
        self.end = Some(coord);
        Ok(())
    }

    /// Turn a cell into a barrier. Start and end cells are left alone and `false` is returned.
    pub fn mark_barrier(&mut self, coord: Coord) -> Result<bool> {
        self.check_bounds(coord)?;
        if self.start == Some(coord) || self.end == Some(coord) {
            return Ok(false);
        }
        self.set_state(coord, CellState::Barrier);
        Ok(true)
    }

    /// Reset a cell to empty, forgetting it as start or end
    pub fn mark_empty(&mut self, coord: Coord) -> Result<()> {
        self.check_bounds(coord)?;
        if self.start == Some(coord) {
            self.start = None;
        }
        if self.end == Some(coord) {
            self.end = None;
        }
        self.set_state(coord, CellState::Empty);
        Ok(())
    }

    /// Primary-button editing: place start, then end, then barriers
    pub fn paint(&mut self, coord: Coord) -> Result<CellState> {
        self.check_bounds(coord)?;
        if self.start.is_none() && self.end != Some(coord) {
            self.mark_start(coord)?;
        } else if self.end.is_none() && self.start != Some(coord) {
            self.mark_end(coord)?;
        } else {
            self.mark_barrier(coord)?;
        }
        Ok(self.cells[self.get_id(coord)].state)
    }

    /// Secondary-button editing
    pub fn erase(&mut self, coord: Coord) -> Result<()> {
        self.mark_empty(coord)
    }

    /// Reset frontier, visited and path cells so a search can run again
    pub fn clear_search_marks(&mut self) {
        for cell in &mut self.cells {
            if cell.state.is_search_mark() {
                cell.state = CellState::Empty;
            }
        }
    }

    /// Rebuild every cell's neighbor list: up, down, right, left, skipping barriers
    pub fn compute_adjacency(&mut self) {
        let adjacency: Vec<Vec<Coord>> = self
            .cells
            .iter()
            .map(|cell| self.open_neighbors(cell.coord()))
            .collect();

        for (cell, neighbors) in self.cells.iter_mut().zip(adjacency) {
            cell.neighbors = neighbors;
        }
        self.adjacency_revision = Some(self.revision);
    }

    fn open_neighbors(&self, coord: Coord) -> Vec<Coord> {
        let Coord { row, column } = coord;
        let mut candidates = Vec::with_capacity(4);
        if row > 0 {
            candidates.push(Coord::new(row - 1, column));
        }
        if row + 1 < self.size {
            candidates.push(Coord::new(row + 1, column));
        }
        if column + 1 < self.size {
            candidates.push(Coord::new(row, column + 1));
        }
        if column > 0 {
            candidates.push(Coord::new(row, column - 1));
        }

        candidates
            .into_iter()
            .filter(|&c| self.cells[self.get_id(c)].is_traversable())
            .collect()
    }

    /// Whether neighbor lists reflect the current barrier layout
    pub fn adjacency_is_current(&self) -> bool {
        self.adjacency_revision == Some(self.revision)
    }

    pub(crate) fn ensure_adjacency(&self) -> Result<()> {
        if self.adjacency_is_current() {
            Ok(())
        } else {
            Err(Error::StaleAdjacency {
                grid_revision: self.revision,
                adjacency_revision: self.adjacency_revision,
            })
        }
    }

    /// Render the grid as one line of state symbols per row
    pub fn to_ascii(&self) -> String {
        let mut result = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size.max(1)) {
            for cell in row {
                result.push(cell.state.symbol());
            }
            result.push('\n');
        }
        result
    }

    /// Parse the text form produced by `to_ascii`. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str, total_width: usize) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let size = lines.len();
        if size == 0 {
            return Err(Error::GridText("no grid rows found".to_string()));
        }

        let mut grid = Grid::new(size, total_width);
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(Error::GridText(format!(
                    "row {} has {} cells, expected {}",
                    row, width, size
                )));
            }

            for (column, symbol) in line.chars().enumerate() {
                let coord = Coord::new(row, column);
                let state = CellState::from_symbol(symbol).ok_or_else(|| {
                    Error::GridText(format!("unknown symbol '{}' at ({}, {})", symbol, row, column))
                })?;
                match state {
                    CellState::Start if grid.start.is_some() => {
                        return Err(Error::GridText("more than one start cell".to_string()));
                    }
                    CellState::End if grid.end.is_some() => {
                        return Err(Error::GridText("more than one end cell".to_string()));
                    }
                    CellState::Start => grid.mark_start(coord)?,
                    CellState::End => grid.mark_end(coord)?,
                    other => {
                        grid.set_state(coord, other);
                    }
                }
            }
        }

        Ok(grid)
    }

    /// Mirror left-right
    pub fn flipped_horizontal(&self) -> Grid {
        let last = self.size.saturating_sub(1);
        self.remapped(|c| Coord::new(c.row, last - c.column))
    }

    /// Mirror top-bottom
    pub fn flipped_vertical(&self) -> Grid {
        let last = self.size.saturating_sub(1);
        self.remapped(|c| Coord::new(last - c.row, c.column))
    }

    fn remapped(&self, map: impl Fn(Coord) -> Coord) -> Grid {
        let mut grid = Grid::new(self.size, self.cell_width * self.size);
        for cell in &self.cells {
            let target = map(cell.coord());
            grid.set_state(target, cell.state);
        }
        grid.start = self.start.map(&map);
        grid.end = self.end.map(&map);
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_assigns_coordinates_and_width() {
        let grid = Grid::new(4, 600);
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.cell_width(), 150);
        for (id, cell) in grid.cells().enumerate() {
            assert_eq!(cell.coord(), grid.get_coords(id));
            assert_eq!(cell.state, CellState::Empty);
        }
    }

    #[test]
    fn neighbors_follow_up_down_right_left_order() {
        let mut grid = Grid::new(3, 30);
        grid.compute_adjacency();
        assert_eq!(
            grid.neighbors(Coord::new(1, 1)),
            &[
                Coord::new(0, 1),
                Coord::new(2, 1),
                Coord::new(1, 2),
                Coord::new(1, 0)
            ]
        );
        assert_eq!(
            grid.neighbors(Coord::new(0, 0)),
            &[Coord::new(1, 0), Coord::new(0, 1)]
        );
    }

    #[test]
    fn barriers_are_excluded_from_neighbors() {
        let mut grid = Grid::new(3, 30);
        grid.mark_barrier(Coord::new(0, 1)).unwrap();
        grid.compute_adjacency();
        assert_eq!(grid.neighbors(Coord::new(0, 0)), &[Coord::new(1, 0)]);
    }

    #[test]
    fn barrier_changes_invalidate_adjacency() {
        let mut grid = Grid::new(3, 30);
        grid.compute_adjacency();
        assert!(grid.adjacency_is_current());

        grid.mark_barrier(Coord::new(1, 1)).unwrap();
        assert!(!grid.adjacency_is_current());

        grid.compute_adjacency();
        grid.mark_empty(Coord::new(1, 1)).unwrap();
        assert!(!grid.adjacency_is_current());
    }

    #[test]
    fn search_marks_do_not_invalidate_adjacency() {
        let mut grid = Grid::new(3, 30);
        grid.compute_adjacency();
        grid.set_state(Coord::new(1, 1), CellState::Visited);
        assert!(grid.adjacency_is_current());
    }

    #[test]
    fn only_one_start_and_end() {
        let mut grid = Grid::new(3, 30);
        grid.mark_start(Coord::new(0, 0)).unwrap();
        grid.mark_start(Coord::new(1, 1)).unwrap();
        grid.mark_end(Coord::new(2, 2)).unwrap();
        grid.mark_end(Coord::new(1, 1)).unwrap();

        assert_eq!(grid.count(CellState::Start), 0);
        assert_eq!(grid.count(CellState::End), 1);
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn paint_places_start_then_end_then_barriers() {
        let mut grid = Grid::new(3, 30);
        assert_eq!(grid.paint(Coord::new(0, 0)).unwrap(), CellState::Start);
        // Repainting the start does not turn it into the end or a barrier
        assert_eq!(grid.paint(Coord::new(0, 0)).unwrap(), CellState::Start);
        assert_eq!(grid.paint(Coord::new(2, 2)).unwrap(), CellState::End);
        assert_eq!(grid.paint(Coord::new(1, 1)).unwrap(), CellState::Barrier);
        assert_eq!(grid.paint(Coord::new(2, 2)).unwrap(), CellState::End);
    }

    #[test]
    fn erase_unsets_endpoints() {
        let mut grid = Grid::new(3, 30);
        grid.paint(Coord::new(0, 0)).unwrap();
        grid.paint(Coord::new(2, 2)).unwrap();
        grid.erase(Coord::new(0, 0)).unwrap();
        assert_eq!(grid.start(), None);

        // Next paint re-places the start
        assert_eq!(grid.paint(Coord::new(1, 0)).unwrap(), CellState::Start);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut grid = Grid::new(3, 30);
        assert!(matches!(
            grid.mark_barrier(Coord::new(3, 0)),
            Err(Error::OutOfBounds { size: 3, .. })
        ));
        assert!(grid.cell(Coord::new(0, 3)).is_none());
    }

    #[test]
    fn ascii_form_parses_back() {
        let text = "S.#\n.#.\n..E\n";
        let grid = Grid::from_ascii(text, 300).unwrap();
        assert_eq!(grid.start(), Some(Coord::new(0, 0)));
        assert_eq!(grid.end(), Some(Coord::new(2, 2)));
        assert_eq!(grid.cell_width(), 100);
        assert_eq!(grid.to_ascii(), text);
    }

    #[test]
    fn ascii_form_rejects_ragged_rows() {
        assert!(matches!(
            Grid::from_ascii("..\n...\n", 30),
            Err(Error::GridText(_))
        ));
        assert!(matches!(Grid::from_ascii("S S\n", 30), Err(Error::GridText(_))));
    }

    #[test]
    fn flips_mirror_states_and_endpoints() {
        let grid = Grid::from_ascii("S#.\n...\n..E", 30).unwrap();
        let h = grid.flipped_horizontal();
        assert_eq!(h.to_ascii(), ".#S\n...\nE..\n");
        assert_eq!(h.start(), Some(Coord::new(0, 2)));

        let v = grid.flipped_vertical();
        assert_eq!(v.to_ascii(), "..E\n...\nS#.\n");
        assert_eq!(v.end(), Some(Coord::new(0, 2)));
    }
}
