use serde::{Deserialize, Serialize};

/// Row/column address of a cell. Rows grow downward, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub column: usize,
}

impl Coord {
    pub fn new(row: usize, column: usize) -> Self {
        Coord { row, column }
    }

    /// Manhattan distance between two coordinates
    pub fn manhattan(&self, other: &Coord) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// What a cell currently represents, either to the user or to the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
    /// Enqueued but not yet expanded
    Frontier,
    /// Expanded
    Visited,
    Path,
}

impl CellState {
    /// Single character used by the text form of a grid
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Barrier => '#',
            CellState::Frontier => 'o',
            CellState::Visited => 'x',
            CellState::Path => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(CellState::Empty),
            'S' => Some(CellState::Start),
            'E' => Some(CellState::End),
            '#' => Some(CellState::Barrier),
            'o' => Some(CellState::Frontier),
            'x' => Some(CellState::Visited),
            '*' => Some(CellState::Path),
            _ => None,
        }
    }

    /// States written by the search engine rather than by the user
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Frontier | CellState::Visited | CellState::Path)
    }
}

/// A single grid unit
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub state: CellState,
    /// Traversable orthogonal neighbors, filled by `Grid::compute_adjacency`
    pub neighbors: Vec<Coord>,
}

impl Cell {
    pub fn new(row: usize, column: usize) -> Self {
        Cell {
            row,
            column,
            state: CellState::Empty,
            neighbors: Vec::new(),
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.column)
    }

    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }

    pub fn is_traversable(&self) -> bool {
        !self.is_barrier()
    }
}
