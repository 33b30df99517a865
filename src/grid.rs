// vim: set ai et ts=4 sw=4 sts=4:
use std::fmt;
use std::convert::{From, TryFrom};

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum CellState {
    Unknown,
    Blocked,
    Filled,
}
impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match *self {
            CellState::Unknown => "Unknown",
            CellState::Blocked => "Blocked",
            CellState::Filled  => "Filled",
        })
    }
}
impl TryFrom<&str> for CellState {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Unknown" => Ok(CellState::Unknown),
            "Blocked" => Ok(CellState::Blocked),
            "Filled"  => Ok(CellState::Filled),
            _         => Err("Not a valid CellState value")
        }
    }
}
impl From<bool> for CellState {
    fn from(filled: bool) -> Self {
        match filled {
            true  => CellState::Filled,
            false => CellState::Blocked,
        }
    }
}
impl CellState {
    pub fn fmt_visual(&self) -> &str {
        match *self {
            CellState::Blocked => " ",
            CellState::Filled  => "\u{25A0}",
            CellState::Unknown => ".",
        }
    }
}

// ------------------------------------------------

#[derive(Clone)]
pub struct Grid {
    cells: Vec<Vec<CellState>>,
}
impl Grid {
    pub fn new(width: usize, height: usize)
        -> Self
    {
        Grid {
            cells: (0..height).map(|_| vec![CellState::Unknown; width])
                              .collect(),
        }
    }

    pub fn width(&self) -> usize { self.cells[0].len() }
    pub fn height(&self) -> usize { self.cells.len() }

    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[row][col]
    }
    pub fn set(&mut self, row: usize, col: usize, state: CellState) {
        self.cells[row][col] = state;
    }
    pub fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = CellState::Unknown;
            }
        }
    }

    /// States of one row, in reading order.
    pub fn row_line(&self, row: usize) -> impl Iterator<Item=CellState> + '_ {
        self.cells[row].iter().copied()
    }
    /// States of one column, top to bottom. Columns aren't internally
    /// contiguous, so this walks the rows.
    pub fn col_line(&self, col: usize) -> impl Iterator<Item=CellState> + '_ {
        self.cells.iter().map(move |row| row[col])
    }

    pub fn snapshot(&self) -> Vec<Vec<CellState>> {
        self.cells.clone()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid(w={}, h={})", self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_starts_unknown() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(grid.get(row, col), CellState::Unknown);
            }
        }
    }

    #[test]
    fn set_and_clear() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 0, CellState::Filled);
        grid.set(0, 1, CellState::Blocked);
        assert_eq!(grid.get(1, 0), CellState::Filled);
        grid.clear();
        assert_eq!(grid.get(1, 0), CellState::Unknown);
        assert_eq!(grid.get(0, 1), CellState::Unknown);
    }

    #[test]
    fn col_line_walks_rows() {
        let mut grid = Grid::new(2, 3);
        grid.set(0, 1, CellState::Filled);
        grid.set(2, 1, CellState::Blocked);
        let col: Vec<_> = grid.col_line(1).collect();
        assert_eq!(col, vec![CellState::Filled, CellState::Unknown, CellState::Blocked]);
    }

    #[test]
    fn state_string_round_trip() {
        use std::convert::TryFrom;
        for state in [CellState::Unknown, CellState::Blocked, CellState::Filled].iter() {
            assert_eq!(CellState::try_from(state.to_string().as_str()), Ok(*state));
        }
        assert!(CellState::try_from("Maybe").is_err());
    }
}
