use thiserror::Error;

/// Read-only picture of a rectangular board of counters, stored row-major.
/// Row 0 is drawn at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    columns: u32,
    rows: u32,
    cells: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardViewError {
    #[error("board must have at least one row and one column")]
    Empty,
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

impl BoardView {
    pub fn new(columns: u32, rows: u32, cells: Vec<u32>) -> Result<Self, BoardViewError> {
        if columns == 0 || rows == 0 {
            return Err(BoardViewError::Empty);
        }
        let expected = columns as usize * rows as usize;
        let actual = cells.len();
        if expected != actual {
            return Err(BoardViewError::CellCountMismatch { expected, actual });
        }
        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, BoardViewError> {
        let columns = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let cells: Vec<u32> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::new(columns as u32, rows.len() as u32, cells)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn index_of(&self, row: u32, col: u32) -> Option<usize> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    pub fn value_at(&self, row: u32, col: u32) -> Option<u32> {
        self.index_of(row, col)
            .and_then(|index| self.cells.get(index).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSlot {
    First,
    Second,
}

/// A player token sitting on a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMarker {
    pub slot: TokenSlot,
    pub row: u32,
    pub col: u32,
    pub active: bool,
}

/// A cell a token has visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailMark {
    pub slot: TokenSlot,
    pub row: u32,
    pub col: u32,
}
