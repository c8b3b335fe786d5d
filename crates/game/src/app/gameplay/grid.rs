use std::fmt;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

pub(crate) const MAX_GRID_SIZE: usize = 32;
pub(crate) const CHOCOLATE_MIN: u32 = 1;
pub(crate) const CHOCOLATE_MAX: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub(crate) struct GridSize(usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum GridSizeError {
    #[error("grid size must not be empty")]
    Empty,
    #[error("grid size '{raw}' is not a number")]
    NotANumber { raw: String },
    #[error("grid size must be positive, got {value}")]
    NonPositive { value: i64 },
    #[error("grid size {requested} exceeds the maximum of {max}")]
    TooLarge { requested: usize, max: usize },
}

impl GridSize {
    pub(crate) fn new(value: usize) -> Result<Self, GridSizeError> {
        if value == 0 {
            return Err(GridSizeError::NonPositive { value: 0 });
        }
        if value > MAX_GRID_SIZE {
            return Err(GridSizeError::TooLarge {
                requested: value,
                max: MAX_GRID_SIZE,
            });
        }
        Ok(Self(value))
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, GridSizeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GridSizeError::Empty);
        }
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| GridSizeError::NotANumber {
                raw: trimmed.to_string(),
            })?;
        if value <= 0 {
            return Err(GridSizeError::NonPositive { value });
        }
        let value = usize::try_from(value).map_err(|_| GridSizeError::TooLarge {
            requested: usize::MAX,
            max: MAX_GRID_SIZE,
        })?;
        Self::new(value)
    }

    pub(crate) fn get(self) -> usize {
        self.0
    }

    /// Rows in a grid of this size: the start row, `size` playing rows and
    /// one trailing row.
    pub(crate) fn row_count(self) -> usize {
        self.0 + 2
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub(crate) struct Cell {
    pub(crate) row: usize,
    pub(crate) col: usize,
}

impl Cell {
    pub(crate) const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum GridShapeError {
    #[error("grid has no columns")]
    Empty,
    #[error("grid size is invalid: {0}")]
    Size(#[from] GridSizeError),
    #[error("expected {expected} rows for {columns} columns, got {actual}")]
    RowCount {
        columns: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("start row must be empty, found {value} at column {col}")]
    StartRowNotEmpty { col: usize, value: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Grid {
    size: GridSize,
    rows: Vec<Vec<u32>>,
}

impl Grid {
    pub(crate) fn generate<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Self {
        let columns = size.get();
        let rows = (0..size.row_count())
            .map(|row| {
                if row == 0 {
                    vec![0; columns]
                } else {
                    (0..columns)
                        .map(|_| rng.gen_range(CHOCOLATE_MIN..=CHOCOLATE_MAX))
                        .collect()
                }
            })
            .collect();
        Self { size, rows }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridShapeError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(GridShapeError::Empty);
        }
        let size = GridSize::new(columns)?;
        if rows.len() != size.row_count() {
            return Err(GridShapeError::RowCount {
                columns,
                expected: size.row_count(),
                actual: rows.len(),
            });
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != columns {
                return Err(GridShapeError::Ragged {
                    row,
                    expected: columns,
                    actual: cells.len(),
                });
            }
        }
        if let Some((col, value)) = rows[0].iter().enumerate().find(|(_, value)| **value != 0) {
            return Err(GridShapeError::StartRowNotEmpty { col, value: *value });
        }
        Ok(Self { size, rows })
    }

    pub(crate) fn size(&self) -> GridSize {
        self.size
    }

    pub(crate) fn columns(&self) -> usize {
        self.size.get()
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    pub(crate) fn value_at(&self, cell: Cell) -> Option<u32> {
        self.rows.get(cell.row)?.get(cell.col).copied()
    }
}
