use serde::Serialize;

use super::grid::{Cell, GridSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RobotSlot {
    One,
    Two,
}

impl RobotSlot {
    pub(crate) const ALL: [RobotSlot; 2] = [RobotSlot::One, RobotSlot::Two];

    pub(crate) fn other(self) -> Self {
        match self {
            RobotSlot::One => RobotSlot::Two,
            RobotSlot::Two => RobotSlot::One,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            RobotSlot::One => 0,
            RobotSlot::Two => 1,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            RobotSlot::One => "Robot 1",
            RobotSlot::Two => "Robot 2",
        }
    }

    /// Robot 1 starts in the left corner of the start row, robot 2 in the right.
    pub(crate) fn spawn_cell(self, size: GridSize) -> Cell {
        match self {
            RobotSlot::One => Cell::new(0, 0),
            RobotSlot::Two => Cell::new(0, size.get() - 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Direction {
    Left,
    Down,
    Right,
}

impl Direction {
    /// Candidate order for the greedy pick; earlier entries win ties.
    pub(crate) const ALL: [Direction; 3] = [Direction::Left, Direction::Down, Direction::Right];

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "down" | "d" => Some(Direction::Down),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        }
    }

    /// Destination of a one-row step, or `None` when the column would go negative.
    pub(crate) fn step_from(self, cell: Cell) -> Option<Cell> {
        let col = match self {
            Direction::Left => cell.col.checked_sub(1)?,
            Direction::Down => cell.col,
            Direction::Right => cell.col + 1,
        };
        Some(Cell::new(cell.row + 1, col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Robot {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) score: u32,
}

impl Robot {
    pub(crate) fn spawn_at(cell: Cell) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            score: 0,
        }
    }

    pub(crate) fn cell(&self) -> Cell {
        Cell::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub(crate) fn starting_at(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
