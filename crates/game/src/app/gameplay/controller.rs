use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use super::grid::{Cell, Grid, GridSize, GridSizeError};
use super::robot::{Direction, Path, Robot, RobotSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveRejection {
    ColumnOutOfBounds,
    RowOutOfBounds,
}

impl MoveRejection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            MoveRejection::ColumnOutOfBounds => "column_out_of_bounds",
            MoveRejection::RowOutOfBounds => "row_out_of_bounds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    Moved {
        slot: RobotSlot,
        direction: Direction,
        to: Cell,
        collected: u32,
    },
    Rejected {
        slot: RobotSlot,
        direction: Direction,
        reason: MoveRejection,
    },
}

impl MoveOutcome {
    pub(crate) fn slot(&self) -> RobotSlot {
        match self {
            MoveOutcome::Moved { slot, .. } | MoveOutcome::Rejected { slot, .. } => *slot,
        }
    }

    pub(crate) fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Destination of a one-row step from `from`, checked against the bounds
/// every move must respect: column in `[0, size-1]`, row in `[0, size+1]`.
pub(crate) fn resolve_step(
    grid: &Grid,
    from: Cell,
    direction: Direction,
) -> Result<Cell, MoveRejection> {
    let target = direction
        .step_from(from)
        .ok_or(MoveRejection::ColumnOutOfBounds)?;
    if target.col >= grid.columns() {
        return Err(MoveRejection::ColumnOutOfBounds);
    }
    if target.row >= grid.row_count() {
        return Err(MoveRejection::RowOutOfBounds);
    }
    Ok(target)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RobotState {
    robot: Robot,
    path: Path,
}

impl RobotState {
    fn spawn(slot: RobotSlot, size: GridSize) -> Self {
        let cell = slot.spawn_cell(size);
        Self {
            robot: Robot::spawn_at(cell),
            path: Path::starting_at(cell),
        }
    }
}

fn spawn_robots(size: GridSize) -> [RobotState; 2] {
    RobotSlot::ALL.map(|slot| RobotState::spawn(slot, size))
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RobotSnapshot {
    pub(crate) slot: RobotSlot,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) score: u32,
    pub(crate) path: Path,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GameSnapshot {
    pub(crate) size: GridSize,
    pub(crate) grid: Vec<Vec<u32>>,
    pub(crate) robots: Vec<RobotSnapshot>,
    pub(crate) active: RobotSlot,
    pub(crate) complete: bool,
}

#[derive(Debug)]
pub(crate) struct Game {
    grid: Grid,
    robots: [RobotState; 2],
    active: RobotSlot,
    rng: StdRng,
}

impl Game {
    pub(crate) fn new(size: GridSize, mut rng: StdRng) -> Self {
        let grid = Grid::generate(size, &mut rng);
        info!(size = size.get(), "grid_generated");
        Self::with_grid(grid, rng)
    }

    pub(crate) fn with_grid(grid: Grid, rng: StdRng) -> Self {
        let robots = spawn_robots(grid.size());
        Self {
            grid,
            robots,
            active: RobotSlot::One,
            rng,
        }
    }

    /// Rebuilds the board using `requested` as the size parameter. A missing
    /// or invalid parameter falls back to the current size.
    pub(crate) fn reset(&mut self, requested: Option<&str>) -> GridSize {
        let size = match requested.map(GridSize::parse) {
            Some(Ok(size)) => size,
            Some(Err(error)) => {
                debug!(error = %error, fallback = self.size().get(), "reset_size_fallback");
                self.size()
            }
            None => self.size(),
        };
        self.regenerate(size);
        size
    }

    /// Rebuilds the board at `raw` only when it parses to a valid size.
    pub(crate) fn change_size(&mut self, raw: &str) -> Result<GridSize, GridSizeError> {
        let size = GridSize::parse(raw)?;
        self.regenerate(size);
        Ok(size)
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        let size = self.size();
        self.regenerate(size);
    }

    fn regenerate(&mut self, size: GridSize) {
        self.grid = Grid::generate(size, &mut self.rng);
        self.robots = spawn_robots(size);
        self.active = RobotSlot::One;
        info!(size = size.get(), "grid_generated");
    }

    pub(crate) fn move_robot(&mut self, slot: RobotSlot, direction: Direction) -> MoveOutcome {
        let from = self.robot(slot).cell();
        let target = match resolve_step(&self.grid, from, direction) {
            Ok(target) => target,
            Err(reason) => {
                debug!(
                    robot = slot.label(),
                    direction = direction.name(),
                    row = from.row,
                    col = from.col,
                    reason = reason.as_str(),
                    "move_rejected"
                );
                return MoveOutcome::Rejected {
                    slot,
                    direction,
                    reason,
                };
            }
        };

        let collected = self.grid.value_at(target).unwrap_or(0);
        let state = &mut self.robots[slot.index()];
        state.robot.row = target.row;
        state.robot.col = target.col;
        state.robot.score = state.robot.score.saturating_add(collected);
        state.path.push(target);
        debug!(
            robot = slot.label(),
            direction = direction.name(),
            row = target.row,
            col = target.col,
            collected,
            score = state.robot.score,
            "robot_moved"
        );

        MoveOutcome::Moved {
            slot,
            direction,
            to: target,
            collected,
        }
    }

    /// Moves the robot whose turn it is, then hands the turn over even when
    /// the move was rejected.
    pub(crate) fn manual_move(&mut self, direction: Direction) -> MoveOutcome {
        let slot = self.active;
        let outcome = self.move_robot(slot, direction);
        self.active = slot.other();
        outcome
    }

    pub(crate) fn swap_turn(&mut self) {
        self.active = self.active.other();
        debug!(active = self.active.label(), "turn_swapped");
    }

    pub(crate) fn active(&self) -> RobotSlot {
        self.active
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub(crate) fn robot(&self, slot: RobotSlot) -> &Robot {
        &self.robots[slot.index()].robot
    }

    pub(crate) fn path(&self, slot: RobotSlot) -> &Path {
        &self.robots[slot.index()].path
    }

    pub(crate) fn has_finished(&self, slot: RobotSlot) -> bool {
        self.robot(slot).row >= self.size().get()
    }

    pub(crate) fn is_complete(&self) -> bool {
        RobotSlot::ALL.iter().all(|slot| self.has_finished(*slot))
    }

    pub(crate) fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.size(),
            grid: self.grid.rows().to_vec(),
            robots: RobotSlot::ALL
                .iter()
                .map(|slot| {
                    let robot = self.robot(*slot);
                    RobotSnapshot {
                        slot: *slot,
                        row: robot.row,
                        col: robot.col,
                        score: robot.score,
                        path: self.path(*slot).clone(),
                    }
                })
                .collect(),
            active: self.active,
            complete: self.is_complete(),
        }
    }
}
