use tracing::{debug, info};

use super::controller::{resolve_step, Game, MoveOutcome};
use super::grid::Grid;
use super::robot::{Direction, Robot, RobotSlot};

/// Picks the neighbouring cell one row down with the most chocolates.
/// Candidates outside the board are skipped; ties keep the earlier candidate
/// in `Direction::ALL` order.
pub(crate) fn greedy_direction(grid: &Grid, robot: &Robot) -> Option<Direction> {
    let mut best: Option<(Direction, u32)> = None;
    for direction in Direction::ALL {
        let Ok(target) = resolve_step(grid, robot.cell(), direction) else {
            continue;
        };
        let Some(value) = grid.value_at(target) else {
            continue;
        };
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((direction, value)),
        }
    }
    best.map(|(direction, _)| direction)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AutoStep {
    pub(crate) direction: Direction,
    pub(crate) outcome: MoveOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AutoPlaySummary {
    pub(crate) steps: usize,
    pub(crate) scores: [u32; 2],
}

/// Stepwise greedy autoplay. Each `step` moves one unfinished robot; within a
/// round robot 1 always moves before robot 2. The turn flag is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AutoPlay {
    next: RobotSlot,
    steps_taken: usize,
}

impl Default for AutoPlay {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoPlay {
    pub(crate) fn new() -> Self {
        Self {
            next: RobotSlot::One,
            steps_taken: 0,
        }
    }

    pub(crate) fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub(crate) fn step(&mut self, game: &mut Game) -> Option<AutoStep> {
        for _ in 0..RobotSlot::ALL.len() {
            let slot = self.next;
            self.next = slot.other();
            if game.has_finished(slot) {
                continue;
            }

            let direction = greedy_direction(game.grid(), game.robot(slot))?;
            let outcome = game.move_robot(slot, direction);
            if !outcome.is_moved() {
                return None;
            }
            self.steps_taken += 1;
            return Some(AutoStep { direction, outcome });
        }
        None
    }

    pub(crate) fn steps<'a>(
        &'a mut self,
        game: &'a mut Game,
    ) -> impl Iterator<Item = AutoStep> + 'a {
        std::iter::from_fn(move || self.step(game))
    }

    pub(crate) fn run_to_completion(&mut self, game: &mut Game) -> AutoPlaySummary {
        let steps = self.steps(game).count();
        let summary = AutoPlaySummary {
            steps,
            scores: RobotSlot::ALL.map(|slot| game.robot(slot).score),
        };
        if game.is_complete() {
            info!(
                steps = summary.steps,
                robot1_score = summary.scores[0],
                robot2_score = summary.scores[1],
                "autoplay_finished"
            );
        } else {
            debug!(steps = summary.steps, "autoplay_stalled");
        }
        summary
    }
}
