use engine::{
    BoardView, ConsoleCommandDesc, InputAction, InputSnapshot, Scene, SceneCommand,
    SceneConsoleCommand, SceneConsoleResult, SceneWorld, TokenMarker, TokenSlot, TrailMark,
};
use tracing::{debug, info, warn};

use super::autoplay::{AutoPlay, AutoPlaySummary, AutoStep};
use super::commands::{console_command_descs, GameCommand};
use super::controller::{Game, MoveOutcome};
use super::grid::{GridSize, GridSizeError};
use super::robot::{Direction, RobotSlot};

const MOVE_BINDINGS: [(InputAction, Direction); 3] = [
    (InputAction::StepLeft, Direction::Left),
    (InputAction::StepDown, Direction::Down),
    (InputAction::StepRight, Direction::Right),
];
const KEY_HINT_LINE: &str = "Arrows move  Tab swap  R reset  +/- size  Space auto  N step";

/// Binds a `Game` to the engine: keyboard and console commands in, the board,
/// robot markers, trails and HUD text out.
pub(crate) struct ChocolateScene {
    game: Game,
    /// Text the next reset reads its size from.
    size_field: String,
    autoplay: AutoPlay,
    /// Ticks left before the next animated autoplay step; `None` when idle.
    autoplay_countdown: Option<u32>,
    autoplay_step_ticks: u32,
}

impl ChocolateScene {
    pub(crate) fn new(game: Game, autoplay_step_ticks: u32) -> Self {
        Self {
            size_field: game.size().to_string(),
            game,
            autoplay: AutoPlay::new(),
            autoplay_countdown: None,
            autoplay_step_ticks: autoplay_step_ticks.max(1),
        }
    }

    pub(crate) fn game(&self) -> &Game {
        &self.game
    }

    pub(crate) fn size_field(&self) -> &str {
        &self.size_field
    }

    pub(crate) fn is_autoplaying(&self) -> bool {
        self.autoplay_countdown.is_some()
    }

    fn reset_board(&mut self) -> GridSize {
        let size = self.game.reset(Some(&self.size_field));
        self.restart_autoplay();
        size
    }

    /// Stores `raw` as the size setting; only a valid size rebuilds the board.
    fn change_size(&mut self, raw: &str) -> Result<GridSize, GridSizeError> {
        self.size_field = raw.trim().to_string();
        match self.game.change_size(raw) {
            Ok(size) => {
                self.restart_autoplay();
                Ok(size)
            }
            Err(error) => {
                debug!(raw, error = %error, "size_change_ignored");
                Err(error)
            }
        }
    }

    fn nudge_size(&mut self, delta: i64) {
        let base = GridSize::parse(&self.size_field)
            .unwrap_or_else(|_| self.game.size())
            .get() as i64;
        let _ = self.change_size(&(base + delta).to_string());
    }

    fn restart_autoplay(&mut self) {
        if self.autoplay_countdown.take().is_some() {
            info!("autoplay_cancelled");
        }
        self.autoplay = AutoPlay::new();
    }

    fn toggle_autoplay(&mut self) {
        if self.cancel_autoplay() {
            return;
        }
        if self.game.is_complete() {
            debug!("autoplay_nothing_to_do");
            return;
        }
        self.autoplay_countdown = Some(0);
        info!(step_ticks = self.autoplay_step_ticks, "autoplay_started");
    }

    fn cancel_autoplay(&mut self) -> bool {
        let was_running = self.autoplay_countdown.take().is_some();
        if was_running {
            info!(steps = self.autoplay.steps_taken(), "autoplay_cancelled");
        }
        was_running
    }

    fn step_autoplay(&mut self) -> Option<AutoStep> {
        let step = self.autoplay.step(&mut self.game);
        if step.is_none() {
            debug!("autoplay_nothing_to_do");
        }
        step
    }

    fn run_autoplay(&mut self) -> AutoPlaySummary {
        self.autoplay_countdown = None;
        self.autoplay.run_to_completion(&mut self.game)
    }

    fn advance_autoplay_animation(&mut self) {
        match self.autoplay_countdown {
            None => return,
            Some(remaining) if remaining > 0 => {
                self.autoplay_countdown = Some(remaining - 1);
                return;
            }
            Some(_) => {}
        }

        let stepped = self.step_autoplay().is_some();
        if stepped && !self.game.is_complete() {
            self.autoplay_countdown = Some(self.autoplay_step_ticks - 1);
            return;
        }
        self.autoplay_countdown = None;
        info!(
            steps = self.autoplay.steps_taken(),
            robot1_score = self.game.robot(RobotSlot::One).score,
            robot2_score = self.game.robot(RobotSlot::Two).score,
            "autoplay_finished"
        );
    }

    /// Manual play breaks the autoplay round, so the next autoplay step starts
    /// again from robot 1.
    fn manual_move(&mut self, direction: Direction) -> MoveOutcome {
        self.autoplay = AutoPlay::new();
        self.game.manual_move(direction)
    }

    fn swap_turn(&mut self) {
        self.autoplay = AutoPlay::new();
        self.game.swap_turn();
    }

    fn apply_input(&mut self, input: &InputSnapshot) {
        if input.was_pressed(InputAction::Reset) {
            self.reset_board();
        }
        for _ in 0..input.press_count(InputAction::GrowBoard) {
            self.nudge_size(1);
        }
        for _ in 0..input.press_count(InputAction::ShrinkBoard) {
            self.nudge_size(-1);
        }
        if input.was_pressed(InputAction::AutoPlay) {
            self.toggle_autoplay();
        }
        if !self.is_autoplaying() {
            for _ in 0..input.press_count(InputAction::AutoStep) {
                self.step_autoplay();
            }
        }

        if self.is_autoplaying() {
            return;
        }
        for (action, direction) in MOVE_BINDINGS {
            for _ in 0..input.press_count(action) {
                self.manual_move(direction);
            }
        }
        for _ in 0..input.press_count(InputAction::SwapActive) {
            self.swap_turn();
        }
    }

    fn publish(&self, world: &mut SceneWorld) {
        match BoardView::from_rows(self.game.grid().rows()) {
            Ok(board) => world.set_board(board),
            Err(error) => {
                warn!(error = %error, "board_publish_failed");
                world.clear_board();
            }
        }

        let active = self.game.active();
        world.set_tokens(
            RobotSlot::ALL
                .iter()
                .map(|slot| {
                    let robot = self.game.robot(*slot);
                    TokenMarker {
                        slot: token_slot(*slot),
                        row: robot.row as u32,
                        col: robot.col as u32,
                        active: *slot == active,
                    }
                })
                .collect(),
        );
        world.set_trails(
            RobotSlot::ALL
                .iter()
                .flat_map(|slot| {
                    self.game.path(*slot).cells().iter().map(|cell| TrailMark {
                        slot: token_slot(*slot),
                        row: cell.row as u32,
                        col: cell.col as u32,
                    })
                })
                .collect(),
        );
        world.set_hud_lines(self.hud_lines());
    }

    fn hud_lines(&self) -> Vec<String> {
        let active = self.game.active();
        let mut lines = vec![format!("Chocobots  size {}", self.game.size())];
        for slot in RobotSlot::ALL {
            let robot = self.game.robot(slot);
            let marker = if slot == active { ">" } else { " " };
            lines.push(format!(
                "{marker} {}: {}  (row {}, col {})",
                slot.label(),
                robot.score,
                robot.row,
                robot.col
            ));
        }
        let status = if self.game.is_complete() {
            "Complete".to_string()
        } else if self.is_autoplaying() {
            format!("Autoplay running ({} steps)", self.autoplay.steps_taken())
        } else {
            format!("Turn: {}", active.label())
        };
        lines.push(status);
        if self.size_field != self.game.size().to_string() {
            lines.push(format!("Next size: '{}'", self.size_field));
        }
        lines.push(KEY_HINT_LINE.to_string());
        lines
    }

    fn run_command(&mut self, command: GameCommand) -> SceneConsoleResult {
        match command {
            GameCommand::Size(raw) => match self.change_size(&raw) {
                Ok(size) => SceneConsoleResult::Success(format!("board rebuilt at size {size}")),
                Err(error) => SceneConsoleResult::Error(error.to_string()),
            },
            GameCommand::Reset => {
                let size = self.reset_board();
                SceneConsoleResult::Success(format!("board reset at size {size}"))
            }
            GameCommand::Swap => {
                if self.is_autoplaying() {
                    return autoplay_busy();
                }
                self.swap_turn();
                SceneConsoleResult::Success(format!("turn: {}", self.game.active().label()))
            }
            GameCommand::Move(direction) => {
                if self.is_autoplaying() {
                    return autoplay_busy();
                }
                SceneConsoleResult::Success(describe_move(&self.manual_move(direction)))
            }
            GameCommand::Auto => {
                let summary = self.run_autoplay();
                SceneConsoleResult::Success(format!(
                    "autoplay done after {} steps: robot 1 {} / robot 2 {}",
                    summary.steps, summary.scores[0], summary.scores[1]
                ))
            }
            GameCommand::Step => match self.step_autoplay() {
                Some(step) => SceneConsoleResult::Success(describe_move(&step.outcome)),
                None => SceneConsoleResult::Success("both robots are done".to_string()),
            },
            GameCommand::Stop => {
                if self.cancel_autoplay() {
                    SceneConsoleResult::Success("autoplay stopped".to_string())
                } else {
                    SceneConsoleResult::Success("autoplay is not running".to_string())
                }
            }
            GameCommand::Seed(seed) => {
                self.game.reseed(seed);
                self.restart_autoplay();
                SceneConsoleResult::Success(format!("reseeded with {seed}"))
            }
            GameCommand::Dump => match serde_json::to_string_pretty(&self.game.snapshot()) {
                Ok(json) => SceneConsoleResult::Success(json),
                Err(error) => SceneConsoleResult::Error(format!("encode snapshot: {error}")),
            },
        }
    }
}

impl Scene for ChocolateScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.publish(world);
        info!(
            size = self.game.size().get(),
            step_ticks = self.autoplay_step_ticks,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        self.apply_input(input);
        self.advance_autoplay_animation();
        self.publish(world);
        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.autoplay_countdown = None;
        world.clear();
        info!("scene_unloaded");
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let mut title = format!(
            "Chocobots | Size {} | Robot 1: {} | Robot 2: {}",
            self.game.size(),
            self.game.robot(RobotSlot::One).score,
            self.game.robot(RobotSlot::Two).score
        );
        if self.game.is_complete() {
            title.push_str(" | Complete");
        } else {
            title.push_str(&format!(" | Turn {}", self.game.active().label()));
        }
        Some(title)
    }

    fn console_commands(&self) -> Vec<ConsoleCommandDesc> {
        console_command_descs()
    }

    fn execute_console_command(
        &mut self,
        command: SceneConsoleCommand,
        world: &mut SceneWorld,
    ) -> SceneConsoleResult {
        let result = match GameCommand::parse(&command) {
            Ok(parsed) => self.run_command(parsed),
            Err(error) => SceneConsoleResult::Error(error),
        };
        self.publish(world);
        result
    }
}

fn token_slot(slot: RobotSlot) -> TokenSlot {
    match slot {
        RobotSlot::One => TokenSlot::First,
        RobotSlot::Two => TokenSlot::Second,
    }
}

fn autoplay_busy() -> SceneConsoleResult {
    SceneConsoleResult::Error("autoplay is running. use stop first".to_string())
}

fn describe_move(outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Moved {
            slot,
            direction,
            to,
            collected,
        } => format!(
            "{} moved {} to ({}, {}) +{collected}",
            slot.label(),
            direction.name(),
            to.row,
            to.col
        ),
        MoveOutcome::Rejected {
            slot,
            direction,
            reason,
        } => format!(
            "{} cannot move {}: {}",
            slot.label(),
            direction.name(),
            reason.as_str()
        ),
    }
}
