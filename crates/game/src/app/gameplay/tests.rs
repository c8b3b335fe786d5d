use engine::{
    InputAction, InputSnapshot, Scene, SceneConsoleCommand, SceneConsoleResult, SceneWorld,
    TokenSlot,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::controller::Game;
use super::grid::{Cell, Grid};
use super::robot::RobotSlot;
use super::*;

fn fixture_scene(step_ticks: u32) -> (ChocolateScene, SceneWorld) {
    let grid = Grid::from_rows(vec![
        vec![0, 0, 0],
        vec![5, 1, 2],
        vec![3, 9, 4],
        vec![6, 7, 8],
        vec![1, 1, 1],
    ])
    .expect("grid");
    let game = Game::with_grid(grid, StdRng::seed_from_u64(1));
    let mut scene = ChocolateScene::new(game, step_ticks);
    let mut world = SceneWorld::default();
    scene.load(&mut world);
    (scene, world)
}

fn press(scene: &mut ChocolateScene, world: &mut SceneWorld, actions: &[InputAction]) {
    let input = actions
        .iter()
        .fold(InputSnapshot::empty(), |input, action| {
            input.with_action_pressed(*action)
        });
    scene.update(1.0 / 60.0, &input, world);
}

fn idle_tick(scene: &mut ChocolateScene, world: &mut SceneWorld) {
    press(scene, world, &[]);
}

fn console(
    scene: &mut ChocolateScene,
    world: &mut SceneWorld,
    name: &str,
    args: &[&str],
) -> SceneConsoleResult {
    scene.execute_console_command(
        SceneConsoleCommand::new(name, args.iter().map(|arg| arg.to_string()).collect()),
        world,
    )
}

fn success_text(result: SceneConsoleResult) -> String {
    match result {
        SceneConsoleResult::Success(text) => text,
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn robot_one_moving_down_collects_the_cell_below() {
    let (mut scene, mut world) = fixture_scene(1);

    press(&mut scene, &mut world, &[InputAction::StepDown]);

    let game = scene.game();
    let robot = game.robot(RobotSlot::One);
    assert_eq!((robot.row, robot.col, robot.score), (1, 0, 5));
    assert_eq!(
        game.path(RobotSlot::One).cells(),
        &[Cell::new(0, 0), Cell::new(1, 0)]
    );
    assert_eq!(game.active(), RobotSlot::Two);
    assert!(world
        .hud_lines()
        .iter()
        .any(|line| line == "Turn: Robot 2"));
}

#[test]
fn load_publishes_board_tokens_and_trails() {
    let (_scene, world) = fixture_scene(1);

    let board = world.board().expect("board");
    assert_eq!((board.columns(), board.rows()), (3, 5));
    assert_eq!(board.value_at(1, 0), Some(5));
    assert_eq!(board.value_at(0, 2), Some(0));

    let tokens = world.tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].slot, TokenSlot::First);
    assert!(tokens[0].active);
    assert_eq!((tokens[1].row, tokens[1].col), (0, 2));
    assert!(!tokens[1].active);
    assert_eq!(world.trails().len(), 2);
}

#[test]
fn trails_follow_paths_after_moves() {
    let (mut scene, mut world) = fixture_scene(1);
    press(&mut scene, &mut world, &[InputAction::StepDown]);
    press(&mut scene, &mut world, &[InputAction::StepLeft]);

    assert_eq!(world.trails().len(), 4);
    let second = world.tokens()[1];
    assert_eq!((second.row, second.col), (1, 1));
}

#[test]
fn rejected_manual_move_still_hands_over_the_turn() {
    let (mut scene, mut world) = fixture_scene(1);

    press(&mut scene, &mut world, &[InputAction::StepLeft]);

    let robot = scene.game().robot(RobotSlot::One);
    assert_eq!((robot.row, robot.col, robot.score), (0, 0, 0));
    assert_eq!(scene.game().active(), RobotSlot::Two);
}

#[test]
fn swap_key_only_changes_turn() {
    let (mut scene, mut world) = fixture_scene(1);
    press(&mut scene, &mut world, &[InputAction::SwapActive]);
    assert_eq!(scene.game().active(), RobotSlot::Two);
    assert_eq!(scene.game().path(RobotSlot::One).cells().len(), 1);
    assert!(world.tokens()[1].active);
}

#[test]
fn reset_twice_keeps_dimensions() {
    let (mut scene, mut world) = fixture_scene(1);
    press(&mut scene, &mut world, &[InputAction::StepDown]);

    press(&mut scene, &mut world, &[InputAction::Reset]);
    let first = (scene.game().grid().row_count(), scene.game().grid().columns());
    press(&mut scene, &mut world, &[InputAction::Reset]);
    let second = (scene.game().grid().row_count(), scene.game().grid().columns());

    assert_eq!(first, (5, 3));
    assert_eq!(first, second);
    assert_eq!(scene.game().robot(RobotSlot::One).score, 0);
    assert_eq!(scene.game().active(), RobotSlot::One);
}

#[test]
fn size_keys_step_the_size_field() {
    let (mut scene, mut world) = fixture_scene(1);

    press(&mut scene, &mut world, &[InputAction::GrowBoard]);
    assert_eq!(scene.game().size().get(), 4);
    assert_eq!(scene.size_field(), "4");

    press(&mut scene, &mut world, &[InputAction::ShrinkBoard]);
    press(&mut scene, &mut world, &[InputAction::ShrinkBoard]);
    press(&mut scene, &mut world, &[InputAction::ShrinkBoard]);
    assert_eq!(scene.game().size().get(), 1);

    press(&mut scene, &mut world, &[InputAction::ShrinkBoard]);
    assert_eq!(scene.size_field(), "0");
    assert_eq!(scene.game().size().get(), 1);
    assert!(world
        .hud_lines()
        .iter()
        .any(|line| line == "Next size: '0'"));

    press(&mut scene, &mut world, &[InputAction::Reset]);
    assert_eq!(scene.game().size().get(), 1);

    press(&mut scene, &mut world, &[InputAction::GrowBoard]);
    assert_eq!(scene.game().size().get(), 2);
}

#[test]
fn animated_autoplay_runs_to_completion() {
    let (mut scene, mut world) = fixture_scene(2);

    press(&mut scene, &mut world, &[InputAction::AutoPlay]);
    assert!(scene.is_autoplaying());
    assert_eq!(scene.game().robot(RobotSlot::One).row, 1);
    assert_eq!(scene.game().robot(RobotSlot::Two).row, 0);

    let mut ticks = 1;
    while scene.is_autoplaying() && ticks < 100 {
        idle_tick(&mut scene, &mut world);
        ticks += 1;
    }

    assert!(scene.game().is_complete());
    assert_eq!(ticks, 11);
    assert_eq!(scene.game().active(), RobotSlot::One);
    assert!(world.hud_lines().iter().any(|line| line == "Complete"));
}

#[test]
fn manual_input_is_ignored_while_autoplay_animates() {
    let (mut scene, mut world) = fixture_scene(10);
    press(&mut scene, &mut world, &[InputAction::AutoPlay]);
    let before = (*scene.game().robot(RobotSlot::One), *scene.game().robot(RobotSlot::Two));

    press(
        &mut scene,
        &mut world,
        &[InputAction::StepDown, InputAction::SwapActive],
    );

    let after = (*scene.game().robot(RobotSlot::One), *scene.game().robot(RobotSlot::Two));
    assert_eq!(before, after);
    assert_eq!(scene.game().active(), RobotSlot::One);
}

#[test]
fn autoplay_key_toggles_and_reset_cancels() {
    let (mut scene, mut world) = fixture_scene(5);
    press(&mut scene, &mut world, &[InputAction::AutoPlay]);
    press(&mut scene, &mut world, &[InputAction::AutoPlay]);
    assert!(!scene.is_autoplaying());
    assert!(!scene.game().is_complete());

    press(&mut scene, &mut world, &[InputAction::AutoPlay]);
    press(&mut scene, &mut world, &[InputAction::Reset]);
    assert!(!scene.is_autoplaying());
    assert_eq!(scene.game().robot(RobotSlot::One).row, 0);
}

#[test]
fn autostep_key_alternates_robots() {
    let (mut scene, mut world) = fixture_scene(1);

    press(&mut scene, &mut world, &[InputAction::AutoStep]);
    assert_eq!(scene.game().robot(RobotSlot::One).row, 1);
    assert_eq!(scene.game().robot(RobotSlot::Two).row, 0);

    press(&mut scene, &mut world, &[InputAction::AutoStep]);
    assert_eq!(scene.game().robot(RobotSlot::Two).row, 1);
    assert!(!scene.is_autoplaying());
}

#[test]
fn autoplay_restarts_with_robot_one_after_manual_play() {
    let (mut scene, mut world) = fixture_scene(1);

    press(&mut scene, &mut world, &[InputAction::AutoStep]);
    press(&mut scene, &mut world, &[InputAction::StepDown]);
    assert_eq!(scene.game().robot(RobotSlot::One).row, 2);
    assert_eq!(scene.game().robot(RobotSlot::Two).row, 0);

    assert_eq!(
        success_text(console(&mut scene, &mut world, "step", &[])),
        "Robot 1 moved right to (3, 1) +7"
    );
    assert_eq!(scene.game().robot(RobotSlot::Two).row, 0);
}

#[test]
fn repeated_presses_in_one_tick_each_move() {
    let (mut scene, mut world) = fixture_scene(1);

    press(
        &mut scene,
        &mut world,
        &[InputAction::StepDown, InputAction::StepDown],
    );

    let game = scene.game();
    let first = game.robot(RobotSlot::One);
    let second = game.robot(RobotSlot::Two);
    assert_eq!((first.row, first.col, first.score), (1, 0, 5));
    assert_eq!((second.row, second.col, second.score), (1, 2, 2));
    assert_eq!(game.active(), RobotSlot::One);
}

#[test]
fn console_size_validates_before_rebuilding() {
    let (mut scene, mut world) = fixture_scene(1);

    let result = console(&mut scene, &mut world, "size", &["abc"]);
    assert!(matches!(result, SceneConsoleResult::Error(_)));
    assert_eq!(scene.game().size().get(), 3);
    assert_eq!(scene.game().grid().value_at(Cell::new(1, 0)), Some(5));

    let text = success_text(console(&mut scene, &mut world, "size", &["6"]));
    assert_eq!(text, "board rebuilt at size 6");
    assert_eq!(world.board().map(|board| board.columns()), Some(6));
}

#[test]
fn console_move_reports_rejections_without_error() {
    let (mut scene, mut world) = fixture_scene(1);

    let text = success_text(console(&mut scene, &mut world, "move", &["left"]));
    assert_eq!(text, "Robot 1 cannot move left: column_out_of_bounds");
    assert_eq!(scene.game().active(), RobotSlot::Two);

    let text = success_text(console(&mut scene, &mut world, "move", &["down"]));
    assert_eq!(text, "Robot 2 moved down to (1, 2) +2");
}

#[test]
fn console_auto_finishes_the_game() {
    let (mut scene, mut world) = fixture_scene(1);

    let text = success_text(console(&mut scene, &mut world, "auto", &[]));

    assert!(scene.game().is_complete());
    assert!(text.starts_with("autoplay done after 6 steps"));
    assert_eq!(
        success_text(console(&mut scene, &mut world, "step", &[])),
        "both robots are done"
    );
}

#[test]
fn console_swap_is_refused_during_autoplay() {
    let (mut scene, mut world) = fixture_scene(10);
    press(&mut scene, &mut world, &[InputAction::AutoPlay]);

    assert!(matches!(
        console(&mut scene, &mut world, "swap", &[]),
        SceneConsoleResult::Error(_)
    ));
    assert_eq!(
        success_text(console(&mut scene, &mut world, "stop", &[])),
        "autoplay stopped"
    );
    assert_eq!(
        success_text(console(&mut scene, &mut world, "stop", &[])),
        "autoplay is not running"
    );
}

#[test]
fn console_seed_makes_boards_reproducible() {
    let (mut first, mut first_world) = fixture_scene(1);
    let (mut second, mut second_world) = fixture_scene(1);

    console(&mut first, &mut first_world, "seed", &["77"]);
    console(&mut second, &mut second_world, "seed", &["77"]);

    assert_eq!(first.game().grid(), second.game().grid());
    assert_eq!(first_world.board(), second_world.board());
}

#[test]
fn console_dump_prints_snapshot_json() {
    let (mut scene, mut world) = fixture_scene(1);
    press(&mut scene, &mut world, &[InputAction::StepDown]);

    let text = success_text(console(&mut scene, &mut world, "dump", &[]));
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");

    assert_eq!(value["size"], 3);
    assert_eq!(value["active"], "two");
    assert_eq!(value["robots"][0]["score"], 5);
}

#[test]
fn console_bad_arguments_are_errors() {
    let (mut scene, mut world) = fixture_scene(1);
    assert!(matches!(
        console(&mut scene, &mut world, "move", &["up"]),
        SceneConsoleResult::Error(_)
    ));
    assert!(matches!(
        console(&mut scene, &mut world, "reset", &["now"]),
        SceneConsoleResult::Error(_)
    ));
}

#[test]
fn title_shows_scores_and_turn() {
    let (mut scene, mut world) = fixture_scene(1);
    press(&mut scene, &mut world, &[InputAction::StepDown]);

    assert_eq!(
        scene.debug_title(&world).as_deref(),
        Some("Chocobots | Size 3 | Robot 1: 5 | Robot 2: 0 | Turn Robot 2")
    );
}

#[test]
fn unload_clears_the_published_view() {
    let (mut scene, mut world) = fixture_scene(1);
    scene.unload(&mut world);
    assert!(world.board().is_none());
    assert!(world.tokens().is_empty());
    assert!(world.hud_lines().is_empty());
}

#[test]
fn seeded_scene_builder_is_deterministic() {
    let size = GridSize::new(4).expect("size");
    let first = build_scene(size, Some(5), 3);
    let second = build_scene(size, Some(5), 3);
    assert_eq!(first.game().grid(), second.game().grid());
    assert_eq!(first.size_field(), "4");
}
