use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use super::input::{action_for_key, ActionEdges};
use super::metrics::MetricsAccumulator;
use super::scene::SceneRuntime;
use super::tools::{ConsoleCommandProcessor, ConsoleState, DebugCommand, OverlayData};
use super::{InputAction, InputSnapshot, Renderer, Scene, SceneCommand, SceneConsoleResult};

pub const SLOW_FRAME_ENV_VAR: &str = "CHOCOBOTS_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Chocobots".to_string(),
            window_width: 960,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let mut runtime = SceneRuntime::new(scene);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let viewport = renderer.viewport();
    let mut input_collector = InputCollector::new(viewport.width, viewport.height);
    let mut console = ConsoleState::default();
    let mut command_processor = ConsoleCommandProcessor::new();

    runtime.load();
    for desc in runtime.console_commands() {
        if let Err(error) = command_processor
            .registry_mut()
            .register_scene_command(&desc)
        {
            warn!(command = desc.name, error = %error, "console_command_rejected");
        }
    }
    info!("scene_loaded");

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;
    let mut perf_visible = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(false) => input_collector.release_all(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if is_console_toggle(&event) {
                        console.toggle_open();
                        input_collector.release_all();
                        debug!(open = console.is_open(), "console_toggled");
                    } else if console.is_open() {
                        console.handle_key_event(&event);
                    } else {
                        input_collector.handle_key(event.physical_key, event.state);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.take_pressed(InputAction::TogglePerf) {
                        perf_visible = !perf_visible;
                        info!(perf_visible, "perf_overlay_toggled");
                    }

                    for command in command_processor.process_pending_lines(&mut console) {
                        match command {
                            DebugCommand::Quit => {
                                info!(reason = "console_quit", "shutdown_requested");
                                window_target.exit();
                            }
                            DebugCommand::Scene(command) => {
                                let name = command.name.clone();
                                let result = runtime.execute_console_command(command);
                                write_scene_result(&mut console, &name, result);
                            }
                        }
                    }

                    if slow_frame_delay > Duration::ZERO {
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    accumulator = accumulator.saturating_add(clamped_frame_dt);

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        if runtime.update(fixed_dt_seconds, &input_snapshot) == SceneCommand::Quit
                        {
                            info!(reason = "scene_command", "shutdown_requested");
                            window_target.exit();
                        }
                        metrics_accumulator.record_tick();
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let overlay = perf_visible.then(|| OverlayData {
                        metrics: metrics_accumulator.latest(),
                        render_fps_cap: effective_render_cap,
                        slow_frame_delay_ms: slow_frame_delay.as_millis() as u64,
                    });
                    let console_view = console.is_open().then_some(&console);
                    if let Err(error) =
                        renderer.render_world(runtime.world(), overlay.as_ref(), console_view)
                    {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = runtime.debug_title();
                    if next_title != last_applied_title {
                        window.set_title(next_title.as_deref().unwrap_or(&config.window_title));
                        last_applied_title = next_title;
                    }

                    metrics_accumulator.record_frame(raw_frame_dt);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        debug!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                runtime.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn write_scene_result(console: &mut ConsoleState, name: &str, result: SceneConsoleResult) {
    match result {
        SceneConsoleResult::Success(text) => {
            info!(command = name, "console_command_applied");
            for line in text.lines() {
                console.push_output(line);
            }
        }
        SceneConsoleResult::Error(text) => {
            debug!(command = name, error = %text, "console_command_failed");
            console.push_output(format!("error: {text}"));
        }
        SceneConsoleResult::Unsupported => {
            console.push_output(format!("error: '{name}' is not supported by the active scene"));
        }
    }
}

fn is_console_toggle(key_event: &KeyEvent) -> bool {
    key_event.state == ElementState::Pressed
        && !key_event.repeat
        && action_for_key(key_event.physical_key) == Some(InputAction::ToggleConsole)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    edges: ActionEdges,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        let is_down = state == ElementState::Pressed;
        self.edges.set(action, is_down);
        if action == InputAction::Quit && is_down {
            self.quit_requested = true;
        }
    }

    fn take_pressed(&mut self, action: InputAction) -> bool {
        self.edges.take_pressed(action)
    }

    fn release_all(&mut self) {
        self.edges.release_all();
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot::new(self.edges.drain(), self.window_width, self.window_height)
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    cap.map_or_else(|| "off".to_string(), |value| value.to_string())
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    parse_slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config_slow_frame_ms)
}

fn parse_slow_frame_delay(
    value: Result<String, env::VarError>,
    config_slow_frame_ms: u64,
) -> Duration {
    let fallback = Duration::from_millis(config_slow_frame_ms);
    match value {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = raw.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::*;

    fn press(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_keeps_remainder() {
        let result = plan_sim_steps(Duration::from_millis(40), Duration::from_millis(16), 5);
        assert_eq!(result.ticks_to_run, 2);
        assert_eq!(result.remaining_accumulator, Duration::from_millis(8));
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let result = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);
        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn key_press_reaches_exactly_one_tick() {
        let mut input = InputCollector::new(640, 480);
        press(&mut input, KeyCode::ArrowDown);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.was_pressed(InputAction::StepDown));
        assert!(!second.was_pressed(InputAction::StepDown));
        assert_eq!(first.window_size(), (640, 480));
    }

    #[test]
    fn held_key_does_not_repeat_until_released() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Tab);
        assert!(input.snapshot_for_tick().was_pressed(InputAction::SwapActive));

        press(&mut input, KeyCode::Tab);
        assert!(!input.snapshot_for_tick().was_pressed(InputAction::SwapActive));

        release(&mut input, KeyCode::Tab);
        press(&mut input, KeyCode::Tab);
        assert!(input.snapshot_for_tick().was_pressed(InputAction::SwapActive));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyZ);
        let snapshot = input.snapshot_for_tick();
        assert!(InputAction::ALL
            .iter()
            .all(|action| !snapshot.was_pressed(*action)));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        release(&mut input, KeyCode::Escape);
        assert!(!input.quit_requested);
        press(&mut input, KeyCode::Escape);
        assert!(input.quit_requested);
    }

    #[test]
    fn perf_toggle_is_taken_by_the_loop() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::F3);
        assert!(input.take_pressed(InputAction::TogglePerf));
        assert!(!input.take_pressed(InputAction::TogglePerf));
        assert!(!input.snapshot_for_tick().was_pressed(InputAction::TogglePerf));
    }

    #[test]
    fn release_all_lets_a_key_held_across_focus_loss_press_again() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyR);
        input.snapshot_for_tick();
        input.release_all();
        press(&mut input, KeyCode::KeyR);
        assert!(input.snapshot_for_tick().was_pressed(InputAction::Reset));
    }

    #[test]
    fn scene_results_are_written_line_by_line() {
        let mut console = ConsoleState::default();
        write_scene_result(
            &mut console,
            "dump",
            SceneConsoleResult::Success("a\nb".to_string()),
        );
        write_scene_result(
            &mut console,
            "size",
            SceneConsoleResult::Error("bad size".to_string()),
        );
        write_scene_result(&mut console, "fly", SceneConsoleResult::Unsupported);

        let lines: Vec<&str> = console.output_lines().collect();
        assert_eq!(
            lines,
            vec![
                "a",
                "b",
                "error: bad size",
                "error: 'fly' is not supported by the active scene",
            ]
        );
    }

    #[test]
    fn slow_frame_env_value_overrides_config() {
        assert_eq!(
            parse_slow_frame_delay(Ok("25".to_string()), 3),
            Duration::from_millis(25)
        );
        assert_eq!(
            parse_slow_frame_delay(Ok("soon".to_string()), 3),
            Duration::from_millis(3)
        );
        assert_eq!(
            parse_slow_frame_delay(Err(env::VarError::NotPresent), 7),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn render_cap_helpers() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
        assert_eq!(target_frame_duration(None), None);
        let frame = target_frame_duration(Some(60)).expect("duration");
        assert!((frame.as_secs_f64() - 1.0 / 60.0).abs() < 0.000_001);
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(20), Some(frame)),
            Duration::ZERO
        );
        assert!(compute_cap_sleep(Duration::from_millis(5), Some(frame)) > Duration::ZERO);
        assert_eq!(format_render_cap(None), "off");
    }
}
