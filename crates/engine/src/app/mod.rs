mod board;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use board::{BoardView, BoardViewError, TokenMarker, TokenSlot, TrailMark};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{Renderer, Viewport};
pub use scene::{
    ConsoleCommandDesc, InputSnapshot, Scene, SceneCommand, SceneConsoleCommand,
    SceneConsoleResult, SceneWorld,
};
