pub mod app;

pub use app::{
    run_app, AppError, BoardView, BoardViewError, ConsoleCommandDesc, InputAction, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, Renderer, Scene, SceneCommand, SceneConsoleCommand,
    SceneConsoleResult, SceneWorld, TokenMarker, TokenSlot, TrailMark, Viewport,
    SLOW_FRAME_ENV_VAR,
};
