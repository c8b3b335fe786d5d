use super::board::{BoardView, TokenMarker, TrailMark};
use super::input::{ActionSet, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Console command a scene registers with the engine console. `arg_schema`
/// is shown in `help` and in usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleCommandDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub arg_schema: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConsoleCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl SceneConsoleCommand {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneConsoleResult {
    Unsupported,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pressed: ActionSet,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(pressed: ActionSet, window_width: u32, window_height: u32) -> Self {
        Self {
            pressed,
            window_width,
            window_height,
        }
    }

    /// True on the single tick after the action's key went down.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(action)
    }

    /// Number of key-downs for the action since the previous tick.
    pub fn press_count(&self, action: InputAction) -> u8 {
        self.pressed.count(action)
    }

    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.pressed.insert(action);
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Everything the renderer draws for a scene. Scenes publish into it; the
/// engine only reads it.
#[derive(Debug, Default)]
pub struct SceneWorld {
    board: Option<BoardView>,
    tokens: Vec<TokenMarker>,
    trails: Vec<TrailMark>,
    hud_lines: Vec<String>,
}

impl SceneWorld {
    pub fn set_board(&mut self, board: BoardView) {
        self.board = Some(board);
    }

    pub fn clear_board(&mut self) {
        self.board = None;
    }

    pub fn board(&self) -> Option<&BoardView> {
        self.board.as_ref()
    }

    pub fn set_tokens(&mut self, tokens: Vec<TokenMarker>) {
        self.tokens = tokens;
    }

    pub fn tokens(&self) -> &[TokenMarker] {
        &self.tokens
    }

    pub fn set_trails(&mut self, trails: Vec<TrailMark>) {
        self.trails = trails;
    }

    pub fn trails(&self) -> &[TrailMark] {
        &self.trails
    }

    pub fn set_hud_lines(&mut self, lines: Vec<String>) {
        self.hud_lines = lines;
    }

    pub fn hud_lines(&self) -> &[String] {
        &self.hud_lines
    }

    pub fn clear(&mut self) {
        self.board = None;
        self.tokens.clear();
        self.trails.clear();
        self.hud_lines.clear();
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
    fn console_commands(&self) -> Vec<ConsoleCommandDesc> {
        Vec::new()
    }
    fn execute_console_command(
        &mut self,
        _command: SceneConsoleCommand,
        _world: &mut SceneWorld,
    ) -> SceneConsoleResult {
        SceneConsoleResult::Unsupported
    }
}

pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.load(world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if !self.is_loaded() {
            return SceneCommand::None;
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.update(fixed_dt_seconds, input, world)
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    pub(crate) fn console_commands(&self) -> Vec<ConsoleCommandDesc> {
        self.scene.console_commands()
    }

    pub(crate) fn execute_console_command(
        &mut self,
        command: SceneConsoleCommand,
    ) -> SceneConsoleResult {
        if !self.is_loaded {
            return SceneConsoleResult::Error("scene is not loaded".to_string());
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.execute_console_command(command, world)
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        let (scene, world) = (&mut self.scene, &mut self.world);
        scene.unload(world);
        self.world.clear();
        self.is_loaded = false;
    }
}
