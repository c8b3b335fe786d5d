use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    StepLeft,
    StepDown,
    StepRight,
    SwapActive,
    Reset,
    GrowBoard,
    ShrinkBoard,
    AutoPlay,
    AutoStep,
    TogglePerf,
    ToggleConsole,
    Quit,
}

const ACTION_COUNT: usize = 12;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::StepLeft,
        InputAction::StepDown,
        InputAction::StepRight,
        InputAction::SwapActive,
        InputAction::Reset,
        InputAction::GrowBoard,
        InputAction::ShrinkBoard,
        InputAction::AutoPlay,
        InputAction::AutoStep,
        InputAction::TogglePerf,
        InputAction::ToggleConsole,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::StepLeft => 0,
            InputAction::StepDown => 1,
            InputAction::StepRight => 2,
            InputAction::SwapActive => 3,
            InputAction::Reset => 4,
            InputAction::GrowBoard => 5,
            InputAction::ShrinkBoard => 6,
            InputAction::AutoPlay => 7,
            InputAction::AutoStep => 8,
            InputAction::TogglePerf => 9,
            InputAction::ToggleConsole => 10,
            InputAction::Quit => 11,
        }
    }
}

pub(crate) fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(InputAction::StepLeft),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(InputAction::StepDown),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(InputAction::StepRight),
        KeyCode::Tab => Some(InputAction::SwapActive),
        KeyCode::KeyR => Some(InputAction::Reset),
        KeyCode::Equal | KeyCode::NumpadAdd => Some(InputAction::GrowBoard),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(InputAction::ShrinkBoard),
        KeyCode::Space => Some(InputAction::AutoPlay),
        KeyCode::KeyN => Some(InputAction::AutoStep),
        KeyCode::F3 => Some(InputAction::TogglePerf),
        KeyCode::Backquote => Some(InputAction::ToggleConsole),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

/// Key-down counts per action since the last snapshot. Repeated presses
/// inside one tick are kept, not merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionSet {
    counts: [u8; ACTION_COUNT],
}

impl ActionSet {
    pub(crate) fn insert(&mut self, action: InputAction) {
        let count = &mut self.counts[action.index()];
        *count = count.saturating_add(1);
    }

    pub(crate) fn contains(&self, action: InputAction) -> bool {
        self.count(action) > 0
    }

    pub(crate) fn count(&self, action: InputAction) -> u8 {
        self.counts[action.index()]
    }
}

/// Turns raw key up/down state into one press per physical key-down, so a
/// held key never repeats an action.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionEdges {
    down: [bool; ACTION_COUNT],
    pressed: ActionSet,
}

impl ActionEdges {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let slot = &mut self.down[action.index()];
        if is_down && !*slot {
            self.pressed.insert(action);
        }
        *slot = is_down;
    }

    pub(crate) fn take_pressed(&mut self, action: InputAction) -> bool {
        let was_pressed = self.pressed.contains(action);
        self.pressed.counts[action.index()] = 0;
        was_pressed
    }

    pub(crate) fn drain(&mut self) -> ActionSet {
        std::mem::take(&mut self.pressed)
    }

    pub(crate) fn release_all(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}
