use std::collections::VecDeque;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::app::rendering::{Canvas, PixelRect};

use super::text::{draw_text, line_advance};

const CONSOLE_TEXT_SCALE: i32 = 2;
const CONSOLE_PADDING: i32 = 6 * CONSOLE_TEXT_SCALE;
const CONSOLE_BG_COLOR: [u8; 4] = [16, 16, 18, 235];
const CONSOLE_TEXT_COLOR: [u8; 4] = [210, 230, 210, 255];
const CONSOLE_PROMPT_PREFIX: &str = "> ";

pub(crate) const MAX_HISTORY_LINES: usize = 64;
pub(crate) const MAX_OUTPUT_LINES: usize = 256;
pub(crate) const MAX_PENDING_LINES: usize = 64;
pub(crate) const MAX_CURRENT_LINE_CHARS: usize = 256;

/// Line editor state for the in-window console. Submitted lines queue up in
/// `pending_lines` until the loop drains and executes them.
#[derive(Debug, Default)]
pub(crate) struct ConsoleState {
    is_open: bool,
    current_line: String,
    history: VecDeque<String>,
    history_cursor: Option<usize>,
    history_draft: Option<String>,
    output_lines: VecDeque<String>,
    pending_lines: VecDeque<String>,
}

impl ConsoleState {
    pub(crate) fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        self.reset_line();
    }

    pub(crate) fn close(&mut self) {
        self.is_open = false;
        self.reset_line();
    }

    /// Feeds one keyboard event while open. The toggle key itself never
    /// produces text.
    pub(crate) fn handle_key_event(&mut self, key_event: &KeyEvent) {
        if !self.is_open || key_event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return;
        };
        if code == KeyCode::Backquote {
            return;
        }
        if self.handle_key_code(code) {
            return;
        }
        if let Some(text) = key_event.text.as_ref() {
            self.append_text(text);
        }
    }

    pub(crate) fn current_line(&self) -> &str {
        &self.current_line
    }

    pub(crate) fn output_lines(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.output_lines.iter().map(String::as_str)
    }

    pub(crate) fn push_output(&mut self, line: impl Into<String>) {
        push_bounded(&mut self.output_lines, line.into(), MAX_OUTPUT_LINES);
    }

    pub(crate) fn clear_output(&mut self) {
        self.output_lines.clear();
    }

    pub(crate) fn drain_pending_lines(&mut self) -> Vec<String> {
        self.pending_lines.drain(..).collect()
    }

    /// Returns true when `key_code` is an editing key and was consumed.
    fn handle_key_code(&mut self, key_code: KeyCode) -> bool {
        match key_code {
            KeyCode::Backspace => {
                self.current_line.pop();
            }
            KeyCode::Enter | KeyCode::NumpadEnter => self.submit_current_line(),
            KeyCode::Escape => self.close(),
            KeyCode::ArrowUp => self.history_up(),
            KeyCode::ArrowDown => self.history_down(),
            _ => return false,
        }
        true
    }

    fn append_text(&mut self, text: &str) {
        let mut len = self.current_line.chars().count();
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            if len >= MAX_CURRENT_LINE_CHARS {
                break;
            }
            self.current_line.push(ch);
            len += 1;
        }
    }

    fn reset_line(&mut self) {
        self.current_line.clear();
        self.history_cursor = None;
        self.history_draft = None;
    }

    fn submit_current_line(&mut self) {
        let line = std::mem::take(&mut self.current_line);
        self.push_output(format!("{CONSOLE_PROMPT_PREFIX}{line}"));
        if !line.trim().is_empty() {
            push_bounded(&mut self.history, line.clone(), MAX_HISTORY_LINES);
            push_bounded(&mut self.pending_lines, line, MAX_PENDING_LINES);
        }
        self.reset_line();
    }

    fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_cursor {
            Some(index) => index.saturating_sub(1),
            None => {
                self.history_draft = Some(self.current_line.clone());
                self.history.len() - 1
            }
        };
        self.history_cursor = Some(index);
        self.current_line = self.history[index].clone();
    }

    fn history_down(&mut self) {
        let Some(index) = self.history_cursor else {
            return;
        };
        if let Some(next) = self.history.get(index + 1) {
            self.current_line = next.clone();
            self.history_cursor = Some(index + 1);
            return;
        }
        self.history_cursor = None;
        self.current_line = self.history_draft.take().unwrap_or_default();
    }
}

#[cfg(test)]
impl ConsoleState {
    pub(crate) fn type_and_submit(&mut self, line: &str) {
        self.append_text(line);
        self.submit_current_line();
    }
}

fn push_bounded(queue: &mut VecDeque<String>, value: String, max_len: usize) {
    while queue.len() >= max_len {
        queue.pop_front();
    }
    queue.push_back(value);
}

/// Bottom-anchored console panel: newest output directly above the prompt.
pub(crate) fn draw_console(canvas: &mut Canvas<'_>, state: &ConsoleState) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    if !state.is_open() || width == 0 || height == 0 {
        return;
    }

    let advance = line_advance(CONSOLE_TEXT_SCALE);
    let usable = height - 2 * CONSOLE_PADDING - advance;
    let max_output = if usable > 0 {
        (usable / advance) as usize
    } else {
        0
    };
    let visible_output = state.output_lines.len().min(max_output);
    let panel_height = (visible_output as i32 + 1) * advance + 2 * CONSOLE_PADDING;
    canvas.fill_rect(
        PixelRect::new(0, (height - panel_height).max(0), width, panel_height),
        CONSOLE_BG_COLOR,
    );

    let prompt_y = height - CONSOLE_PADDING - advance;
    let prompt = format!("{CONSOLE_PROMPT_PREFIX}{}", state.current_line());
    draw_text(
        canvas,
        CONSOLE_PADDING,
        prompt_y,
        &prompt,
        CONSOLE_TEXT_COLOR,
        CONSOLE_TEXT_SCALE,
    );

    let mut line_y = prompt_y - advance;
    for line in state.output_lines().rev().take(visible_output) {
        draw_text(
            canvas,
            CONSOLE_PADDING,
            line_y,
            line,
            CONSOLE_TEXT_COLOR,
            CONSOLE_TEXT_SCALE,
        );
        line_y -= advance;
    }
}
