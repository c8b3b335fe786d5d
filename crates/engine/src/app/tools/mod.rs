mod console;
mod console_commands;
mod overlay;
mod text;

pub(crate) use console::{draw_console, ConsoleState};
pub(crate) use console_commands::{ConsoleCommandProcessor, DebugCommand};
pub(crate) use overlay::{draw_hud, draw_perf, hud_panel_height, OverlayData};
pub(crate) use text::{draw_text_centered, glyph_height};
