use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::board::{BoardView, TokenMarker, TokenSlot, TrailMark};
use crate::app::tools::{
    draw_console, draw_hud, draw_perf, draw_text_centered, glyph_height, hud_panel_height,
    ConsoleState, OverlayData,
};
use crate::app::SceneWorld;

use super::canvas::Canvas;
use super::layout::{BoardLayout, Viewport};

const CLEAR_COLOR: [u8; 4] = [24, 18, 16, 255];
const START_ROW_COLOR: [u8; 4] = [58, 52, 50, 255];
const CELL_LOW_COLOR: [u8; 3] = [196, 150, 108];
const CELL_HIGH_COLOR: [u8; 3] = [92, 48, 22];
const CELL_TEXT_COLOR: [u8; 4] = [250, 242, 228, 255];
const FIRST_TOKEN_COLOR: [u8; 4] = [70, 140, 230, 255];
const SECOND_TOKEN_COLOR: [u8; 4] = [226, 84, 84, 255];
const ACTIVE_OUTLINE_COLOR: [u8; 4] = [255, 226, 92, 255];
const TRAIL_ALPHA: u8 = 90;
const BOARD_MARGIN_PX: i32 = 12;
const COUNTER_VALUE_MAX: u32 = 10;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        overlay: Option<&OverlayData>,
        console: Option<&ConsoleState>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let mut canvas = Canvas::new(
            self.pixels.frame_mut(),
            self.viewport.width,
            self.viewport.height,
        );
        draw_scene(&mut canvas, world, overlay, console);
        self.pixels.render()
    }
}

/// Paints one full frame: board, trails, tokens, HUD, then the optional perf
/// panel and console on top.
pub(crate) fn draw_scene(
    canvas: &mut Canvas<'_>,
    world: &SceneWorld,
    overlay: Option<&OverlayData>,
    console: Option<&ConsoleState>,
) {
    canvas.clear(CLEAR_COLOR);

    if let Some(board) = world.board() {
        let viewport = Viewport {
            width: canvas.width(),
            height: canvas.height(),
        };
        let top_reserved = hud_panel_height(world.hud_lines().len());
        if let Some(layout) = BoardLayout::fit(
            viewport,
            board.columns(),
            board.rows(),
            BOARD_MARGIN_PX,
            top_reserved,
        ) {
            draw_board(canvas, board, &layout);
            draw_trails(canvas, world.trails(), &layout);
            draw_tokens(canvas, world.tokens(), &layout);
        }
    }

    draw_hud(canvas, world.hud_lines());
    if let Some(data) = overlay {
        draw_perf(canvas, data);
    }
    if let Some(state) = console {
        draw_console(canvas, state);
    }
}

fn draw_board(canvas: &mut Canvas<'_>, board: &BoardView, layout: &BoardLayout) {
    let text_scale = cell_text_scale(layout.cell_size());
    for row in 0..board.rows() {
        for col in 0..board.columns() {
            let Some(rect) = layout.cell_rect(row, col) else {
                continue;
            };
            if row == 0 {
                canvas.fill_rect(rect, START_ROW_COLOR);
                continue;
            }
            let value = board.value_at(row, col).unwrap_or(0);
            canvas.fill_rect(rect, cell_color(value));
            if let Some(scale) = text_scale {
                let (cx, cy) = rect.center();
                draw_text_centered(canvas, cx, cy, &value.to_string(), CELL_TEXT_COLOR, scale);
            }
        }
    }
}

fn draw_trails(canvas: &mut Canvas<'_>, trails: &[TrailMark], layout: &BoardLayout) {
    for mark in trails {
        let Some(rect) = layout.cell_rect(mark.row, mark.col) else {
            continue;
        };
        let [r, g, b, _] = token_color(mark.slot);
        canvas.fill_rect(rect, [r, g, b, TRAIL_ALPHA]);
    }
}

/// The second token is drawn first so the first stays visible when both
/// share a cell.
fn draw_tokens(canvas: &mut Canvas<'_>, tokens: &[TokenMarker], layout: &BoardLayout) {
    let mut ordered: Vec<&TokenMarker> = tokens.iter().collect();
    ordered.sort_by_key(|token| match token.slot {
        TokenSlot::Second => 0,
        TokenSlot::First => 1,
    });

    for token in ordered {
        let Some(rect) = layout.cell_rect(token.row, token.col) else {
            continue;
        };
        let (cx, cy) = rect.center();
        let radius = (layout.cell_size() / 3).max(2);
        if token.active {
            canvas.outline_rect(
                rect.inset(-2),
                (layout.cell_size() / 16).max(2),
                ACTIVE_OUTLINE_COLOR,
            );
        }
        canvas.fill_circle(cx, cy, radius, token_color(token.slot));
        let label = match token.slot {
            TokenSlot::First => "1",
            TokenSlot::Second => "2",
        };
        if let Some(scale) = cell_text_scale(radius * 2) {
            draw_text_centered(canvas, cx, cy, label, CELL_TEXT_COLOR, scale);
        }
    }
}

fn token_color(slot: TokenSlot) -> [u8; 4] {
    match slot {
        TokenSlot::First => FIRST_TOKEN_COLOR,
        TokenSlot::Second => SECOND_TOKEN_COLOR,
    }
}

/// Darker brown for larger counts.
fn cell_color(value: u32) -> [u8; 4] {
    let t = value.min(COUNTER_VALUE_MAX) as f32 / COUNTER_VALUE_MAX as f32;
    let mix = |low: u8, high: u8| (low as f32 + (high as f32 - low as f32) * t).round() as u8;
    [
        mix(CELL_LOW_COLOR[0], CELL_HIGH_COLOR[0]),
        mix(CELL_LOW_COLOR[1], CELL_HIGH_COLOR[1]),
        mix(CELL_LOW_COLOR[2], CELL_HIGH_COLOR[2]),
        255,
    ]
}

/// Largest text scale whose glyphs fit in half of `extent`, or `None` when
/// even scale 1 does not fit.
fn cell_text_scale(extent: i32) -> Option<i32> {
    let scale = (extent / 2 / glyph_height(1)).min(4);
    (scale >= 1).then_some(scale)
}
