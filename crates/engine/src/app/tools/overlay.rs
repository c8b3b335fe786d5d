use crate::app::rendering::{Canvas, PixelRect};
use crate::app::LoopMetricsSnapshot;

use super::text::{draw_text, glyph_advance, line_advance, text_width};

pub(crate) const OVERLAY_TEXT_SCALE: i32 = 2;
const PANEL_PADDING: i32 = 4 * OVERLAY_TEXT_SCALE;
const PANEL_MARGIN: i32 = 6;
const TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const PERF_SECTION_LABEL: &str = "Perf";

#[derive(Debug, Clone, Copy)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
}

/// Height of the HUD panel for `line_count` lines; the board is laid out
/// below it.
pub(crate) fn hud_panel_height(line_count: usize) -> i32 {
    if line_count == 0 {
        return 0;
    }
    line_count as i32 * line_advance(OVERLAY_TEXT_SCALE) + PANEL_PADDING * 2 + PANEL_MARGIN
}

/// Scene-provided status lines, top-left. The first line is the heading.
pub(crate) fn draw_hud(canvas: &mut Canvas<'_>, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    draw_panel(canvas, PANEL_MARGIN, PANEL_MARGIN, lines, |index| {
        if index == 0 {
            TEXT_DIM_COLOR
        } else {
            TEXT_PRIMARY_COLOR
        }
    });
}

/// Loop timing panel, top-right.
pub(crate) fn draw_perf(canvas: &mut Canvas<'_>, data: &OverlayData) {
    let lines = build_perf_lines(data);
    let width = panel_width(&lines);
    let left = canvas.width() as i32 - width - PANEL_MARGIN;
    draw_panel(canvas, left, PANEL_MARGIN, &lines, |index| {
        if index == 0 {
            TEXT_DIM_COLOR
        } else {
            TEXT_PRIMARY_COLOR
        }
    });
}

fn draw_panel(
    canvas: &mut Canvas<'_>,
    left: i32,
    top: i32,
    lines: &[String],
    color_for_line: impl Fn(usize) -> [u8; 4],
) {
    if canvas.width() == 0 || canvas.height() == 0 {
        return;
    }
    let panel = PixelRect::new(
        left,
        top,
        panel_width(lines),
        lines.len() as i32 * line_advance(OVERLAY_TEXT_SCALE) + PANEL_PADDING * 2,
    );
    canvas.fill_rect(panel, PANEL_BG_COLOR);
    canvas.outline_rect(panel, 1, PANEL_BORDER_COLOR);

    let mut y = top + PANEL_PADDING;
    for (index, line) in lines.iter().enumerate() {
        draw_text(
            canvas,
            left + PANEL_PADDING,
            y,
            line,
            color_for_line(index),
            OVERLAY_TEXT_SCALE,
        );
        y += line_advance(OVERLAY_TEXT_SCALE);
    }
}

fn panel_width(lines: &[String]) -> i32 {
    let longest = lines
        .iter()
        .map(|line| text_width(line, OVERLAY_TEXT_SCALE))
        .max()
        .unwrap_or(0);
    longest.max(glyph_advance(OVERLAY_TEXT_SCALE)) + PANEL_PADDING * 2
}

fn build_perf_lines(data: &OverlayData) -> Vec<String> {
    vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
    ]
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = cap.map_or_else(|| "inf".to_string(), |value| value.to_string());
    format!("[{current_fps:.0} / {cap_text}] dbg+{slow_frame_delay_ms}ms")
}
