use crate::app::rendering::Canvas;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

type GlyphRows = [u8; GLYPH_HEIGHT as usize];

/// Horizontal distance between glyph origins at `scale`.
pub(crate) const fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

/// Vertical distance between baselines at `scale`.
pub(crate) const fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

pub(crate) const fn glyph_height(scale: i32) -> i32 {
    GLYPH_HEIGHT * scale
}

pub(crate) fn text_width(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        0
    } else {
        count * glyph_advance(scale) - scale
    }
}

/// Draws `text` with its top-left corner at `(x, y)`. Characters without a
/// glyph render as `?`.
pub(crate) fn draw_text(
    canvas: &mut Canvas<'_>,
    x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    let scale = scale.max(1);
    let mut pen_x = x;
    for ch in text.chars() {
        let rows = glyph_rows(ch).or_else(|| glyph_rows('?')).unwrap_or_default();
        draw_glyph(canvas, pen_x, y, rows, color, scale);
        pen_x += glyph_advance(scale);
    }
}

/// Draws `text` centered on `(cx, cy)`.
pub(crate) fn draw_text_centered(
    canvas: &mut Canvas<'_>,
    cx: i32,
    cy: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    let x = cx - text_width(text, scale) / 2;
    let y = cy - glyph_height(scale) / 2;
    draw_text(canvas, x, y, text, color, scale);
}

fn draw_glyph(
    canvas: &mut Canvas<'_>,
    x: i32,
    y: i32,
    rows: GlyphRows,
    color: [u8; 4],
    scale: i32,
) {
    for (row_index, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let px = x + col * scale;
            let py = y + row_index as i32 * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    canvas.put_pixel(px + sx, py + sy, color);
                }
            }
        }
    }
}

fn glyph_rows(ch: char) -> Option<GlyphRows> {
    let rows = match ch.to_ascii_uppercase() {
        ' ' => [0, 0, 0, 0, 0],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0, 0, 0, 0, 0b010],
        ',' => [0, 0, 0, 0b010, 0b100],
        ':' => [0, 0b010, 0, 0b010, 0],
        ';' => [0, 0b010, 0, 0b010, 0b100],
        '-' => [0, 0, 0b111, 0, 0],
        '+' => [0, 0b010, 0b111, 0b010, 0],
        '=' => [0, 0b111, 0, 0b111, 0],
        '_' => [0, 0, 0, 0, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\\' => [0b100, 0b100, 0b010, 0b001, 0b001],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '[' => [0b011, 0b010, 0b010, 0b010, 0b011],
        ']' => [0b110, 0b010, 0b010, 0b010, 0b110],
        '{' => [0b011, 0b010, 0b110, 0b010, 0b011],
        '}' => [0b110, 0b010, 0b011, 0b010, 0b110],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0, 0b010],
        '?' => [0b110, 0b001, 0b010, 0, 0b010],
        '\'' => [0b010, 0b010, 0, 0, 0],
        '"' => [0b101, 0b101, 0, 0, 0],
        '`' => [0b100, 0b010, 0, 0, 0],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '*' => [0, 0b101, 0b010, 0b101, 0],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '@' => [0b111, 0b101, 0b111, 0b100, 0b011],
        '^' => [0b010, 0b101, 0, 0, 0],
        '~' => [0, 0b011, 0b110, 0, 0],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        _ => return None,
    };
    Some(rows)
}
